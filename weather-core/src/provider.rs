use crate::{Config, WeatherError, WeatherQuery, WeatherReading, provider::openweather::OpenWeatherClient};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Anything that can turn a query into a reading.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current_conditions(
        &self,
        query: &WeatherQuery,
    ) -> Result<WeatherReading, WeatherError>;
}

/// Construct the OpenWeather provider from config (API key, endpoint, timeout).
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    build_provider(config, config.api_key())
}

fn build_provider(
    config: &Config,
    api_key: Option<String>,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = api_key.ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
             Hint: run `weather configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let client = OpenWeatherClient::new(api_key, config.provider_settings())?;
    Ok(Box::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_provider_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = build_provider(&cfg, cfg.resolve_api_key(None)).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains("Hint: run `weather configure`"));
    }

    #[test]
    fn build_provider_uses_key_from_env_value() {
        let cfg = Config::default();
        let provider = build_provider(&cfg, cfg.resolve_api_key(Some("ENV_KEY".into())));
        assert!(provider.is_ok());
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        let provider = provider_from_config(&cfg);
        assert!(provider.is_ok());
    }
}
