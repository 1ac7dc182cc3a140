use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::{
    error::WeatherError,
    model::{WeatherQuery, WeatherReading},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// Transport settings for [`OpenWeatherClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct OpenWeatherSettings {
    /// Scheme and host, without a trailing slash.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OpenWeatherSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Client for the OpenWeather "current weather" endpoint.
///
/// Cheap to clone; holds no mutable state, so concurrent calls are fine.
#[derive(Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    endpoint: String,
    http: Client,
}

// The API key stays out of Debug output so it cannot end up in logs.
impl std::fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>, settings: OpenWeatherSettings) -> Result<Self, WeatherError> {
        // A zero timeout would fail every request.
        let timeout_secs = match settings.timeout_secs {
            0 => DEFAULT_TIMEOUT_SECS,
            secs => secs,
        };
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| WeatherError::NetworkFailure(format!("failed to build HTTP client: {e}")))?;

        let endpoint = format!("{}{CURRENT_WEATHER_PATH}", settings.base_url.trim_end_matches('/'));

        Ok(Self { api_key: api_key.into(), endpoint, http })
    }

    /// One validated GET, mapped into a reading or a typed error.
    #[instrument(skip_all, fields(query = %query))]
    pub async fn fetch_current_conditions(
        &self,
        query: &WeatherQuery,
    ) -> Result<WeatherReading, WeatherError> {
        query.validate()?;

        let mut params = query.query_params();
        debug!(endpoint = %self.endpoint, ?params, "requesting current conditions");
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        let res = self
            .http
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| WeatherError::NetworkFailure(describe_transport_error(e)))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| {
                WeatherError::NetworkFailure(format!(
                    "failed to read response body: {}",
                    describe_transport_error(e)
                ))
            })?;

        if !status.is_success() {
            let message = upstream_message(&body);
            warn!(status = status.as_u16(), %message, "upstream rejected request");
            return Err(WeatherError::UpstreamError { status: status.as_u16(), message });
        }

        parse_current_response(&body).inspect_err(|e| warn!(error = %e, "could not parse upstream body"))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch_current_conditions(
        &self,
        query: &WeatherQuery,
    ) -> Result<WeatherReading, WeatherError> {
        OpenWeatherClient::fetch_current_conditions(self, query).await
    }
}

/// One-shot lookup against the public endpoint with default settings.
pub async fn fetch_current_conditions(
    query: &WeatherQuery,
    api_key: &str,
) -> Result<WeatherReading, WeatherError> {
    query.validate()?;
    OpenWeatherClient::new(api_key, OpenWeatherSettings::default())?
        .fetch_current_conditions(query)
        .await
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

/// Validate and map a raw "current weather" body.
///
/// The only way to obtain a [`WeatherReading`]; schema violations become
/// [`WeatherError::MalformedResponse`].
pub fn parse_current_response(body: &str) -> Result<WeatherReading, WeatherError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::MalformedResponse(e.to_string()))?;

    if parsed.main.humidity > 100 {
        return Err(WeatherError::MalformedResponse(format!(
            "humidity {} is outside 0..=100",
            parsed.main.humidity
        )));
    }

    let OwCurrentResponse { name, sys, main, weather, wind } = parsed;
    let condition = weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::MalformedResponse("`weather` array is empty".into()))?;

    Ok(WeatherReading {
        location_name: name,
        country_code: sys.country,
        temperature_c: main.temp,
        feels_like_c: main.feels_like,
        condition_description: condition.description,
        condition_icon_id: condition.icon,
        wind_speed_mps: wind.speed,
        humidity_percent: main.humidity,
        sunrise_epoch_seconds: sys.sunrise,
        sunset_epoch_seconds: sys.sunset,
    })
}

/// Prefer the upstream `message` field, fall back to the raw body.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| truncate_body(body))
}

// reqwest error strings embed the full URL, which contains `appid`.
fn describe_transport_error(err: reqwest::Error) -> String {
    let err = err.without_url();
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("could not connect: {err}")
    } else {
        err.to_string()
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
