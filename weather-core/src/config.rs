use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::provider::openweather::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, OpenWeatherSettings};

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Light/dark flag, persisted as `theme = "light"` or `theme = "dark"`.
///
/// Reading is lenient: anything other than "dark" (any case) loads as light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            _ => Err(anyhow!("Unknown theme '{value}'. Supported themes: light, dark.")),
        }
    }
}

impl<'de> Deserialize<'de> for ThemePreference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Other(IgnoredAny),
        }

        let theme = match Raw::deserialize(deserializer)? {
            Raw::Text(s) if s.trim().eq_ignore_ascii_case("dark") => ThemePreference::Dark,
            Raw::Text(_) | Raw::Other(_) => ThemePreference::Light,
        };
        Ok(theme)
    }
}

/// Fallback position used by `weather here`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomeLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// theme = "dark"
///
/// [home]
/// latitude = 52.52
/// longitude = 13.405
/// ```
#[derive(Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,

    #[serde(default)]
    pub theme: ThemePreference,

    /// Override for the upstream scheme and host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout; 0 falls back to the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<HomeLocation>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("theme", &self.theme)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("home", &self.home)
            .finish()
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key from the environment, falling back to the file. Blank values count as unset.
    pub fn api_key(&self) -> Option<String> {
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }

    pub(crate) fn resolve_api_key(&self, from_env: Option<String>) -> Option<String> {
        from_env
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .map(|k| k.trim().to_string())
    }

    pub fn has_stored_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn set_theme(&mut self, theme: ThemePreference) {
        self.theme = theme;
    }

    /// Flip light/dark and return the new value.
    pub fn toggle_theme(&mut self) -> ThemePreference {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn set_home(&mut self, latitude: f64, longitude: f64) {
        self.home = Some(HomeLocation { latitude, longitude });
    }

    pub fn provider_settings(&self) -> OpenWeatherSettings {
        OpenWeatherSettings {
            base_url: self.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_secs: self.timeout_secs.filter(|s| *s > 0).unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }
}
