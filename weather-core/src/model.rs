use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::error::WeatherError;

/// Base of the upstream icon images; `{icon}@4x.png` is appended.
const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Location to look up: either a named place or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    ByCity { name: String },
    ByCoordinates { latitude: f64, longitude: f64 },
}

impl WeatherQuery {
    pub fn by_city(name: impl Into<String>) -> Self {
        WeatherQuery::ByCity { name: name.into() }
    }

    pub fn by_coordinates(latitude: f64, longitude: f64) -> Self {
        WeatherQuery::ByCoordinates { latitude, longitude }
    }

    /// Local checks run before any request is built.
    pub fn validate(&self) -> Result<(), WeatherError> {
        match self {
            WeatherQuery::ByCity { name } => {
                if name.trim().is_empty() {
                    return Err(WeatherError::InvalidQuery("city name must not be empty".into()));
                }
            }
            WeatherQuery::ByCoordinates { latitude, longitude } => {
                if !(-90.0..=90.0).contains(latitude) {
                    return Err(WeatherError::InvalidQuery(format!(
                        "latitude {latitude} is outside -90..=90"
                    )));
                }
                if !(-180.0..=180.0).contains(longitude) {
                    return Err(WeatherError::InvalidQuery(format!(
                        "longitude {longitude} is outside -180..=180"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Variant-specific upstream parameters (`q`, or `lat` + `lon`).
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            WeatherQuery::ByCity { name } => vec![("q", name.trim().to_string())],
            WeatherQuery::ByCoordinates { latitude, longitude } => {
                vec![("lat", latitude.to_string()), ("lon", longitude.to_string())]
            }
        }
    }
}

impl fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherQuery::ByCity { name } => f.write_str(name.trim()),
            WeatherQuery::ByCoordinates { latitude, longitude } => {
                write!(f, "{latitude}, {longitude}")
            }
        }
    }
}

/// Normalized snapshot of current conditions.
///
/// Only the provider module can build one, and only from a response that
/// passed schema validation. Fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReading {
    pub(crate) location_name: String,
    pub(crate) country_code: String,
    pub(crate) temperature_c: f64,
    pub(crate) feels_like_c: f64,
    pub(crate) condition_description: String,
    pub(crate) condition_icon_id: String,
    pub(crate) wind_speed_mps: f64,
    pub(crate) humidity_percent: u8,
    pub(crate) sunrise_epoch_seconds: i64,
    pub(crate) sunset_epoch_seconds: i64,
}

impl WeatherReading {
    pub fn location_name(&self) -> &str {
        &self.location_name
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    pub fn feels_like_c(&self) -> f64 {
        self.feels_like_c
    }

    pub fn condition_description(&self) -> &str {
        &self.condition_description
    }

    pub fn condition_icon_id(&self) -> &str {
        &self.condition_icon_id
    }

    pub fn wind_speed_mps(&self) -> f64 {
        self.wind_speed_mps
    }

    pub fn humidity_percent(&self) -> u8 {
        self.humidity_percent
    }

    pub fn sunrise_epoch_seconds(&self) -> i64 {
        self.sunrise_epoch_seconds
    }

    pub fn sunset_epoch_seconds(&self) -> i64 {
        self.sunset_epoch_seconds
    }

    /// Large condition icon, e.g. `https://openweathermap.org/img/wn/01d@4x.png`.
    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}/{}@4x.png", self.condition_icon_id)
    }

    pub fn sunrise(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sunrise_epoch_seconds, 0)
    }

    pub fn sunset(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sunset_epoch_seconds, 0)
    }
}

#[cfg(test)]
pub(crate) fn sample_reading() -> WeatherReading {
    WeatherReading {
        location_name: "Paris".into(),
        country_code: "FR".into(),
        temperature_c: 15.2,
        feels_like_c: 14.0,
        condition_description: "clear sky".into(),
        condition_icon_id: "01d".into(),
        wind_speed_mps: 3.1,
        humidity_percent: 60,
        sunrise_epoch_seconds: 1_700_000_000,
        sunset_epoch_seconds: 1_700_030_000,
    }
}
