//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Query validation and the normalized [`WeatherReading`]
//! - A typed [`WeatherError`] covering input, transport, upstream and schema failures
//! - The [`WeatherProvider`] abstraction and its OpenWeather implementation
//! - Configuration (API key, theme preference, home location)
//!
//! Platform geolocation is deliberately absent: callers resolve coordinates
//! first and hand over a [`WeatherQuery::ByCoordinates`].

pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use config::{Config, HomeLocation, ThemePreference};
pub use error::WeatherError;
pub use model::{WeatherQuery, WeatherReading};
pub use provider::openweather::{
    OpenWeatherClient, OpenWeatherSettings, fetch_current_conditions, parse_current_response,
};
pub use provider::{WeatherProvider, provider_from_config};
