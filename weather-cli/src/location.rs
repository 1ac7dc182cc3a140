//! Where-am-I resolution, kept outside the core.
//!
//! The core only ever sees a finished `WeatherQuery::ByCoordinates`; anything
//! that can fail while finding the position is reported here first.

use async_trait::async_trait;
use thiserror::Error;
use weather_core::{HomeLocation, WeatherQuery};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("Location permission was denied.")]
    PermissionDenied,

    #[error(
        "Geolocation is not supported here.\n\
         Hint: run `weather configure` and set a home location, or use `weather coords`."
    )]
    Unsupported,

    #[error("Location is currently unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Uses the home position saved in the config file.
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredLocation {
    home: Option<HomeLocation>,
}

impl ConfiguredLocation {
    pub fn new(home: Option<HomeLocation>) -> Self {
        Self { home }
    }
}

#[async_trait]
impl Geolocator for ConfiguredLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        self.home
            .map(|h| Coordinates { latitude: h.latitude, longitude: h.longitude })
            .ok_or(LocationError::Unsupported)
    }
}

/// Resolve a position, then build the query the core expects.
pub async fn query_from_geolocator(
    locator: &dyn Geolocator,
) -> Result<WeatherQuery, LocationError> {
    let pos = locator.current_position().await?;
    tracing::debug!(latitude = pos.latitude, longitude = pos.longitude, "resolved position");
    Ok(WeatherQuery::by_coordinates(pos.latitude, pos.longitude))
}

/// Parse "lat,lon" as typed during `weather configure`.
pub fn parse_coordinates(input: &str) -> Option<Coordinates> {
    let (lat, lon) = input.split_once(',')?;
    let latitude: f64 = lat.trim().parse().ok()?;
    let longitude: f64 = lon.trim().parse().ok()?;

    let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
    valid.then_some(Coordinates { latitude, longitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DeniedLocator;

    #[async_trait]
    impl Geolocator for DeniedLocator {
        async fn current_position(&self) -> Result<Coordinates, LocationError> {
            Err(LocationError::PermissionDenied)
        }
    }

    #[tokio::test]
    async fn configured_home_becomes_coordinate_query() {
        let locator =
            ConfiguredLocation::new(Some(HomeLocation { latitude: 52.52, longitude: 13.405 }));

        let query = query_from_geolocator(&locator).await.expect("home is set");
        assert_eq!(query, WeatherQuery::by_coordinates(52.52, 13.405));
    }

    #[tokio::test]
    async fn missing_home_is_unsupported() {
        let locator = ConfiguredLocation::new(None);

        let err = query_from_geolocator(&locator).await.unwrap_err();
        assert_eq!(err, LocationError::Unsupported);
        assert!(err.to_string().contains("Geolocation is not supported"));
    }

    #[tokio::test]
    async fn denial_is_passed_through() {
        let err = query_from_geolocator(&DeniedLocator).await.unwrap_err();
        assert_eq!(err, LocationError::PermissionDenied);
    }

    #[test]
    fn parses_lat_lon_pairs() {
        assert_eq!(
            parse_coordinates(" 48.85 , -2.35 "),
            Some(Coordinates { latitude: 48.85, longitude: -2.35 })
        );
        assert_eq!(parse_coordinates("48.85"), None);
        assert_eq!(parse_coordinates("north,south"), None);
        assert_eq!(parse_coordinates("95,0"), None);
    }
}
