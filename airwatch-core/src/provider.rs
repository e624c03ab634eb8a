//! Upstream sources, one trait per concern.
//!
//! Every method distinguishes three outcomes: a value, a successful response
//! that carries nothing usable (`Ok(None)`), and a transport failure (`Err`).

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::ProviderError,
    model::{AirQualityObservation, Coordinate, PlaceResolution, WeatherObservation},
};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Resolves a place name to its first ranked match.
    ///
    /// Callers trim the name and never pass an empty one.
    async fn resolve(&self, city: &str) -> Result<Option<PlaceResolution>, ProviderError>;
}

#[async_trait]
pub trait AirQualitySource: Send + Sync + Debug {
    async fn air_quality(
        &self,
        coord: Coordinate,
    ) -> Result<Option<AirQualityObservation>, ProviderError>;
}

#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current_weather(
        &self,
        coord: Coordinate,
    ) -> Result<Option<WeatherObservation>, ProviderError>;
}
