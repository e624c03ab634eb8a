//! Core library for the `airwatch` CLI.
//!
//! This crate defines:
//! - The acquisition controller: search or geolocate, fetch air quality and
//!   weather concurrently, reconcile partial results into one state
//! - Upstream clients (geocoding, air pollution, current weather)
//! - The categorical AQI classifier
//! - The on-disk configuration and API key lookup
//!
//! It is used by `airwatch-cli`, but any presentation layer can drive an
//! `AcquisitionController` and render its `AcquisitionState`.

pub mod aqi;
pub mod config;
pub mod controller;
pub mod error;
pub mod fetcher;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod state;
pub mod util;

#[cfg(test)]
mod testing;

pub use aqi::{AqiDetails, AqiLevel, classify};
pub use config::{Config, StalePolicy};
pub use controller::AcquisitionController;
pub use error::{AcquisitionError, GeolocationError, GeolocationErrorCode, ProviderError};
pub use fetcher::{LocationDataFetcher, Observations};
pub use geolocation::{FailingGeolocator, FixedGeolocator, Geolocator, NoGeolocation};
pub use model::{
    AirQualityObservation, Coordinate, PlaceResolution, Pollutant, Pollutants, WeatherObservation,
};
pub use provider::{AirQualitySource, Geocoder, OpenWeatherProvider, WeatherSource};
pub use state::{AcquisitionState, Phase};
