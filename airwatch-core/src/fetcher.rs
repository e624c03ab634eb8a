//! Concurrent retrieval of both observations for one coordinate.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    error::{FetchError, ProviderError},
    model::{AirQualityObservation, Coordinate, WeatherObservation},
    provider::{AirQualitySource, WeatherSource},
};

/// Settled outcome of one branch: a value, a successful empty answer, or a failure.
pub type Branch<T> = Result<Option<T>, ProviderError>;

#[derive(Debug)]
pub struct Observations {
    pub air_quality: Branch<AirQualityObservation>,
    pub weather: Branch<WeatherObservation>,
}

#[derive(Debug, Clone)]
pub struct LocationDataFetcher {
    air_quality: Arc<dyn AirQualitySource>,
    weather: Arc<dyn WeatherSource>,
}

impl LocationDataFetcher {
    pub fn new(air_quality: Arc<dyn AirQualitySource>, weather: Arc<dyn WeatherSource>) -> Self {
        Self { air_quality, weather }
    }

    /// Runs both branches as separate tasks and waits for both to settle.
    ///
    /// A failing branch never cuts the other one short; its error is carried in
    /// `Observations`. `Err` is only returned when a branch task itself died.
    pub async fn fetch_observations(&self, coord: Coordinate) -> Result<Observations, FetchError> {
        debug!(%coord, "Fetching observations");

        let source = Arc::clone(&self.air_quality);
        let air_quality = tokio::spawn(async move { source.air_quality(coord).await });

        let source = Arc::clone(&self.weather);
        let weather = tokio::spawn(async move { source.current_weather(coord).await });

        let (air_quality, weather) = tokio::join!(air_quality, weather);

        let air_quality =
            air_quality.map_err(|source| FetchError::Join { branch: "air quality", source })?;
        let weather = weather.map_err(|source| FetchError::Join { branch: "weather", source })?;

        if let Err(e) = &air_quality {
            warn!("Air quality branch failed: {e}");
        }
        if let Err(e) = &weather {
            warn!("Weather branch failed: {e}");
        }

        Ok(Observations { air_quality, weather })
    }
}
