//! Device position, as supplied by whatever platform hosts the controller.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::{GeolocationError, GeolocationErrorCode},
    model::Coordinate,
};

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    /// Whether the platform can report a position at all.
    fn is_supported(&self) -> bool {
        true
    }

    async fn current_position(&self) -> Result<Coordinate, GeolocationError>;
}

/// A platform without geolocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

#[async_trait]
impl Geolocator for NoGeolocation {
    fn is_supported(&self) -> bool {
        false
    }

    async fn current_position(&self) -> Result<Coordinate, GeolocationError> {
        Err(GeolocationError::new(
            GeolocationErrorCode::PositionUnavailable,
            "geolocation is not supported",
        ))
    }
}

/// Always reports the same position, e.g. a configured home location.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub Coordinate);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinate, GeolocationError> {
        Ok(self.0)
    }
}

/// Always fails with the same reason.
#[derive(Debug, Clone)]
pub struct FailingGeolocator(pub GeolocationError);

#[async_trait]
impl Geolocator for FailingGeolocator {
    async fn current_position(&self) -> Result<Coordinate, GeolocationError> {
        Err(self.0.clone())
    }
}
