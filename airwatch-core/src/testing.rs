//! Scripted in-memory sources for tests.

use async_trait::async_trait;
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use crate::{
    error::{GeolocationError, GeolocationErrorCode, ProviderError},
    geolocation::Geolocator,
    model::{
        AirQualityObservation, Coordinate, PlaceResolution, Pollutants, WeatherObservation,
    },
    provider::{AirQualitySource, Geocoder, WeatherSource},
};

#[derive(Debug, Clone)]
pub enum Outcome<T> {
    Value(T),
    Empty,
    Fail,
    Panic,
}

#[derive(Debug, Clone)]
struct Reply<T> {
    outcome: Outcome<T>,
    delay: Duration,
}

/// Answers every call with a fixed outcome, optionally overridden per latitude.
#[derive(Debug)]
pub struct Stub<T> {
    default: Reply<T>,
    by_lat: Vec<(f64, Reply<T>)>,
    calls: AtomicUsize,
}

impl<T: Clone + Send + Sync> Stub<T> {
    pub fn new(outcome: Outcome<T>) -> Self {
        Self {
            default: Reply { outcome, delay: Duration::ZERO },
            by_lat: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn value(value: T) -> Self {
        Self::new(Outcome::Value(value))
    }

    pub fn empty() -> Self {
        Self::new(Outcome::Empty)
    }

    pub fn failing() -> Self {
        Self::new(Outcome::Fail)
    }

    pub fn delayed(mut self, ms: u64) -> Self {
        self.default.delay = Duration::from_millis(ms);
        self
    }

    pub fn at(mut self, lat: f64, outcome: Outcome<T>, delay_ms: u64) -> Self {
        let reply = Reply { outcome, delay: Duration::from_millis(delay_ms) };
        self.by_lat.push((lat, reply));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn reply(&self, lat: Option<f64>) -> Result<Option<T>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let reply = lat
            .and_then(|lat| self.by_lat.iter().find(|(l, _)| *l == lat))
            .map(|(_, reply)| reply)
            .unwrap_or(&self.default)
            .clone();

        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }

        match reply.outcome {
            Outcome::Value(v) => Ok(Some(v)),
            Outcome::Empty => Ok(None),
            Outcome::Fail => Err(ProviderError::Status {
                what: "stub",
                status: reqwest::StatusCode::BAD_GATEWAY,
                body: "upstream unavailable".into(),
            }),
            Outcome::Panic => panic!("stub source blew up"),
        }
    }
}

#[async_trait]
impl Geocoder for Stub<PlaceResolution> {
    async fn resolve(&self, _city: &str) -> Result<Option<PlaceResolution>, ProviderError> {
        self.reply(None).await
    }
}

#[async_trait]
impl AirQualitySource for Stub<AirQualityObservation> {
    async fn air_quality(
        &self,
        coord: Coordinate,
    ) -> Result<Option<AirQualityObservation>, ProviderError> {
        self.reply(Some(coord.lat)).await
    }
}

#[async_trait]
impl WeatherSource for Stub<WeatherObservation> {
    async fn current_weather(
        &self,
        coord: Coordinate,
    ) -> Result<Option<WeatherObservation>, ProviderError> {
        self.reply(Some(coord.lat)).await
    }
}

/// A position fix that may take a while; empty or failing scripts report
/// the position as unavailable.
#[async_trait]
impl Geolocator for Stub<Coordinate> {
    async fn current_position(&self) -> Result<Coordinate, GeolocationError> {
        match self.reply(None).await {
            Ok(Some(coord)) => Ok(coord),
            Ok(None) | Err(_) => Err(GeolocationError::new(
                GeolocationErrorCode::PositionUnavailable,
                "no fix",
            )),
        }
    }
}

pub const PARIS: Coordinate = Coordinate::new(48.85, 2.35);

pub fn paris() -> PlaceResolution {
    PlaceResolution { coord: PARIS, name: "Paris".into(), country: "FR".into() }
}

pub fn air_quality(index: i64) -> AirQualityObservation {
    AirQualityObservation {
        index: Some(index),
        components: Pollutants { co: 201.94, o3: 68.66, pm2_5: 0.5, pm10: 0.54, ..Default::default() },
        timestamp_ms: 1_700_000_000_000,
        city_name: None,
    }
}

pub fn weather(city: &str, country: &str) -> WeatherObservation {
    WeatherObservation {
        temperature_c: 18,
        description: "broken clouds".into(),
        icon: "04d".into(),
        humidity_pct: 72,
        wind_speed_mps: 4.12,
        city_name: city.into(),
        country: country.into(),
        coord: Coordinate::new(48.8534, 2.3488),
    }
}
