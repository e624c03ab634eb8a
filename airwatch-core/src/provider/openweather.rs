use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    config::{Config, DEFAULT_BASE_URL},
    error::ProviderError,
    model::{
        AirQualityObservation, Coordinate, PlaceResolution, Pollutants, WeatherObservation,
    },
    util::truncate_body,
};

use super::{AirQualitySource, Geocoder, WeatherSource};

const AIR_POLLUTION_PATH: &str = "/data/2.5/air_pollution";
const WEATHER_PATH: &str = "/data/2.5/weather";
const GEOCODING_PATH: &str = "/geo/1.0/direct";

/// OpenWeatherMap client serving geocoding, air pollution and current weather.
///
/// Without an API key every call returns `Ok(None)` and never touches the
/// network; the missing key is reported once by `Config::check`.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            api_key: config.api_key().map(str::to_owned),
            base_url: config.base_url().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// GETs `path` and returns the body of a 2xx response.
    async fn fetch(
        &self,
        what: &'static str,
        path: &str,
        api_key: &str,
        query: &[(&str, String)],
    ) -> Result<String, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "Fetching {what}");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", api_key)])
            .send()
            .await
            .map_err(|source| ProviderError::Transport { what, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| ProviderError::Transport { what, source })?;

        if !status.is_success() {
            return Err(ProviderError::Status { what, status, body: truncate_body(&body) });
        }

        Ok(body)
    }
}

/// Decodes a 2xx body. A body of the wrong shape is logged and treated as empty.
fn decode<T: DeserializeOwned>(what: &str, body: &str) -> Option<T> {
    match serde_json::from_str(body) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("Unexpected {what} payload ({e}): {}", truncate_body(body));
            None
        }
    }
}

fn coord_query(coord: Coordinate) -> [(&'static str, String); 2] {
    [("lat", coord.lat.to_string()), ("lon", coord.lon.to_string())]
}

#[derive(Debug, Deserialize)]
struct OwAqiMain {
    aqi: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwAirPollutionEntry {
    #[serde(default)]
    main: Option<OwAqiMain>,
    components: Pollutants,
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct OwAirPollutionResponse {
    list: Vec<OwAirPollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwWeatherResponse {
    name: String,
    coord: OwCoord,
    weather: Vec<OwCondition>,
    main: OwMain,
    wind: OwWind,
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwPlace {
    name: String,
    lat: f64,
    lon: f64,
    country: String,
}

#[async_trait]
impl Geocoder for OpenWeatherProvider {
    async fn resolve(&self, city: &str) -> Result<Option<PlaceResolution>, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(None);
        };

        let query = [("q", city.to_string()), ("limit", "1".to_string())];
        let body = self.fetch("geocoding", GEOCODING_PATH, api_key, &query).await?;

        let place = decode::<Vec<OwPlace>>("geocoding", &body)
            .and_then(|places| places.into_iter().next())
            .map(|p| PlaceResolution {
                coord: Coordinate::new(p.lat, p.lon),
                name: p.name,
                country: p.country,
            });

        if place.is_none() {
            debug!("No geocoding match for {city:?}");
        }
        Ok(place)
    }
}

#[async_trait]
impl AirQualitySource for OpenWeatherProvider {
    async fn air_quality(
        &self,
        coord: Coordinate,
    ) -> Result<Option<AirQualityObservation>, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(None);
        };

        let body = self
            .fetch("air pollution", AIR_POLLUTION_PATH, api_key, &coord_query(coord))
            .await?;

        let observation = decode::<OwAirPollutionResponse>("air pollution", &body)
            .and_then(|parsed| parsed.list.into_iter().next())
            .and_then(|entry| {
                let Some(timestamp_ms) = entry.dt.checked_mul(1000) else {
                    warn!("Air pollution timestamp {} is out of range", entry.dt);
                    return None;
                };
                Some(AirQualityObservation {
                    index: entry.main.and_then(|m| m.aqi),
                    components: entry.components,
                    timestamp_ms,
                    city_name: None,
                })
            });

        Ok(observation)
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherProvider {
    async fn current_weather(
        &self,
        coord: Coordinate,
    ) -> Result<Option<WeatherObservation>, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(None);
        };

        let [lat, lon] = coord_query(coord);
        let query = [lat, lon, ("units", "metric".to_string())];
        let body = self.fetch("weather", WEATHER_PATH, api_key, &query).await?;

        let observation = decode::<OwWeatherResponse>("weather", &body).and_then(|parsed| {
            let condition = parsed.weather.into_iter().next()?;
            Some(WeatherObservation {
                // Already Celsius: the request asks for metric units.
                temperature_c: parsed.main.temp.round() as i64,
                description: condition.description,
                icon: condition.icon,
                humidity_pct: parsed.main.humidity,
                wind_speed_mps: parsed.wind.speed,
                city_name: parsed.name,
                country: parsed.sys.country,
                coord: Coordinate::new(parsed.coord.lat, parsed.coord.lon),
            })
        });

        Ok(observation)
    }
}
