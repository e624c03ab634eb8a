use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aqi::{AqiDetails, classify};

/// A point on the globe, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}, {:.2}", self.lat, self.lon)
    }
}

/// First geocoding match for a free-text place name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResolution {
    pub coord: Coordinate,
    pub name: String,
    pub country: String,
}

impl PlaceResolution {
    /// "Name, Country", used as the provisional label of a fetch.
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// The fixed pollutant set reported by the air-quality source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pollutant {
    Co,
    No,
    No2,
    O3,
    So2,
    Pm2_5,
    Pm10,
    Nh3,
}

impl Pollutant {
    pub const fn all() -> &'static [Pollutant] {
        &[
            Pollutant::Co,
            Pollutant::No,
            Pollutant::No2,
            Pollutant::O3,
            Pollutant::So2,
            Pollutant::Pm2_5,
            Pollutant::Pm10,
            Pollutant::Nh3,
        ]
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Pollutant::Co => "co",
            Pollutant::No => "no",
            Pollutant::No2 => "no2",
            Pollutant::O3 => "o3",
            Pollutant::So2 => "so2",
            Pollutant::Pm2_5 => "pm2_5",
            Pollutant::Pm10 => "pm10",
            Pollutant::Nh3 => "nh3",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Pollutant::Co => "Carbon Monoxide",
            Pollutant::No => "Nitrogen Monoxide",
            Pollutant::No2 => "Nitrogen Dioxide",
            Pollutant::O3 => "Ozone",
            Pollutant::So2 => "Sulphur Dioxide",
            Pollutant::Pm2_5 => "Fine Particles (PM2.5)",
            Pollutant::Pm10 => "Coarse Particles (PM10)",
            Pollutant::Nh3 => "Ammonia",
        }
    }

    /// Every component is reported as a mass concentration.
    pub fn unit(&self) -> &'static str {
        "µg/m³"
    }
}

/// Pollutant concentrations in µg/m³. Components the source omits read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pollutants {
    pub co: f64,
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub nh3: f64,
}

impl Pollutants {
    pub fn get(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Co => self.co,
            Pollutant::No => self.no,
            Pollutant::No2 => self.no2,
            Pollutant::O3 => self.o3,
            Pollutant::So2 => self.so2,
            Pollutant::Pm2_5 => self.pm2_5,
            Pollutant::Pm10 => self.pm10,
            Pollutant::Nh3 => self.nh3,
        }
    }

    /// Concentrations in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, f64)> + '_ {
        Pollutant::all().iter().map(move |p| (*p, self.get(*p)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityObservation {
    /// Coarse 1-5 index; `None` when the source did not report one.
    pub index: Option<i64>,
    pub components: Pollutants,
    /// Epoch milliseconds.
    pub timestamp_ms: i64,
    /// Filled in by the controller from the weather observation, never by the source.
    pub city_name: Option<String>,
}

impl AirQualityObservation {
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }

    pub fn details(&self) -> AqiDetails {
        classify(self.index.map(|i| i as f64))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    /// Rounded to whole degrees Celsius.
    pub temperature_c: i64,
    pub description: String,
    pub icon: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub city_name: String,
    pub country: String,
    /// As echoed by the source, which may snap to its own grid.
    pub coord: Coordinate,
}

impl WeatherObservation {
    pub fn label(&self) -> String {
        format!("{}, {}", self.city_name, self.country)
    }
}
