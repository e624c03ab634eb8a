//! Orchestrates search, geolocation and the dual-source fetch, and owns the
//! resulting `AcquisitionState`.
//!
//! All entry points take `&self`, so several flows may be in flight at once.
//! They write to the same state without fencing: whichever settles last wins,
//! unless `StalePolicy::Discard` is selected.

use anyhow::Result;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::{
    config::{Config, StalePolicy},
    error::{AcquisitionError, BranchFailures},
    fetcher::{LocationDataFetcher, Observations},
    geolocation::Geolocator,
    model::Coordinate,
    provider::{Geocoder, OpenWeatherProvider},
    state::AcquisitionState,
};

pub const FETCHING_LOCATION: &str = "Fetching location...";
pub const LOCATION_UNAVAILABLE: &str = "Location name unavailable";
pub const YOUR_LOCATION: &str = "Your Location";
pub const GEOLOCATION_UNSUPPORTED: &str = "Geolocation is not supported on this device.";

#[derive(Debug)]
pub struct AcquisitionController {
    geocoder: Arc<dyn Geocoder>,
    fetcher: LocationDataFetcher,
    geolocator: Arc<dyn Geolocator>,
    stale_policy: StalePolicy,
    seq: AtomicU64,
    state: watch::Sender<AcquisitionState>,
}

impl AcquisitionController {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        fetcher: LocationDataFetcher,
        geolocator: Arc<dyn Geolocator>,
    ) -> Self {
        let (state, _) = watch::channel(AcquisitionState::default());
        Self {
            geocoder,
            fetcher,
            geolocator,
            stale_policy: StalePolicy::default(),
            seq: AtomicU64::new(0),
            state,
        }
    }

    /// Wires one OpenWeatherMap client into all three upstream roles.
    pub fn from_config(config: &Config, geolocator: Arc<dyn Geolocator>) -> Result<Self> {
        let provider = Arc::new(OpenWeatherProvider::from_config(config)?);
        let fetcher = LocationDataFetcher::new(provider.clone(), provider.clone());

        Ok(Self::new(provider, fetcher, geolocator).with_stale_policy(config.stale_responses))
    }

    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AcquisitionState {
        self.state.borrow().clone()
    }

    /// Notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<AcquisitionState> {
        self.state.subscribe()
    }

    fn update(&self, f: impl FnOnce(&mut AcquisitionState)) {
        self.state.send_modify(|s| {
            f(s);
            debug_assert!(!s.loading || !s.has_data(), "published data while loading: {s:?}");
        });
    }

    /// Entry point A: geocode `city`, then fetch for the first match.
    ///
    /// Blank input does nothing. A lookup that fails or finds nothing sets
    /// `error` and clears the label without fetching.
    pub async fn search_by_name(&self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            return;
        }

        match self.geocoder.resolve(city).await {
            Ok(Some(place)) => {
                debug!(?place, "Resolved {city:?}");
                self.fetch_and_reconcile(place.coord, Some(place.label())).await;
            }
            Ok(None) => {
                info!("No location found for {city:?}");
                self.update(|s| {
                    s.error = Some(AcquisitionError::CityNotFound(city.to_string()));
                    s.location_label.clear();
                });
            }
            Err(e) => {
                warn!("Search for {city:?} failed: {e}");
                self.update(|s| {
                    s.error = Some(AcquisitionError::SearchFailed(city.to_string()));
                    s.location_label.clear();
                });
            }
        }
    }

    /// Entry point B: fetch for the device position.
    pub async fn use_current_location(&self) {
        if !self.geolocator.is_supported() {
            self.update(|s| s.geo_error = Some(GEOLOCATION_UNSUPPORTED.to_string()));
            return;
        }

        self.update(|s| {
            s.geo_loading = true;
            s.geo_error = None;
            s.error = None;
        });

        match self.geolocator.current_position().await {
            Ok(coord) => {
                let seq = self.begin_fetch(Some(YOUR_LOCATION));
                self.update(|s| s.geo_loading = false);
                self.complete_fetch(seq, coord, Some(YOUR_LOCATION.to_string())).await;
            }
            Err(e) => {
                warn!("Geolocation failed: {e}");
                self.update(|s| {
                    s.geo_error = Some(e.user_message().to_string());
                    s.geo_loading = false;
                });
            }
        }
    }

    /// Entry point C: fetch both observations for `coord` and fold them into the state.
    pub async fn fetch_and_reconcile(&self, coord: Coordinate, provisional_label: Option<String>) {
        let seq = self.begin_fetch(provisional_label.as_deref());
        self.complete_fetch(seq, coord, provisional_label).await;
    }

    fn begin_fetch(&self, provisional_label: Option<&str>) -> u64 {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;

        self.update(|s| {
            s.loading = true;
            s.error = None;
            s.geo_error = None;
            s.air_quality = None;
            s.weather = None;
            s.location_label = provisional_label.unwrap_or(FETCHING_LOCATION).to_string();
            s.request_seq = seq;
        });

        seq
    }

    async fn complete_fetch(&self, seq: u64, coord: Coordinate, provisional_label: Option<String>) {
        let mut guard = LoadingGuard { state: &self.state, armed: true };

        let outcome = self.fetcher.fetch_observations(coord).await;

        if self.stale_policy == StalePolicy::Discard && self.seq.load(Ordering::SeqCst) != seq {
            debug!("Discarding fetch #{seq}, superseded");
            guard.armed = false;
            return;
        }

        // Results and `loading = false` go out in a single send, so no
        // subscriber ever sees data while loading.
        match outcome {
            Ok(observations) => {
                self.update(|s| {
                    reconcile(s, observations, provisional_label.as_deref());
                    s.loading = false;
                });
                info!(seq, "Fetch settled");
            }
            Err(e) => {
                error!("Unexpected error during data fetching: {e}");
                self.update(|s| {
                    s.error = Some(AcquisitionError::Unexpected);
                    s.air_quality = None;
                    s.weather = None;
                    s.location_label.clear();
                    s.loading = false;
                });
            }
        }
        guard.armed = false;
    }
}

/// Clears `loading` when a fetch future is dropped before it settles.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<AcquisitionState>,
    armed: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_modify(|s| s.loading = false);
        }
    }
}

/// Folds two settled branches into the state.
///
/// Weather is the authority on the label. Failed branches become one message
/// line each; two empty answers become `NoData`.
fn reconcile(state: &mut AcquisitionState, observations: Observations, provisional_label: Option<&str>) {
    let mut failures = BranchFailures::default();

    let mut air_quality = observations.air_quality.unwrap_or_else(|_| {
        failures.air_quality = true;
        None
    });
    let weather = observations.weather.unwrap_or_else(|_| {
        failures.weather = true;
        None
    });

    match &weather {
        Some(w) => {
            state.location_label = w.label();
            if let Some(aq) = air_quality.as_mut() {
                aq.city_name = Some(w.city_name.clone());
            }
        }
        None if state.location_label == FETCHING_LOCATION => {
            state.location_label = provisional_label.unwrap_or(LOCATION_UNAVAILABLE).to_string();
        }
        None => {}
    }

    let found_any = air_quality.is_some() || weather.is_some();
    state.air_quality = air_quality;
    state.weather = weather;

    state.error = if failures.any() {
        Some(AcquisitionError::Fetch(failures))
    } else if !found_any {
        state.location_label.clear();
        Some(AcquisitionError::NoData)
    } else {
        None
    };
}
