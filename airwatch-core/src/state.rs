use crate::{
    error::AcquisitionError,
    model::{AirQualityObservation, WeatherObservation},
};

/// Everything the presentation layer renders. Only the controller writes it.
///
/// While `loading` is set both observations are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcquisitionState {
    pub loading: bool,
    pub geo_loading: bool,
    pub error: Option<AcquisitionError>,
    pub geo_error: Option<String>,
    pub air_quality: Option<AirQualityObservation>,
    pub weather: Option<WeatherObservation>,
    /// "City, Country", a transitional placeholder, or empty.
    pub location_label: String,
    /// Sequence number of the most recently started fetch; 0 before the first.
    pub request_seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    SettledWithData,
    SettledPartial,
    SettledEmpty,
    SettledError,
}

impl AcquisitionState {
    pub fn phase(&self) -> Phase {
        if self.loading {
            return Phase::Loading;
        }

        match (&self.error, self.air_quality.is_some(), self.weather.is_some()) {
            (_, true, true) => Phase::SettledWithData,
            (_, true, false) | (_, false, true) => Phase::SettledPartial,
            (Some(AcquisitionError::NoData), false, false) => Phase::SettledEmpty,
            (Some(_), false, false) => Phase::SettledError,
            (None, false, false) => Phase::Idle,
        }
    }

    /// Full dashboard: nothing pending, nothing wrong, both observations in hand.
    pub fn is_ready(&self) -> bool {
        !self.loading && self.error.is_none() && self.air_quality.is_some() && self.weather.is_some()
    }

    pub fn has_data(&self) -> bool {
        self.air_quality.is_some() || self.weather.is_some()
    }

    /// Nothing to show yet, and nothing went wrong.
    pub fn is_blank(&self) -> bool {
        !self.loading
            && self.error.is_none()
            && self.geo_error.is_none()
            && !self.has_data()
    }

    /// Spinner text; geolocation wins over a data fetch.
    pub fn busy_message(&self) -> Option<&'static str> {
        if self.geo_loading {
            Some("Getting location...")
        } else if self.loading {
            Some("Loading data...")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::BranchFailures, testing};

    #[test]
    fn default_is_idle_and_blank() {
        let state = AcquisitionState::default();
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.is_blank());
        assert!(!state.is_ready());
        assert_eq!(state.busy_message(), None);
    }

    #[test]
    fn phases() {
        let loading = AcquisitionState { loading: true, ..Default::default() };
        assert_eq!(loading.phase(), Phase::Loading);
        assert_eq!(loading.busy_message(), Some("Loading data..."));

        let full = AcquisitionState {
            air_quality: Some(testing::air_quality(1)),
            weather: Some(testing::weather("Paris", "FR")),
            ..Default::default()
        };
        assert_eq!(full.phase(), Phase::SettledWithData);
        assert!(full.is_ready());

        let partial = AcquisitionState {
            weather: Some(testing::weather("Paris", "FR")),
            error: Some(AcquisitionError::Fetch(BranchFailures { air_quality: true, weather: false })),
            ..Default::default()
        };
        assert_eq!(partial.phase(), Phase::SettledPartial);
        assert!(!partial.is_ready());
        assert!(partial.has_data());

        let empty = AcquisitionState { error: Some(AcquisitionError::NoData), ..Default::default() };
        assert_eq!(empty.phase(), Phase::SettledEmpty);
        assert!(!empty.has_data());

        let failed = AcquisitionState { error: Some(AcquisitionError::Unexpected), ..Default::default() };
        assert_eq!(failed.phase(), Phase::SettledError);
        assert!(!failed.is_blank());
    }

    #[test]
    fn geolocation_message_wins() {
        let state = AcquisitionState { loading: true, geo_loading: true, ..Default::default() };
        assert_eq!(state.busy_message(), Some("Getting location..."));
    }

    #[test]
    fn geo_error_is_not_blank() {
        let state = AcquisitionState { geo_error: Some("nope".into()), ..Default::default() };
        assert!(!state.is_blank());
        assert_eq!(state.phase(), Phase::Idle);
    }
}
