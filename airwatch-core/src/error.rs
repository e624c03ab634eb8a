use thiserror::Error;

/// Failure talking to an upstream source.
///
/// A reachable source answering 2xx with an empty or oddly shaped body is not
/// an error; clients report that as an absent value instead.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{what} request failed: {source}")]
    Transport {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{what} request failed with status {status}: {body}")]
    Status {
        what: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Reason the platform could not supply a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeolocationErrorCode {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Other(u16),
}

impl From<u16> for GeolocationErrorCode {
    /// Numeric codes follow the W3C geolocation API.
    fn from(code: u16) -> Self {
        match code {
            1 => GeolocationErrorCode::PermissionDenied,
            2 => GeolocationErrorCode::PositionUnavailable,
            3 => GeolocationErrorCode::Timeout,
            other => GeolocationErrorCode::Other(other),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("geolocation failed ({code:?}): {detail}")]
pub struct GeolocationError {
    pub code: GeolocationErrorCode,
    pub detail: String,
}

impl GeolocationError {
    pub fn new(code: impl Into<GeolocationErrorCode>, detail: impl Into<String>) -> Self {
        Self { code: code.into(), detail: detail.into() }
    }

    /// Message shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self.code {
            GeolocationErrorCode::PermissionDenied => {
                "Location permission denied. Please enable it in your browser settings."
            }
            GeolocationErrorCode::PositionUnavailable => "Location information is unavailable.",
            GeolocationErrorCode::Timeout => "The request to get user location timed out.",
            GeolocationErrorCode::Other(_) => "Unable to retrieve your location.",
        }
    }
}

/// The fan-out join itself broke down, as opposed to one of its branches.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{branch} branch did not complete: {source}")]
    Join {
        branch: &'static str,
        #[source]
        source: tokio::task::JoinError,
    },
}

/// Which branches of a fan-out join failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BranchFailures {
    pub air_quality: bool,
    pub weather: bool,
}

impl BranchFailures {
    pub fn any(&self) -> bool {
        self.air_quality || self.weather
    }
}

impl std::fmt::Display for BranchFailures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut lines = Vec::with_capacity(2);
        if self.air_quality {
            lines.push("Failed to fetch air quality data.");
        }
        if self.weather {
            lines.push("Failed to fetch weather data.");
        }
        f.write_str(&lines.join("\n"))
    }
}

/// What the user is told after an acquisition attempt went wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    #[error("{0}")]
    Fetch(BranchFailures),

    /// Both sources answered, neither had anything.
    #[error("No data available for this location.")]
    NoData,

    #[error("Could not find location data for \"{0}\". Please try a different city name.")]
    CityNotFound(String),

    #[error("An error occurred while searching for \"{0}\".")]
    SearchFailed(String),

    #[error("An unexpected error occurred.")]
    Unexpected,
}
