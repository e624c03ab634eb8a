//! Categorical view of the coarse 1-5 air quality index.
//!
//! The index arrives pre-computed from the upstream source; this module only
//! maps it onto fixed tiers. No breakpoint arithmetic happens here.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    Unknown,
}

impl AqiLevel {
    /// Tiers in ascending severity. `Unknown` is not a tier.
    pub const fn tiers() -> &'static [AqiLevel] {
        &[
            AqiLevel::Good,
            AqiLevel::Fair,
            AqiLevel::Moderate,
            AqiLevel::Poor,
            AqiLevel::VeryPoor,
        ]
    }

    pub fn from_index(index: i64) -> Self {
        match index {
            1 => AqiLevel::Good,
            2 => AqiLevel::Fair,
            3 => AqiLevel::Moderate,
            4 => AqiLevel::Poor,
            5 => AqiLevel::VeryPoor,
            _ => AqiLevel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Fair => "Fair",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::Poor => "Poor",
            AqiLevel::VeryPoor => "Very Poor",
            AqiLevel::Unknown => "Unknown",
        }
    }

    pub fn color(&self) -> ColorKey {
        match self {
            AqiLevel::Good => ColorKey::Green,
            AqiLevel::Fair => ColorKey::Gold,
            AqiLevel::Moderate => ColorKey::Orange,
            AqiLevel::Poor => ColorKey::Red,
            AqiLevel::VeryPoor => ColorKey::Purple,
            AqiLevel::Unknown => ColorKey::Neutral,
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            AqiLevel::Good => {
                "Air quality is considered satisfactory, and air pollution poses little or no risk."
            }
            AqiLevel::Fair => {
                "Air quality is acceptable; however, some pollutants may be a moderate health \
                 concern for a very small number of people unusually sensitive to air pollution."
            }
            AqiLevel::Moderate => {
                "Members of sensitive groups may experience health effects. \
                 The general public is not likely to be affected."
            }
            AqiLevel::Poor => {
                "Everyone may begin to experience health effects; members of sensitive groups \
                 may experience more serious health effects."
            }
            AqiLevel::VeryPoor => {
                "Health alert: everyone may experience more serious health effects. \
                 Everyone should avoid all outdoor exertion."
            }
            AqiLevel::Unknown => "AQI data is unavailable.",
        }
    }

    pub fn severity(&self) -> AdvisorySeverity {
        match self {
            AqiLevel::Good => AdvisorySeverity::Success,
            AqiLevel::Fair | AqiLevel::Moderate => AdvisorySeverity::Warning,
            AqiLevel::Poor | AqiLevel::VeryPoor => AdvisorySeverity::Error,
            AqiLevel::Unknown => AdvisorySeverity::Info,
        }
    }
}

impl std::fmt::Display for AqiLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display color of a tier, named after the palette the dashboard used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorKey {
    Green,
    Gold,
    Orange,
    Red,
    Purple,
    Neutral,
}

impl ColorKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorKey::Green => "green",
            ColorKey::Gold => "gold",
            ColorKey::Orange => "orange",
            ColorKey::Red => "red",
            ColorKey::Purple => "purple",
            ColorKey::Neutral => "default",
        }
    }
}

/// How loudly a health advisory should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdvisorySeverity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AqiDetails {
    pub level: AqiLevel,
    pub color: ColorKey,
    pub advice: &'static str,
}

impl AqiDetails {
    pub fn headline(&self) -> String {
        format!("Health Advisory: {}", self.level)
    }
}

/// Maps a raw index onto its tier.
///
/// Only the integers 1 to 5 are tiers. Anything else, including `None`,
/// NaN, fractional values, 0 and values above 5, is `Unknown`.
pub fn classify(index: Option<f64>) -> AqiDetails {
    let level = match index {
        Some(v) if v.fract() == 0.0 && (1.0..=5.0).contains(&v) => AqiLevel::from_index(v as i64),
        _ => AqiLevel::Unknown,
    };

    AqiDetails { level, color: level.color(), advice: level.advice() }
}

/// One row of the CPCB reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AqiBand {
    pub range: &'static str,
    pub category: &'static str,
    pub color: &'static str,
    pub text_color: &'static str,
}

/// India's CPCB national AQI categories, shown for reference next to the
/// coarse index. The coarse index is never converted into these bands.
pub const CPCB_BANDS: [AqiBand; 6] = [
    AqiBand { range: "0-50", category: "Good", color: "#34a853", text_color: "#fff" },
    AqiBand { range: "51-100", category: "Satisfactory", color: "#a8e063", text_color: "#000" },
    AqiBand { range: "101-200", category: "Moderate", color: "#fdd752", text_color: "#000" },
    AqiBand { range: "201-300", category: "Poor", color: "#f28e2b", text_color: "#fff" },
    AqiBand { range: "301-400", category: "Very Poor", color: "#ea4335", text_color: "#fff" },
    AqiBand { range: "401-500", category: "Severe", color: "#b71c1c", text_color: "#fff" },
];
