//! Plain-text rendering of an `AcquisitionState`.

use airwatch_core::{
    AcquisitionState, AirQualityObservation, AqiLevel, WeatherObservation,
    aqi::{AdvisorySeverity, CPCB_BANDS},
    util::weather_icon_url,
};
use std::fmt::Write;

const BLANK_PROMPT: &str =
    "Please search for a city or use your current location to check the air quality and weather.";

pub fn report(state: &AcquisitionState) -> String {
    let mut out = String::new();

    if let Some(geo_error) = &state.geo_error {
        let _ = writeln!(out, "Location error: {geo_error}");
    }
    if let Some(error) = &state.error {
        for line in error.to_string().lines() {
            let _ = writeln!(out, "Error: {line}");
        }
    }
    if state.is_blank() {
        let _ = writeln!(out, "{BLANK_PROMPT}");
        return out;
    }

    if !state.location_label.is_empty() {
        let _ = writeln!(out, "Location: {}", state.location_label);
    }
    if let Some(aq) = &state.air_quality {
        out.push('\n');
        air_quality(&mut out, aq);
    }
    if let Some(weather) = &state.weather {
        out.push('\n');
        current_weather(&mut out, weather);
    }

    out
}

fn marker(severity: AdvisorySeverity) -> &'static str {
    match severity {
        AdvisorySeverity::Success => "[ok]",
        AdvisorySeverity::Info => "[info]",
        AdvisorySeverity::Warning => "[warn]",
        AdvisorySeverity::Error => "[alert]",
    }
}

fn air_quality(out: &mut String, aq: &AirQualityObservation) {
    let details = aq.details();
    let index = aq.index.map_or_else(|| "n/a".to_string(), |i| i.to_string());

    let _ = writeln!(out, "Air quality: {} (index {index}, scale 1-5)", details.level);
    let _ = writeln!(out, "{} {}", marker(details.level.severity()), details.headline());
    let _ = writeln!(out, "  {}", details.advice);
    if let Some(at) = aq.observed_at() {
        let _ = writeln!(out, "Observed: {}", at.format("%Y-%m-%d %H:%M UTC"));
    }

    let _ = writeln!(out, "\nPollutants:");
    for (pollutant, value) in aq.components.iter() {
        let _ = writeln!(out, "  {:<26}{value:>10.2} {}", pollutant.name(), pollutant.unit());
    }
}

fn current_weather(out: &mut String, weather: &WeatherObservation) {
    let _ = writeln!(out, "Current weather in {}: {}", weather.label(), weather.description);
    let _ = writeln!(out, "  Temperature  {}°C", weather.temperature_c);
    let _ = writeln!(out, "  Humidity     {}%", weather.humidity_pct);
    let _ = writeln!(out, "  Wind speed   {} m/s", weather.wind_speed_mps);
    let _ = writeln!(out, "  Coordinates  {}", weather.coord);
    let _ = writeln!(out, "  Icon         {}", weather_icon_url(&weather.icon));
}

pub fn levels() -> String {
    let mut out = String::from("OpenWeatherMap AQI scale:\n");
    for (i, level) in AqiLevel::tiers().iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}  {:<10}{:<8}{}",
            i + 1,
            level.as_str(),
            level.color().as_str(),
            level.advice()
        );
    }

    out.push_str("\nCPCB AQI categories (reference):\n");
    for band in CPCB_BANDS {
        let _ = writeln!(out, "  {:<9}{:<14}{}", band.range, band.category, band.color);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use airwatch_core::{AcquisitionError, Coordinate, Pollutants};

    fn paris_air() -> AirQualityObservation {
        AirQualityObservation {
            index: Some(2),
            components: Pollutants { co: 201.94, pm2_5: 0.5, ..Default::default() },
            timestamp_ms: 1_700_000_000_000,
            city_name: Some("Paris".into()),
        }
    }

    fn paris_weather() -> WeatherObservation {
        WeatherObservation {
            temperature_c: 18,
            description: "broken clouds".into(),
            icon: "04d".into(),
            humidity_pct: 72,
            wind_speed_mps: 4.12,
            city_name: "Paris".into(),
            country: "FR".into(),
            coord: Coordinate::new(48.8534, 2.3488),
        }
    }

    #[test]
    fn blank_state_prompts() {
        let out = report(&AcquisitionState::default());
        assert_eq!(out.trim(), BLANK_PROMPT);
    }

    #[test]
    fn full_report() {
        let state = AcquisitionState {
            air_quality: Some(paris_air()),
            weather: Some(paris_weather()),
            location_label: "Paris, FR".into(),
            ..Default::default()
        };

        let out = report(&state);
        assert!(out.starts_with("Location: Paris, FR\n"));
        assert!(out.contains("Air quality: Fair (index 2, scale 1-5)"));
        assert!(out.contains("[warn] Health Advisory: Fair"));
        assert!(out.contains("Observed: 2023-11-14 22:13 UTC"));
        assert!(out.contains("Carbon Monoxide"));
        assert!(out.contains("201.94 µg/m³"));
        assert!(out.contains("Temperature  18°C"));
        assert!(out.contains("Coordinates  48.85, 2.35"));
        assert!(out.contains("https://openweathermap.org/img/wn/04d@2x.png"));
        assert!(!out.contains("Error"));
    }

    #[test]
    fn errors_are_listed_line_by_line() {
        let state = AcquisitionState {
            error: Some(AcquisitionError::Fetch(airwatch_core::error::BranchFailures {
                air_quality: true,
                weather: true,
            })),
            location_label: "Location name unavailable".into(),
            ..Default::default()
        };

        let out = report(&state);
        assert!(out.contains("Error: Failed to fetch air quality data.\n"));
        assert!(out.contains("Error: Failed to fetch weather data.\n"));
        assert!(out.contains("Location: Location name unavailable"));
    }

    #[test]
    fn geo_error_is_shown() {
        let state = AcquisitionState {
            geo_error: Some("The request to get user location timed out.".into()),
            ..Default::default()
        };
        assert!(report(&state).contains("Location error: The request to get user location timed out."));
    }

    #[test]
    fn levels_lists_both_tables() {
        let out = levels();
        assert!(out.contains("5  Very Poor"));
        assert!(out.contains("401-500  Severe"));
    }
}
