/// Kelvin to whole degrees Celsius.
///
/// The weather source is queried in metric units, so this is never applied
/// to fetched observations.
pub fn kelvin_to_celsius(kelvin: f64) -> i64 {
    (kelvin - 273.15).round() as i64
}

pub fn weather_icon_url(icon: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon}@2x.png")
}

/// Caps an upstream body for inclusion in error messages.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
