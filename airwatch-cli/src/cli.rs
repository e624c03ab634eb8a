use airwatch_core::{
    AcquisitionController, AcquisitionState, Config, Coordinate, FixedGeolocator, Geolocator,
    NoGeolocation, StalePolicy,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, Text};
use std::{future::Future, sync::Arc};
use tokio::sync::watch;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "airwatch", version, about = "Air quality and weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key and an optional home position.
    Configure,

    /// Show air quality and weather for a city.
    Search {
        /// City name, e.g. "Paris" or "Springfield, US".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },

    /// Show air quality and weather for the current position.
    ///
    /// Uses --lat/--lon when given, else the configured home position.
    Here {
        #[arg(long, requires = "lon", allow_hyphen_values = true, value_parser = parse_latitude)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true, value_parser = parse_longitude)]
        lon: Option<f64>,
    },

    /// Print the AQI tiers and the CPCB reference table.
    Levels,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Levels => print!("{}", render::levels()),
            Command::Search { city } => {
                let config = load_config()?;
                let controller =
                    AcquisitionController::from_config(&config, Arc::new(NoGeolocation))?;
                let city = city.join(" ");

                run_with_progress(&controller, controller.search_by_name(&city)).await;
                print!("{}", render::report(&controller.state()));
            }
            Command::Here { lat, lon } => {
                let config = load_config()?;
                let position = match (lat, lon) {
                    (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
                    _ => config.home,
                };
                let geolocator: Arc<dyn Geolocator> = match position {
                    Some(coord) => Arc::new(FixedGeolocator(coord)),
                    None => Arc::new(NoGeolocation),
                };
                let controller = AcquisitionController::from_config(&config, geolocator)?;

                run_with_progress(&controller, controller.use_current_location()).await;
                print!("{}", render::report(&controller.state()));
            }
        }

        Ok(())
    }
}

fn load_config() -> Result<Config> {
    let config = Config::load()?;
    tracing::debug!(
        base_url = config.base_url(),
        timeout = ?config.timeout(),
        stale = ?config.stale_responses,
        "Loaded configuration"
    );
    config.check();
    Ok(config)
}

/// Drives `op` while echoing spinner messages to stderr.
async fn run_with_progress(controller: &AcquisitionController, op: impl Future<Output = ()>) {
    let progress = tokio::spawn(report_progress(controller.subscribe()));
    op.await;
    progress.abort();
}

async fn report_progress(mut rx: watch::Receiver<AcquisitionState>) {
    let mut last = None;
    while rx.changed().await.is_ok() {
        let message = rx.borrow_and_update().busy_message();
        if message != last {
            if let Some(message) = message {
                eprintln!("{message}");
            }
            last = message;
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .with_help_message("Leave blank to keep the current key")
        .prompt()?;
    if !key.trim().is_empty() {
        config.set_api_key(key);
    }

    let lat = Text::new("Home latitude (blank to skip):").prompt()?;
    if !lat.trim().is_empty() {
        let lon = Text::new("Home longitude:").prompt()?;
        config.home = Some(Coordinate::new(
            parse_latitude(&lat).context("Invalid latitude")?,
            parse_longitude(&lon).context("Invalid longitude")?,
        ));
    }

    let discard = Confirm::new("Ignore results of lookups superseded by a newer one?")
        .with_default(config.stale_responses == StalePolicy::Discard)
        .prompt()?;
    config.stale_responses = if discard { StalePolicy::Discard } else { StalePolicy::LastWriteWins };

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

/// Parses an angle in degrees within `±limit`.
fn parse_degrees(input: &str, limit: f64) -> Result<f64> {
    let value: f64 = input.trim().parse().with_context(|| format!("'{input}' is not a number"))?;
    anyhow::ensure!(value.is_finite() && value.abs() <= limit, "{value} is outside ±{limit}");
    Ok(value)
}

fn parse_latitude(input: &str) -> Result<f64> {
    parse_degrees(input, 90.0)
}

fn parse_longitude(input: &str) -> Result<f64> {
    parse_degrees(input, 180.0)
}
