use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

use crate::model::Coordinate;

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "OPENWEATHERMAP_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// What to do with a fetch that completes after a newer one was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StalePolicy {
    /// Every completion is applied; the last one to settle wins.
    #[default]
    LastWriteWins,
    /// Completions of superseded requests are dropped.
    Discard,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// timeout_secs = 10
/// stale_responses = "discard"
///
/// [home]
/// lat = 48.85
/// lon = 2.35
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,

    /// Overrides `DEFAULT_BASE_URL`, mostly for testing.
    pub base_url: Option<String>,

    /// Per-request HTTP timeout. No timeout when unset.
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub stale_responses: StalePolicy,

    /// Position reported as the device location.
    pub home: Option<Coordinate>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    ///
    /// `OPENWEATHERMAP_API_KEY` takes precedence over the stored key.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;

        cfg.override_api_key(std::env::var(API_KEY_ENV).ok());

        Ok(cfg)
    }

    /// Replaces the stored key with `key` unless it is unset or blank.
    pub fn override_api_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.set_api_key(key);
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "airwatch", "airwatch")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Blank keys count as missing.
    pub fn set_api_key(&mut self, key: String) {
        let key = key.trim().to_string();
        self.api_key = if key.is_empty() { None } else { Some(key) };
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Reports configuration problems. Meant to be called once at startup.
    ///
    /// Returns `false` if the upstream clients will be unable to fetch anything.
    pub fn check(&self) -> bool {
        if self.api_key().is_none() {
            tracing::error!(
                "No OpenWeatherMap API key configured. Set {API_KEY_ENV} or run `airwatch configure`; \
                 every lookup will come back empty."
            );
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_key_and_fails_check() {
        let cfg = Config::default();
        assert_eq!(cfg.api_key(), None);
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout(), None);
        assert_eq!(cfg.stale_responses, StalePolicy::LastWriteWins);
        assert!(!cfg.check());
    }

    #[test]
    fn blank_key_is_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());
        assert_eq!(cfg.api_key(), None);

        cfg.set_api_key(" KEY ".into());
        assert_eq!(cfg.api_key(), Some("KEY"));
        assert!(cfg.check());
    }

    #[test]
    fn blank_env_key_keeps_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("STORED".into());

        cfg.override_api_key(None);
        cfg.override_api_key(Some(String::new()));
        cfg.override_api_key(Some("  ".into()));
        assert_eq!(cfg.api_key(), Some("STORED"));

        cfg.override_api_key(Some(" FROM_ENV ".into()));
        assert_eq!(cfg.api_key(), Some("FROM_ENV"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("nope.toml")).expect("load");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            api_key: Some("KEY".into()),
            base_url: None,
            timeout_secs: Some(5),
            stale_responses: StalePolicy::Discard,
            home: Some(Coordinate::new(48.85, 2.35)),
        };
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn parses_handwritten_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "api_key = \"abc\"\nstale_responses = \"discard\"\n\n[home]\nlat = 1.5\nlon = -2.0\n",
        )
        .expect("write");

        let cfg = Config::load_from(&path).expect("load");
        assert_eq!(cfg.api_key(), Some("abc"));
        assert_eq!(cfg.home, Some(Coordinate::new(1.5, -2.0)));
        assert_eq!(cfg.stale_responses, StalePolicy::Discard);
    }

    #[test]
    fn garbage_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = [").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
