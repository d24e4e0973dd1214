use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;
use launch_atlas_core::{ViewMode, MAX_YEAR};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_LAUNCH_DATA: &str = "data/launches.json";
const DEFAULT_EVENTS_DATA: &str = "data/events.json";
const DEFAULT_LOG_FILE: &str = "launch_atlas.log";
const DEFAULT_PLAY_TICK_MS: u64 = 400;

/// Runtime settings, read from the environment after `.env` is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub events_path: PathBuf,
    pub land_path: Option<PathBuf>,
    pub log_file: PathBuf,
    /// Playback cadence at 1x speed.
    pub play_tick: Duration,
    pub mode: ViewMode,
    pub start_year: Option<u32>,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_LAUNCH_DATA),
            events_path: PathBuf::from(DEFAULT_EVENTS_DATA),
            land_path: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            play_tick: Duration::from_millis(DEFAULT_PLAY_TICK_MS),
            mode: ViewMode::default(),
            start_year: None,
            debug: false,
        }
    }
}

impl AppConfig {
    /// Loads `.env` and reads the configuration from the process environment.
    pub fn load() -> Result<Self> {
        dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let play_tick = match var("PLAY_TICK_MS") {
            Some(value) => {
                let millis: u64 = value
                    .trim()
                    .parse()
                    .map_err(|e| eyre!("PLAY_TICK_MS must be a number of milliseconds: {e}"))?;
                if millis == 0 {
                    return Err(eyre!("PLAY_TICK_MS must be greater than zero"));
                }
                Duration::from_millis(millis)
            }
            None => defaults.play_tick,
        };

        let mode = match var("VIEW_MODE") {
            Some(value) => ViewMode::parse(&value)
                .ok_or_else(|| eyre!("VIEW_MODE must be 'month' or 'year', got '{value}'"))?,
            None => defaults.mode,
        };

        let start_year = var("START_YEAR")
            .map(|value| {
                value
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| eyre!("START_YEAR must be a year: {e}"))
                    .and_then(|year| {
                        if (1..=MAX_YEAR).contains(&year) {
                            Ok(year)
                        } else {
                            Err(eyre!("START_YEAR must be between 1 and {MAX_YEAR}, got {year}"))
                        }
                    })
            })
            .transpose()?;

        Ok(Self {
            data_path: var("LAUNCH_DATA").map_or(defaults.data_path, PathBuf::from),
            events_path: var("EVENTS_DATA").map_or(defaults.events_path, PathBuf::from),
            land_path: var("LAND_GEOJSON")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            log_file: var("LOG_FILE").map_or(defaults.log_file, PathBuf::from),
            play_tick,
            mode,
            start_year,
            debug: var("DEBUG").is_some_and(|value| value != "0" && !value.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        AppConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = config(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.play_tick, Duration::from_millis(400));
    }

    #[test]
    fn variables_override_defaults() {
        let config = config(&[
            ("LAUNCH_DATA", "/tmp/launches.json"),
            ("LAND_GEOJSON", "land.geojson"),
            ("PLAY_TICK_MS", "250"),
            ("VIEW_MODE", "Year"),
            ("START_YEAR", "1981"),
            ("DEBUG", "1"),
        ])
        .unwrap();

        assert_eq!(config.data_path, PathBuf::from("/tmp/launches.json"));
        assert_eq!(config.land_path, Some(PathBuf::from("land.geojson")));
        assert_eq!(config.play_tick, Duration::from_millis(250));
        assert_eq!(config.mode, ViewMode::Year);
        assert_eq!(config.start_year, Some(1981));
        assert!(config.debug);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(config(&[("PLAY_TICK_MS", "fast")]).is_err());
        assert!(config(&[("PLAY_TICK_MS", "0")]).is_err());
        assert!(config(&[("VIEW_MODE", "decade")]).is_err());
        assert!(config(&[("START_YEAR", "MCMLXIX")]).is_err());
    }

    #[test]
    fn start_year_must_fit_the_calendar() {
        assert!(config(&[("START_YEAR", "0")]).is_err());
        assert!(config(&[("START_YEAR", "4294967295")]).is_err());
        let error = config(&[("START_YEAR", "50000000")]).unwrap_err();
        assert!(error.to_string().contains("between 1 and 9999"));
        assert_eq!(config(&[("START_YEAR", "9999")]).unwrap().start_year, Some(9999));
    }
}
