use color_eyre::eyre::{eyre, Result};
use launch_atlas_core::dataset::{parse_launches, parse_milestones};
use launch_atlas_core::land::{parse_land, Ring};
use launch_atlas_core::{LaunchRecord, Milestone};
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

use crate::config::AppConfig;

/// Everything read from disk at start-up.
#[derive(Debug, Default)]
pub struct LoadedData {
    pub records: Vec<LaunchRecord>,
    pub milestones: Vec<Milestone>,
    pub land: Vec<Ring>,
}

/// Reads the launch dataset, the milestone feed and the optional coastline
/// concurrently. Only the launch dataset is required; the others degrade to
/// empty with a warning.
pub async fn load_data(config: AppConfig) -> Result<LoadedData> {
    let (launches, events, land) = tokio::join!(
        fs::read_to_string(&config.data_path),
        fs::read_to_string(&config.events_path),
        read_optional(config.land_path.as_deref()),
    );

    let launches = launches
        .map_err(|e| eyre!("cannot read {}: {e}", config.data_path.display()))?;
    let records = parse_launches(&launches)?;
    info!(path = %config.data_path.display(), records = records.len(), "launch dataset loaded");

    let milestones = match events {
        Ok(json) => parse_milestones(&json).unwrap_or_else(|e| {
            warn!(error = %e, "milestone feed is invalid, continuing without it");
            Vec::new()
        }),
        Err(e) => {
            warn!(path = %config.events_path.display(), error = %e, "milestone feed unavailable");
            Vec::new()
        }
    };

    let land = match land {
        Some(Ok(json)) => parse_land(&json).unwrap_or_else(|e| {
            warn!(error = %e, "land outline is invalid, drawing the graticule only");
            Vec::new()
        }),
        Some(Err(e)) => {
            warn!(error = %e, "land outline unavailable, drawing the graticule only");
            Vec::new()
        }
        None => Vec::new(),
    };

    Ok(LoadedData {
        records,
        milestones,
        land,
    })
}

async fn read_optional(path: Option<&Path>) -> Option<std::io::Result<String>> {
    match path {
        Some(path) => Some(fs::read_to_string(path).await),
        None => None,
    }
}
