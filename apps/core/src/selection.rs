use std::collections::HashMap;

use serde::Serialize;

use crate::domain::LaunchRecord;
use crate::error::{AtlasError, Result};

/// Fixed historical eras used as the first drill-down level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Era {
    SpaceRace,
    ShuttleDetente,
    PostSoviet,
    Commercial,
}

impl Era {
    pub const ALL: [Self; 4] = [
        Self::SpaceRace,
        Self::ShuttleDetente,
        Self::PostSoviet,
        Self::Commercial,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::SpaceRace => "Space Race",
            Self::ShuttleDetente => "Shuttle & Détente",
            Self::PostSoviet => "Post-Soviet",
            Self::Commercial => "Commercial",
        }
    }

    /// Inclusive year range of the era.
    pub const fn years(self) -> (u32, u32) {
        match self {
            Self::SpaceRace => (1957, 1972),
            Self::ShuttleDetente => (1973, 1991),
            Self::PostSoviet => (1992, 2009),
            Self::Commercial => (2010, u32::MAX),
        }
    }

    pub const fn contains(self, year: u32) -> bool {
        let (start, end) = self.years();
        year >= start && year <= end
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::SpaceRace),
            1 => Some(Self::ShuttleDetente),
            2 => Some(Self::PostSoviet),
            3 => Some(Self::Commercial),
            _ => None,
        }
    }
}

/// Which drill-down level the next choice applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionLevel {
    Era,
    Provider,
    Rocket,
}

/// Era → provider → rocket drill-down. Lower levels are only ever set while
/// their parent is set, and changing a parent clears everything below it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    era: Option<Era>,
    provider: Option<String>,
    rocket: Option<String>,
}

impl SelectionState {
    pub const fn era(&self) -> Option<Era> {
        self.era
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    pub fn rocket(&self) -> Option<&str> {
        self.rocket.as_deref()
    }

    pub fn set_era(&mut self, era: Era) {
        self.era = Some(era);
        self.provider = None;
        self.rocket = None;
    }

    pub fn set_provider(&mut self, provider: impl Into<String>) -> Result<()> {
        if self.era.is_none() {
            return Err(AtlasError::Selection("choose an era before a provider"));
        }
        self.provider = Some(provider.into());
        self.rocket = None;
        Ok(())
    }

    pub fn set_rocket(&mut self, rocket: impl Into<String>) -> Result<()> {
        if self.provider.is_none() {
            return Err(AtlasError::Selection("choose a provider before a rocket"));
        }
        self.rocket = Some(rocket.into());
        Ok(())
    }

    pub fn clear_era(&mut self) {
        self.era = None;
        self.provider = None;
        self.rocket = None;
    }

    pub fn clear_provider(&mut self) {
        self.provider = None;
        self.rocket = None;
    }

    pub fn clear_rocket(&mut self) {
        self.rocket = None;
    }

    /// Drops the deepest chosen level. Returns `false` when nothing was set.
    pub fn back(&mut self) -> bool {
        if self.rocket.is_some() {
            self.clear_rocket();
        } else if self.provider.is_some() {
            self.clear_provider();
        } else if self.era.is_some() {
            self.clear_era();
        } else {
            return false;
        }
        true
    }

    /// The level a new choice would fill.
    pub const fn next_level(&self) -> SelectionLevel {
        if self.era.is_none() {
            SelectionLevel::Era
        } else if self.provider.is_none() {
            SelectionLevel::Provider
        } else {
            SelectionLevel::Rocket
        }
    }

    pub fn matches(&self, record: &LaunchRecord) -> bool {
        self.era.map_or(true, |era| era.contains(record.year))
            && self
                .provider
                .as_deref()
                .map_or(true, |provider| record.provider == provider)
            && self
                .rocket
                .as_deref()
                .map_or(true, |rocket| record.rocket == rocket)
    }

    /// Human-readable trail such as `Space Race › OKB-1 › Vostok`.
    pub fn breadcrumb(&self) -> String {
        let mut parts = vec![self.era.map_or("All eras", Era::label).to_string()];
        if let Some(provider) = &self.provider {
            parts.push(provider.clone());
        }
        if let Some(rocket) = &self.rocket {
            parts.push(rocket.clone());
        }
        parts.join(" › ")
    }

    /// Providers active in the chosen era, busiest first.
    pub fn providers(&self, records: &[LaunchRecord]) -> Vec<String> {
        let Some(era) = self.era else {
            return Vec::new();
        };
        ranked(
            records
                .iter()
                .filter(|record| era.contains(record.year))
                .map(|record| record.provider.as_str()),
        )
    }

    /// Rockets flown by the chosen provider in the chosen era, busiest first.
    pub fn rockets(&self, records: &[LaunchRecord]) -> Vec<String> {
        let (Some(era), Some(provider)) = (self.era, self.provider.as_deref()) else {
            return Vec::new();
        };
        ranked(
            records
                .iter()
                .filter(|record| era.contains(record.year) && record.provider == provider)
                .map(|record| record.rocket.as_str()),
        )
    }
}

fn ranked<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *counts.entry(name).or_insert(0) += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.into_iter().map(|(name, _)| name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LaunchStatus;

    fn launch(provider: &str, rocket: &str, year: u32) -> LaunchRecord {
        LaunchRecord {
            name: format!("{rocket} {year}"),
            status: LaunchStatus::Successful,
            provider: provider.to_string(),
            rocket: rocket.to_string(),
            mission: String::new(),
            site: "Baikonur".to_string(),
            latitude: Some(45.9),
            longitude: Some(63.3),
            timestamp: String::new(),
            year,
            month: 1,
        }
    }

    #[test]
    fn setting_an_era_clears_provider_and_rocket() {
        let mut selection = SelectionState::default();
        selection.set_era(Era::SpaceRace);
        selection.set_provider("OKB-1").unwrap();
        selection.set_rocket("Vostok").unwrap();

        selection.set_era(Era::ShuttleDetente);
        assert_eq!(selection.era(), Some(Era::ShuttleDetente));
        assert_eq!(selection.provider(), None);
        assert_eq!(selection.rocket(), None);
    }

    #[test]
    fn setting_a_provider_clears_rocket() {
        let mut selection = SelectionState::default();
        selection.set_era(Era::SpaceRace);
        selection.set_provider("OKB-1").unwrap();
        selection.set_rocket("Vostok").unwrap();

        selection.set_provider("NASA").unwrap();
        assert_eq!(selection.provider(), Some("NASA"));
        assert_eq!(selection.rocket(), None);
    }

    #[test]
    fn lower_levels_require_their_parent() {
        let mut selection = SelectionState::default();
        assert!(selection.set_provider("NASA").is_err());
        assert!(selection.set_rocket("Saturn V").is_err());

        selection.set_era(Era::SpaceRace);
        assert!(selection.set_rocket("Saturn V").is_err());
        assert_eq!(selection, {
            let mut expected = SelectionState::default();
            expected.set_era(Era::SpaceRace);
            expected
        });
    }

    #[test]
    fn clearing_a_provider_never_leaves_a_rocket_behind() {
        let mut selection = SelectionState::default();
        selection.set_era(Era::SpaceRace);
        selection.set_provider("NASA").unwrap();
        selection.set_rocket("Saturn V").unwrap();

        selection.clear_provider();
        assert_eq!(selection.rocket(), None);
        assert_eq!(selection.next_level(), SelectionLevel::Provider);
    }

    #[test]
    fn back_pops_one_level_at_a_time() {
        let mut selection = SelectionState::default();
        selection.set_era(Era::SpaceRace);
        selection.set_provider("NASA").unwrap();
        selection.set_rocket("Saturn V").unwrap();

        assert!(selection.back());
        assert_eq!(selection.next_level(), SelectionLevel::Rocket);
        assert!(selection.back());
        assert!(selection.back());
        assert!(!selection.back());
        assert_eq!(selection.breadcrumb(), "All eras");
    }

    #[test]
    fn option_lists_follow_the_chosen_path() {
        let records = vec![
            launch("NASA", "Saturn V", 1969),
            launch("NASA", "Saturn V", 1970),
            launch("NASA", "Saturn IB", 1968),
            launch("OKB-1", "Soyuz", 1967),
            launch("SpaceX", "Falcon 9", 2015),
        ];

        let mut selection = SelectionState::default();
        assert!(selection.providers(&records).is_empty());

        selection.set_era(Era::SpaceRace);
        assert_eq!(selection.providers(&records), vec!["NASA", "OKB-1"]);

        selection.set_provider("NASA").unwrap();
        assert_eq!(selection.rockets(&records), vec!["Saturn V", "Saturn IB"]);

        selection.set_rocket("Saturn V").unwrap();
        let matching = records.iter().filter(|r| selection.matches(r)).count();
        assert_eq!(matching, 2);
        assert_eq!(selection.breadcrumb(), "Space Race › NASA › Saturn V");
    }
}
