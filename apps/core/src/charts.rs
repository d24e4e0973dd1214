//! Data behind the auxiliary charts and the headless statistics.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::aggregate::StatusCounts;
use crate::domain::{LaunchRecord, LaunchStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSummary {
    pub year: u32,
    pub total: usize,
    pub successful: usize,
    /// Failures and partial failures.
    pub failed: usize,
    /// Successful share of launches with a known outcome, `None` when no
    /// launch that year has one yet.
    pub success_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub count: usize,
}

pub fn yearly_summary<'a>(records: impl IntoIterator<Item = &'a LaunchRecord>) -> Vec<YearSummary> {
    let mut years: BTreeMap<u32, StatusCounts> = BTreeMap::new();
    for record in records {
        years.entry(record.year).or_default().add(record.status);
    }

    years
        .into_iter()
        .map(|(year, counts)| {
            let successful = counts.get(LaunchStatus::Successful);
            let failed =
                counts.get(LaunchStatus::Failure) + counts.get(LaunchStatus::PartialFailure);
            let decided = successful + failed;
            YearSummary {
                year,
                total: counts.total(),
                successful,
                failed,
                success_rate: (decided > 0).then(|| successful as f64 / decided as f64),
            }
        })
        .collect()
}

/// Providers with the most launches, at most `limit` of them.
pub fn launches_by_provider<'a>(
    records: impl IntoIterator<Item = &'a LaunchRecord>,
    limit: usize,
) -> Vec<NamedCount> {
    top_counts(records.into_iter().map(|record| record.provider.as_str()), limit)
}

/// Sites with the most launches, at most `limit` of them.
pub fn busiest_sites<'a>(
    records: impl IntoIterator<Item = &'a LaunchRecord>,
    limit: usize,
) -> Vec<NamedCount> {
    top_counts(records.into_iter().map(|record| record.site.as_str()), limit)
}

pub fn status_breakdown<'a>(records: impl IntoIterator<Item = &'a LaunchRecord>) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for record in records {
        counts.add(record.status);
    }
    counts
}

fn top_counts<'a>(names: impl Iterator<Item = &'a str>, limit: usize) -> Vec<NamedCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names.filter(|name| !name.is_empty()) {
        *counts.entry(name).or_insert(0) += 1;
    }
    let mut ranked: Vec<NamedCount> = counts
        .into_iter()
        .map(|(name, count)| NamedCount {
            name: name.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(limit);
    ranked
}
