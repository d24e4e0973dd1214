//! Decoding of the static launch dataset and the milestone feed.
//!
//! Both inputs are JSON arrays. Elements are decoded one by one so a single
//! malformed record is skipped (and logged) instead of rejecting the file.
//! Records without coordinates are kept: they still count in the charts, the
//! aggregator simply never plots them.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{LaunchRecord, LaunchStatus, Milestone, MAX_YEAR};
use crate::error::{AtlasError, Result};

#[derive(Debug, Default, Deserialize)]
struct RawLaunch {
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default, alias = "lsp", alias = "lsp_name", alias = "launch_service_provider")]
    provider: Option<Value>,
    #[serde(default, alias = "vehicle", alias = "rocket_name")]
    rocket: Option<Value>,
    #[serde(default, alias = "mission_name")]
    mission: Option<Value>,
    #[serde(default, alias = "pad", alias = "location", alias = "launch_site")]
    site: Option<Value>,
    #[serde(default, alias = "lat")]
    latitude: Option<Value>,
    #[serde(default, alias = "lon", alias = "lng")]
    longitude: Option<Value>,
    #[serde(default, alias = "net", alias = "timestamp", alias = "window_start")]
    date: Option<Value>,
    #[serde(default)]
    year: Option<Value>,
    #[serde(default)]
    month: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMilestone {
    #[serde(default)]
    year: Option<Value>,
    #[serde(default, alias = "label", alias = "source")]
    author: Option<Value>,
    #[serde(default, alias = "body", alias = "content")]
    text: Option<Value>,
}

/// Parses the launch dataset. Fails only when the document is not a JSON array.
pub fn parse_launches(json: &str) -> Result<Vec<LaunchRecord>> {
    let items = top_level_array(json)?;
    let total = items.len();

    let records: Vec<LaunchRecord> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| decode_launch(index, item))
        .collect();

    debug!(total, kept = records.len(), "decoded launch dataset");
    Ok(records)
}

/// Parses the milestone feed with the same skip-and-continue tolerance.
pub fn parse_milestones(json: &str) -> Result<Vec<Milestone>> {
    let items = top_level_array(json)?;

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let raw = match serde_json::from_value::<RawMilestone>(item) {
                Ok(raw) => raw,
                Err(error) => {
                    warn!(index, %error, "skipping malformed milestone");
                    return None;
                }
            };
            let Some(year) = raw.year.as_ref().and_then(number) else {
                warn!(index, "skipping milestone without a year");
                return None;
            };
            let Some(body) = raw.text.as_ref().and_then(text) else {
                warn!(index, "skipping milestone without text");
                return None;
            };
            Some(Milestone {
                year,
                author: raw.author.as_ref().and_then(text).unwrap_or_default(),
                text: body,
            })
        })
        .collect())
}

/// Milestones dated at or before `year`, newest first.
pub fn visible_milestones(events: &[Milestone], year: u32) -> Vec<&Milestone> {
    let mut visible: Vec<&Milestone> = events.iter().filter(|event| event.year <= year).collect();
    visible.sort_by(|a, b| b.year.cmp(&a.year));
    visible
}

fn top_level_array(json: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(items) => Ok(items),
        other => Err(AtlasError::Dataset(format!(
            "expected a JSON array at the top level, found {}",
            value_kind(&other)
        ))),
    }
}

fn decode_launch(index: usize, item: Value) -> Option<LaunchRecord> {
    if !item.is_object() {
        warn!(index, kind = value_kind(&item), "skipping non-object launch record");
        return None;
    }

    let raw = match serde_json::from_value::<RawLaunch>(item) {
        Ok(raw) => raw,
        Err(error) => {
            warn!(index, %error, "skipping malformed launch record");
            return None;
        }
    };

    let timestamp = raw.date.as_ref().and_then(text).unwrap_or_default();
    let explicit = raw
        .year
        .as_ref()
        .and_then(number)
        .zip(raw.month.as_ref().and_then(number));
    if let Some((year, _)) = explicit.filter(|(year, _)| !(1..=MAX_YEAR).contains(year)) {
        warn!(index, year, "ignoring out-of-range launch year");
    }
    let Some((year, month)) = explicit
        .filter(|&(year, month)| usable_date(year, month))
        .or_else(|| {
            derive_year_month(&timestamp).filter(|&(year, month)| usable_date(year, month))
        })
    else {
        warn!(index, timestamp = %timestamp, "skipping launch record without a usable date");
        return None;
    };

    let mission = raw.mission.as_ref().and_then(text).unwrap_or_default();
    let name = raw
        .name
        .as_ref()
        .and_then(text)
        .or_else(|| (!mission.is_empty()).then(|| mission.clone()))
        .unwrap_or_else(|| "Unnamed launch".to_string());

    Some(LaunchRecord {
        name,
        status: raw
            .status
            .as_ref()
            .and_then(text)
            .map_or(LaunchStatus::Other, |status| LaunchStatus::parse(&status)),
        provider: raw
            .provider
            .as_ref()
            .and_then(text)
            .unwrap_or_else(|| "Unknown provider".to_string()),
        rocket: raw
            .rocket
            .as_ref()
            .and_then(text)
            .unwrap_or_else(|| "Unknown rocket".to_string()),
        mission,
        site: raw
            .site
            .as_ref()
            .and_then(text)
            .unwrap_or_else(|| "Unknown site".to_string()),
        latitude: raw.latitude.as_ref().and_then(|value| coordinate(value, 90.0)),
        longitude: raw.longitude.as_ref().and_then(|value| coordinate(value, 180.0)),
        timestamp,
        year,
        month,
    })
}

/// Strings are taken as-is; objects contribute their `name` field, which is
/// how nested provider/status objects are shaped in launch APIs.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(map) => map.get("name").and_then(text),
        _ => None,
    }
}

fn number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

const fn usable_date(year: u32, month: u32) -> bool {
    year >= 1 && year <= MAX_YEAR && month >= 1 && month <= 12
}

fn coordinate(value: &Value, limit: f64) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (parsed.is_finite() && parsed.abs() <= limit).then_some(parsed)
}

fn derive_year_month(timestamp: &str) -> Option<(u32, u32)> {
    let trimmed = timestamp.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some((u32::try_from(parsed.year()).ok()?, parsed.month()));
    }

    let date = NaiveDate::parse_from_str(trimmed.get(..10)?, "%Y-%m-%d").ok()?;
    Some((u32::try_from(date.year()).ok()?, date.month()))
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_records_and_derives_dates() {
        let json = r#"[
            {"name": "Sputnik 1", "status": "Launch Successful", "provider": "OKB-1",
             "rocket": "Sputnik 8K71PS", "mission": "Sputnik 1", "site": "Baikonur",
             "latitude": 45.92, "longitude": 63.342, "date": "1957-10-04T19:28:34Z"}
        ]"#;

        let records = parse_launches(json).unwrap();
        assert_eq!(records.len(), 1);
        let sputnik = &records[0];
        assert_eq!(sputnik.status, LaunchStatus::Successful);
        assert_eq!((sputnik.year, sputnik.month), (1957, 10));
        assert_eq!(sputnik.coordinates(), Some((63.342, 45.92)));
    }

    #[test]
    fn accepts_aliases_nested_names_and_string_coordinates() {
        let json = r#"[
            {"mission_name": "CRS-20", "status": {"name": "Success"},
             "lsp": {"name": "SpaceX"}, "vehicle": "Falcon 9", "pad": "SLC-40",
             "lat": "28.56", "lon": "-80.57", "net": "2020-03-07 04:50:31"}
        ]"#;

        let records = parse_launches(json).unwrap();
        let crs = &records[0];
        assert_eq!(crs.name, "CRS-20");
        assert_eq!(crs.provider, "SpaceX");
        assert_eq!(crs.site, "SLC-40");
        assert_eq!((crs.year, crs.month), (2020, 3));
        assert_eq!(crs.latitude, Some(28.56));
    }

    #[test]
    fn keeps_records_without_coordinates_but_nulls_them() {
        let json = r#"[
            {"name": "A", "site": "Nowhere", "latitude": null, "longitude": 10.0, "date": "1990-01-01"},
            {"name": "B", "site": "Bad", "latitude": 123.0, "longitude": 10.0, "date": "1990-01-01"}
        ]"#;

        let records = parse_launches(json).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|record| record.coordinates().is_none()));
    }

    #[test]
    fn skips_malformed_records_without_failing_the_dataset() {
        let json = r#"[
            42,
            {"name": "No date", "site": "X"},
            {"name": "Explicit", "year": 1961, "month": "4", "site": "Baikonur"}
        ]"#;

        let records = parse_launches(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year_month().code(), 196_104);
    }

    #[test]
    fn out_of_range_years_skip_only_that_record() {
        let json = r#"[
            {"name": "Far future", "year": 50000000, "month": 1, "site": "A",
             "latitude": 1.0, "longitude": 1.0},
            {"name": "Year zero", "year": 0, "month": 3, "site": "B"},
            {"name": "Fallback", "year": 4294967295, "month": 1,
             "date": "1965-03-18T07:30:00Z", "site": "Baikonur"},
            {"name": "Gemini 3", "year": 1965, "month": 3, "site": "Cape Canaveral"}
        ]"#;

        let records = parse_launches(json).unwrap();
        let names: Vec<&str> = records.iter().map(|record| record.name.as_str()).collect();
        assert_eq!(names, ["Fallback", "Gemini 3"]);
        assert_eq!(records[0].year_month().code(), 196_503);

        let timeline = crate::timeline::Timeline::from_records(&records).unwrap();
        assert_eq!(timeline.current().code(), 196_503);
    }

    #[test]
    fn rejects_non_array_documents() {
        assert!(matches!(
            parse_launches(r#"{"launches": []}"#),
            Err(AtlasError::Dataset(_))
        ));
        assert!(matches!(parse_launches("not json"), Err(AtlasError::Json(_))));
    }

    #[test]
    fn milestones_filter_by_year_newest_first() {
        let json = r#"[
            {"year": 1957, "author": "TASS", "text": "First satellite"},
            {"year": 1969, "label": "NASA", "body": "Men on the Moon"},
            {"year": 1981, "author": "NASA", "text": "First Shuttle flight"},
            {"author": "nobody", "text": "undated"}
        ]"#;

        let events = parse_milestones(json).unwrap();
        assert_eq!(events.len(), 3);

        let visible = visible_milestones(&events, 1970);
        let years: Vec<u32> = visible.iter().map(|event| event.year).collect();
        assert_eq!(years, vec![1969, 1957]);
        assert_eq!(visible[0].author, "NASA");
    }
}
