use serde::Serialize;
use std::fmt;

/// Outcome of a launch. Variants are listed in canonical order, which is also
/// the tie-break order for a site's primary status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchStatus {
    Successful,
    Failure,
    PartialFailure,
    Planned,
    Other,
}

impl LaunchStatus {
    pub const ALL: [Self; 5] = [
        Self::Successful,
        Self::Failure,
        Self::PartialFailure,
        Self::Planned,
        Self::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Successful => "successful",
            Self::Failure => "failure",
            Self::PartialFailure => "partial_failure",
            Self::Planned => "planned",
            Self::Other => "other",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Successful => "Successful",
            Self::Failure => "Failure",
            Self::PartialFailure => "Partial failure",
            Self::Planned => "Planned",
            Self::Other => "Other",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Successful => 0,
            Self::Failure => 1,
            Self::PartialFailure => 2,
            Self::Planned => 3,
            Self::Other => 4,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Successful),
            1 => Some(Self::Failure),
            2 => Some(Self::PartialFailure),
            3 => Some(Self::Planned),
            4 => Some(Self::Other),
            _ => None,
        }
    }

    /// Maps the spellings found in launch datasets onto a status. Anything
    /// unrecognised becomes [`LaunchStatus::Other`].
    pub fn parse(value: &str) -> Self {
        let normalized = value.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "successful" | "success" | "launch successful" => Self::Successful,
            "failure" | "failed" | "launch failure" => Self::Failure,
            "partial failure" | "launch was a partial failure" => Self::PartialFailure,
            "planned" | "future" | "to be confirmed" | "to be determined" | "go for launch"
            | "go" | "tbc" | "tbd" | "in flight" => Self::Planned,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for LaunchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Time-window granularity of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Month,
    Year,
}

impl ViewMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Month => "Monthly",
            Self::Year => "Yearly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "month" | "monthly" | "m" => Some(Self::Month),
            "year" | "yearly" | "y" => Some(Self::Year),
            _ => None,
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Month => Self::Year,
            Self::Year => Self::Month,
        }
    }
}

/// Latest year a [`YearMonth`] can hold.
pub const MAX_YEAR: u32 = 9999;

/// A calendar month encoded as `year * 100 + month`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct YearMonth(u32);

impl YearMonth {
    /// Builds a code, clamping the year to [`MAX_YEAR`] and the month into `1..=12`.
    pub fn new(year: u32, month: u32) -> Self {
        Self(year.min(MAX_YEAR) * 100 + month.clamp(1, 12))
    }

    /// Interprets a raw `year * 100 + month` code, normalising the month.
    pub fn from_code(code: u32) -> Self {
        Self::new(code / 100, code % 100)
    }

    pub const fn code(self) -> u32 {
        self.0
    }

    pub const fn year(self) -> u32 {
        self.0 / 100
    }

    pub const fn month(self) -> u32 {
        self.0 % 100
    }

    #[must_use]
    pub fn next(self) -> Self {
        if self.month() >= 12 {
            if self.year() >= MAX_YEAR {
                return self;
            }
            Self::new(self.year() + 1, 1)
        } else {
            Self::new(self.year(), self.month() + 1)
        }
    }

    #[must_use]
    pub fn prev(self) -> Self {
        if self.month() <= 1 {
            Self::new(self.year().saturating_sub(1), 12)
        } else {
            Self::new(self.year(), self.month() - 1)
        }
    }

    /// Number of months from `self` to `other` (negative when `other` is earlier).
    pub fn months_until(self, other: Self) -> i64 {
        let a = i64::from(self.year()) * 12 + i64::from(self.month());
        let b = i64::from(other.year()) * 12 + i64::from(other.month());
        b - a
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// One historical launch event. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRecord {
    pub name: String,
    pub status: LaunchStatus,
    pub provider: String,
    pub rocket: String,
    pub mission: String,
    pub site: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: String,
    pub year: u32,
    pub month: u32,
}

impl LaunchRecord {
    pub fn year_month(&self) -> YearMonth {
        YearMonth::new(self.year, self.month)
    }

    /// `(longitude, latitude)` when both coordinates are present and finite.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) if lon.is_finite() && lat.is_finite() => Some((lon, lat)),
            _ => None,
        }
    }
}

/// A dated annotation for the milestone feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub year: u32,
    pub author: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_accepts_dataset_spellings() {
        assert_eq!(LaunchStatus::parse("Launch Successful"), LaunchStatus::Successful);
        assert_eq!(LaunchStatus::parse("FAILURE"), LaunchStatus::Failure);
        assert_eq!(LaunchStatus::parse("partial-failure"), LaunchStatus::PartialFailure);
        assert_eq!(LaunchStatus::parse("To Be Confirmed"), LaunchStatus::Planned);
        assert_eq!(LaunchStatus::parse("scrubbed forever"), LaunchStatus::Other);
    }

    #[test]
    fn status_index_round_trips_in_canonical_order() {
        for (index, status) in LaunchStatus::ALL.iter().enumerate() {
            assert_eq!(status.index(), index);
            assert_eq!(LaunchStatus::from_index(index), Some(*status));
        }
        assert_eq!(LaunchStatus::from_index(5), None);
    }

    #[test]
    fn year_month_rolls_over_year_boundaries() {
        let december = YearMonth::new(1969, 12);
        assert_eq!(december.next(), YearMonth::new(1970, 1));
        assert_eq!(YearMonth::new(1970, 1).prev(), december);
        assert_eq!(december.code(), 196_912);
        assert_eq!(december.to_string(), "1969-12");
    }

    #[test]
    fn year_month_normalises_bad_months() {
        assert_eq!(YearMonth::from_code(202_013), YearMonth::new(2020, 12));
        assert_eq!(YearMonth::from_code(202_000), YearMonth::new(2020, 1));
    }

    #[test]
    fn huge_years_are_clamped_instead_of_overflowing() {
        let last = YearMonth::new(u32::MAX, 12);
        assert_eq!(last.year(), MAX_YEAR);
        assert_eq!(last.next(), last);
        assert_eq!(YearMonth::from_code(u32::MAX).year(), MAX_YEAR);
    }

    #[test]
    fn months_until_counts_across_years() {
        let start = YearMonth::new(1957, 10);
        assert_eq!(start.months_until(YearMonth::new(1958, 2)), 4);
        assert_eq!(YearMonth::new(1958, 2).months_until(start), -4);
    }

    #[test]
    fn view_mode_toggles_and_parses() {
        assert_eq!(ViewMode::Month.toggled(), ViewMode::Year);
        assert_eq!(ViewMode::parse("Yearly"), Some(ViewMode::Year));
        assert_eq!(ViewMode::parse("decade"), None);
    }
}
