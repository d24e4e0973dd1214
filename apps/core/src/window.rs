use crate::domain::{LaunchRecord, ViewMode, YearMonth};
use crate::selection::SelectionState;

/// Whether a record falls inside the active time window.
pub const fn in_window(record: &LaunchRecord, current: YearMonth, mode: ViewMode) -> bool {
    match mode {
        ViewMode::Month => record.year == current.year() && record.month == current.month(),
        ViewMode::Year => record.year == current.year(),
    }
}

/// Records inside the time window that also match the drill-down selection.
pub fn active_records<'a>(
    records: &'a [LaunchRecord],
    selection: &SelectionState,
    current: YearMonth,
    mode: ViewMode,
) -> Vec<&'a LaunchRecord> {
    records
        .iter()
        .filter(|record| in_window(record, current, mode) && selection.matches(record))
        .collect()
}

/// Records matching the selection up to and including `current`, used by the
/// charts that grow as the timeline plays.
pub fn history_until<'a>(
    records: &'a [LaunchRecord],
    selection: &SelectionState,
    current: YearMonth,
) -> Vec<&'a LaunchRecord> {
    records
        .iter()
        .filter(|record| record.year_month() <= current && selection.matches(record))
        .collect()
}
