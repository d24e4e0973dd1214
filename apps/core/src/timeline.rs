use std::time::Duration;

use serde::Serialize;

use crate::domain::{LaunchRecord, YearMonth};

/// Playback speeds offered by the speed control.
pub const SPEEDS: [f64; 5] = [0.5, 1.0, 2.0, 4.0, 8.0];

/// Current position on the dataset's time axis plus playback state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    current: YearMonth,
    min: YearMonth,
    max: YearMonth,
    playing: bool,
    speed_index: usize,
}

impl Timeline {
    pub fn new(min: YearMonth, max: YearMonth) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            current: min,
            min,
            max,
            playing: false,
            speed_index: 1,
        }
    }

    /// Bounds taken from the observed minimum and maximum record dates.
    /// `None` for an empty dataset.
    pub fn from_records(records: &[LaunchRecord]) -> Option<Self> {
        let min = records.iter().map(LaunchRecord::year_month).min()?;
        let max = records.iter().map(LaunchRecord::year_month).max()?;
        Some(Self::new(min, max))
    }

    pub const fn current(&self) -> YearMonth {
        self.current
    }

    pub const fn min(&self) -> YearMonth {
        self.min
    }

    pub const fn max(&self) -> YearMonth {
        self.max
    }

    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    pub const fn speed(&self) -> f64 {
        SPEEDS[self.speed_index]
    }

    /// Sets the position from a raw `year * 100 + month` code, clamped to the bounds.
    pub fn set(&mut self, code: u32) {
        self.current = YearMonth::from_code(code).clamp(self.min, self.max);
    }

    pub fn jump_to_year(&mut self, year: u32) {
        self.set(YearMonth::new(year, 1).code());
    }

    pub fn step_forward(&mut self) {
        self.current = self.current.next().min(self.max);
    }

    pub fn step_back(&mut self) {
        self.current = self.current.prev().max(self.min);
    }

    /// Advances one month while playing. Playback stops once the maximum is
    /// reached and the position stays pinned there.
    pub fn tick(&mut self) {
        if !self.playing {
            return;
        }
        let next = self.current.next();
        if next >= self.max {
            self.current = self.max;
            self.playing = false;
        } else {
            self.current = next;
        }
    }

    /// Starting playback from the end rewinds to the start first.
    pub fn toggle_play(&mut self) {
        if self.playing {
            self.playing = false;
            return;
        }
        if self.current >= self.max {
            self.current = self.min;
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn reset(&mut self) {
        self.current = self.min;
        self.playing = false;
    }

    pub fn faster(&mut self) {
        self.speed_index = (self.speed_index + 1).min(SPEEDS.len() - 1);
    }

    pub fn slower(&mut self) {
        self.speed_index = self.speed_index.saturating_sub(1);
    }

    /// Delay between playback ticks for a base cadence.
    pub fn tick_interval(&self, base: Duration) -> Duration {
        base.div_f64(self.speed())
    }

    /// Position within the bounds, 0.0 at the minimum and 1.0 at the maximum.
    pub fn progress(&self) -> f64 {
        let span = self.min.months_until(self.max);
        if span <= 0 {
            return 1.0;
        }
        self.min.months_until(self.current) as f64 / span as f64
    }
}
