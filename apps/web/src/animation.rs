/// Longest frame gap counted towards playback, so a background tab does not
/// fast-forward through years when it becomes visible again.
const MAX_FRAME_DELTA: f64 = 0.25;

/// Turns animation-frame timestamps into whole timeline ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackClock {
    accumulated: f64,
    last_tick: Option<f64>,
}

impl PlaybackClock {
    /// Number of timeline ticks due at `now_seconds` for a tick every
    /// `interval` seconds. Paused clocks still track time but never
    /// accumulate.
    pub fn advance(&mut self, now_seconds: f64, playing: bool, interval: f64) -> u32 {
        let delta = self
            .last_tick
            .map_or(0.0, |last| (now_seconds - last).max(0.0).min(MAX_FRAME_DELTA));
        self.last_tick = Some(now_seconds);

        if !playing || interval <= 0.0 {
            self.accumulated = 0.0;
            return 0;
        }

        self.accumulated += delta;
        let ticks = (self.accumulated / interval).floor();
        self.accumulated -= ticks * interval;
        ticks as u32
    }

    pub const fn last_tick(&self) -> Option<f64> {
        self.last_tick
    }
}
