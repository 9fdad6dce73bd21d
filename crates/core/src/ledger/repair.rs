#![forbid(unsafe_code)]

use super::Progress;

/// Hour fields are held as multiples of this step (2^-22 h, under a millisecond).
pub const HOUR_RESOLUTION: f64 = 1.0 / 4_194_304.0;

/// Upper bound for any hour field (2^28 h). Below it, sums and differences of three fields
/// on the [`HOUR_RESOLUTION`] grid are exact in `f64`.
pub const MAX_HOURS: f64 = 268_435_456.0;

/// Snaps `hours` onto the hour grid, clamped to `0..=MAX_HOURS`. NaN stays NaN.
pub fn quantize_hours(hours: f64) -> f64 {
    let clamped = hours.clamp(0.0, MAX_HOURS);
    (clamped / HOUR_RESOLUTION).round() * HOUR_RESOLUTION
}

impl Progress {
    pub fn repaired(mut self) -> Self {
        self.repair();
        self
    }

    /// Restores `done + delay + yet == total` exactly. A surplus lands in `yet`; a deficit is
    /// drawn from `yet`, then `delay`, then `done`, never below zero.
    pub fn repair(&mut self) {
        if [self.done, self.delay, self.yet, self.total]
            .iter()
            .any(|v| v.is_nan())
        {
            return;
        }
        self.total = quantize_hours(self.total);
        self.done = quantize_hours(self.done);
        self.delay = quantize_hours(self.delay);

        if self.done >= self.total {
            self.done = self.total;
            self.delay = 0.0;
            self.yet = 0.0;
            return;
        }
        let room = self.total - self.done;
        if self.delay >= room {
            self.delay = room;
            self.yet = 0.0;
            return;
        }
        self.yet = room - self.delay;
    }
}
