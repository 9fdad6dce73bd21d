#![forbid(unsafe_code)]

use crate::calendar::{MS_PER_DAY, millis_between};
use time::OffsetDateTime;

pub const DEFAULT_TOTAL: f64 = 1000.0;
pub const DEFAULT_HOURS_PER_DAY: f64 = 8.0;

const QUARTERS_PER_HOUR: f64 = 4.0;

/// Pace needed to reach `total` between two dates, rounded up to a quarter hour.
/// `None` when the range is empty or reversed, or the pace would be zero.
pub fn derive_hours_per_day(
    start_date: OffsetDateTime,
    goal_date: OffsetDateTime,
    total: f64,
) -> Option<f64> {
    let days = millis_between(start_date, goal_date) as f64 / MS_PER_DAY as f64;
    if days <= 0.0 {
        return None;
    }
    let hours = round_up_to_quarter(total / days);
    (hours.is_finite() && hours > 0.0).then_some(hours)
}

pub fn round_up_to_quarter(hours: f64) -> f64 {
    (hours * QUARTERS_PER_HOUR).ceil() / QUARTERS_PER_HOUR
}
