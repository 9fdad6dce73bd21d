#![forbid(unsafe_code)]

mod pace;
mod repair;
mod types;

pub use pace::*;
pub use repair::{HOUR_RESOLUTION, MAX_HOURS, quantize_hours};
pub use types::*;

use crate::calendar::{Calendar, MS_PER_HOUR, millis_between};
use crate::ids::SheetId;
use time::OffsetDateTime;

/// Progress toward one time-bound goal.
///
/// `done`, `delay` and `yet` are stored fields. Every setter re-establishes
/// `done + delay + yet == total` (see [`Progress::repair`]), so callers can mutate any one of
/// them and read back a consistent triple. Elapsed-time effects are only computed on demand
/// through [`ProgressLedger::progress_at`]; nothing here reads the clock on its own.
///
/// Hour fields are kept on the [`HOUR_RESOLUTION`] grid and bounded by [`MAX_HOURS`].
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressLedger {
    sheet_id: SheetId,
    calendar: Calendar,
    title: Option<String>,
    start_date: Option<OffsetDateTime>,
    goal_date: Option<OffsetDateTime>,
    hours_per_day: f64,
    progress: Progress,
}

impl ProgressLedger {
    pub fn new(sheet_id: SheetId, calendar: Calendar) -> Self {
        Self::with_fields(sheet_id, calendar, SheetFields::default())
    }

    pub fn with_fields(sheet_id: SheetId, calendar: Calendar, fields: SheetFields) -> Self {
        let SheetFields {
            title,
            start_date,
            goal_date,
            done,
            delay,
            yet,
            total,
            hours_per_day,
        } = fields;

        let start_date = start_date.map(|at| calendar.midnight(at));
        let goal_date = goal_date.map(|at| calendar.midnight(at));
        let total = quantize_hours(non_negative(total).unwrap_or(DEFAULT_TOTAL));

        let hours_per_day = non_negative(hours_per_day)
            .or_else(|| match (start_date, goal_date) {
                (Some(start), Some(goal)) => derive_hours_per_day(start, goal, total),
                _ => None,
            })
            .unwrap_or(DEFAULT_HOURS_PER_DAY);

        let progress = Progress {
            done: non_negative(done).unwrap_or(0.0),
            delay: non_negative(delay).unwrap_or(0.0),
            yet: non_negative(yet).unwrap_or(0.0),
            total,
        }
        .repaired();

        Self {
            sheet_id,
            calendar,
            title,
            start_date,
            goal_date,
            hours_per_day,
            progress,
        }
    }

    pub fn sheet_id(&self) -> SheetId {
        self.sheet_id
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn start_date(&self) -> Option<OffsetDateTime> {
        self.start_date
    }

    pub fn goal_date(&self) -> Option<OffsetDateTime> {
        self.goal_date
    }

    pub fn hours_per_day(&self) -> f64 {
        self.hours_per_day
    }

    pub fn done(&self) -> f64 {
        self.progress.done
    }

    pub fn delay(&self) -> f64 {
        self.progress.delay
    }

    pub fn yet(&self) -> f64 {
        self.progress.yet
    }

    pub fn total(&self) -> f64 {
        self.progress.total
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub fn set_start_date(&mut self, start_date: Option<OffsetDateTime>) {
        self.start_date = start_date.map(|at| self.calendar.midnight(at));
    }

    pub fn set_goal_date(&mut self, goal_date: Option<OffsetDateTime>) {
        self.goal_date = goal_date.map(|at| self.calendar.midnight(at));
    }

    pub fn set_hours_per_day(&mut self, value: f64) -> Result<(), LedgerError> {
        let value = checked(LedgerField::HoursPerDay, value)?;
        self.hours_per_day = value;
        Ok(())
    }

    pub fn set_done(&mut self, value: f64) -> Result<(), LedgerError> {
        let value = quantize_hours(checked(LedgerField::Done, value)?);
        if value > self.progress.total {
            return Err(LedgerError::OutOfRange {
                field: LedgerField::Done,
                value,
            });
        }
        self.progress.done = value;
        self.progress.repair();
        Ok(())
    }

    pub fn set_delay(&mut self, value: f64) -> Result<(), LedgerError> {
        self.progress.delay = checked(LedgerField::Delay, value)?;
        self.progress.repair();
        Ok(())
    }

    pub fn set_yet(&mut self, value: f64) -> Result<(), LedgerError> {
        self.progress.yet = checked(LedgerField::Yet, value)?;
        self.progress.repair();
        Ok(())
    }

    /// Shrinking `total` below `done` pulls `done` down with it.
    pub fn set_total(&mut self, value: f64) -> Result<(), LedgerError> {
        let value = quantize_hours(checked(LedgerField::Total, value)?);
        self.progress.total = value;
        if self.progress.done > value {
            self.progress.done = value;
        }
        self.progress.repair();
        Ok(())
    }

    pub fn elapsed_time(&self, now: OffsetDateTime) -> i64 {
        self.elapsed_time_with(now, ElapsedMode::IgnoreTime)
    }

    /// Milliseconds since `start_date`, or 0 when the sheet has not started.
    pub fn elapsed_time_with(&self, now: OffsetDateTime, mode: ElapsedMode) -> i64 {
        let Some(start_date) = self.start_date else {
            return 0;
        };
        let now = match mode {
            ElapsedMode::IgnoreTime => self.calendar.midnight(now),
            ElapsedMode::Exact => now,
        };
        millis_between(start_date, now)
    }

    pub fn schedule_deviation(&self, now: OffsetDateTime) -> f64 {
        self.schedule_deviation_with(now, ElapsedMode::IgnoreTime)
    }

    /// Hours behind the planned pace at `now`; negative when ahead of it.
    pub fn schedule_deviation_with(&self, now: OffsetDateTime, mode: ElapsedMode) -> f64 {
        if self.start_date.is_none() {
            return 0.0;
        }

        let elapsed_hours = self.elapsed_time_with(now, mode).div_euclid(MS_PER_HOUR);
        let elapsed_days = elapsed_hours.div_euclid(24);
        let remaining_hours_in_today = (24 - elapsed_hours % 24) as f64;

        let mut estimated_hours = elapsed_days as f64 * self.hours_per_day;
        if remaining_hours_in_today < self.hours_per_day {
            estimated_hours += self.hours_per_day - remaining_hours_in_today;
        }

        estimated_hours - self.progress.done
    }

    pub fn scheduled_delay(&self, now: OffsetDateTime) -> f64 {
        self.schedule_deviation(now).max(0.0)
    }

    /// The triple as of `now`: `delay` follows the schedule and the rest is repaired around
    /// it. The ledger itself is left untouched.
    pub fn progress_at(&self, now: OffsetDateTime) -> Progress {
        Progress {
            delay: self.scheduled_delay(now),
            ..self.progress
        }
        .repaired()
    }

    pub fn apply_schedule(&mut self, now: OffsetDateTime) {
        self.progress = self.progress_at(now);
    }
}

fn in_hour_range(value: f64) -> bool {
    (0.0..=MAX_HOURS).contains(&value)
}

fn non_negative(value: Option<f64>) -> Option<f64> {
    value.filter(|v| in_hour_range(*v))
}

fn checked(field: LedgerField, value: f64) -> Result<f64, LedgerError> {
    if in_hour_range(value) {
        Ok(value)
    } else {
        Err(LedgerError::OutOfRange { field, value })
    }
}
