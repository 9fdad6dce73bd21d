#![forbid(unsafe_code)]

use time::{Date, OffsetDateTime, Time, UtcOffset};

pub const MS_PER_HOUR: i64 = 60 * 60 * 1000;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Calendar days are evaluated in a fixed UTC offset, so "midnight" means the same instant
/// for every date a sheet stores or compares against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Calendar {
    offset: UtcOffset,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::UTC
    }
}

impl Calendar {
    pub const UTC: Self = Self {
        offset: UtcOffset::UTC,
    };

    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Drops the time-of-day part of `at`, as seen from this calendar's offset.
    pub fn midnight(&self, at: OffsetDateTime) -> OffsetDateTime {
        at.to_offset(self.offset).replace_time(Time::MIDNIGHT)
    }

    pub fn at_midnight(&self, date: Date) -> OffsetDateTime {
        date.midnight().assume_offset(self.offset)
    }

    pub fn from_millis(&self, ms: i64) -> Option<OffsetDateTime> {
        let nanos = i128::from(ms) * 1_000_000;
        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .ok()
            .map(|at| at.to_offset(self.offset))
    }
}

pub fn to_millis(at: OffsetDateTime) -> i64 {
    let ms = at.unix_timestamp_nanos().div_euclid(1_000_000);
    i64::try_from(ms).unwrap_or(if ms < 0 { i64::MIN } else { i64::MAX })
}

pub fn millis_between(from: OffsetDateTime, to: OffsetDateTime) -> i64 {
    to_millis(to).saturating_sub(to_millis(from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};

    #[test]
    fn midnight_truncates_in_calendar_offset() {
        let tokyo = Calendar::new(offset!(+9));
        let at = datetime!(2014-03-02 20:30 UTC);
        assert_eq!(tokyo.midnight(at), datetime!(2014-03-03 0:00 +9));
        assert_eq!(Calendar::UTC.midnight(at), datetime!(2014-03-02 0:00 UTC));
    }

    #[test]
    fn millis_roundtrip_keeps_offset() {
        let tokyo = Calendar::new(offset!(+9));
        let start = tokyo.at_midnight(date!(2014-03-02));
        let ms = to_millis(start);
        let back = tokyo.from_millis(ms).expect("millis in range");
        assert_eq!(back, start);
        assert_eq!(back.offset(), offset!(+9));
    }

    #[test]
    fn millis_between_counts_whole_days() {
        let start = datetime!(2014-03-02 0:00 UTC);
        let goal = datetime!(2014-03-05 0:00 UTC);
        assert_eq!(millis_between(start, goal), 3 * MS_PER_DAY);
        assert_eq!(millis_between(goal, start), -3 * MS_PER_DAY);
    }
}
