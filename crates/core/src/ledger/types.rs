#![forbid(unsafe_code)]

use time::OffsetDateTime;

/// Partial field set used to build a ledger. `None` means "use the default"
/// (or derive, for `hours_per_day`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SheetFields {
    pub title: Option<String>,
    pub start_date: Option<OffsetDateTime>,
    pub goal_date: Option<OffsetDateTime>,
    pub done: Option<f64>,
    pub delay: Option<f64>,
    pub yet: Option<f64>,
    pub total: Option<f64>,
    pub hours_per_day: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    pub done: f64,
    pub delay: f64,
    pub yet: f64,
    pub total: f64,
}

impl Progress {
    pub fn is_consistent(&self) -> bool {
        self.done + self.delay + self.yet == self.total
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ElapsedMode {
    /// Compare whole calendar days: `now` is truncated to midnight first.
    #[default]
    IgnoreTime,
    Exact,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerField {
    Done,
    Delay,
    Yet,
    Total,
    HoursPerDay,
}

impl LedgerField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Delay => "delay",
            Self::Yet => "yet",
            Self::Total => "total",
            Self::HoursPerDay => "hours_per_day",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LedgerError {
    OutOfRange { field: LedgerField, value: f64 },
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { field, value } => {
                write!(f, "{} out of range (value={value})", field.as_str())
            }
        }
    }
}

impl std::error::Error for LedgerError {}
