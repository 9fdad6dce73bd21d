#![forbid(unsafe_code)]

mod calendar;
mod ledger;

pub use calendar::*;
pub use ledger::*;

pub mod ids {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct SheetId(u64);

    impl SheetId {
        pub fn get(self) -> u64 {
            self.0
        }

        pub fn try_new(value: u64) -> Result<Self, SheetIdError> {
            if value == 0 {
                return Err(SheetIdError::Zero);
            }
            Ok(Self(value))
        }

        pub fn parse(value: &str) -> Result<Self, SheetIdError> {
            let value = value.trim();
            if value.is_empty() {
                return Err(SheetIdError::Empty);
            }
            let raw = value
                .parse::<u64>()
                .map_err(|_| SheetIdError::NotANumber)?;
            Self::try_new(raw)
        }
    }

    impl std::fmt::Display for SheetId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum SheetIdError {
        Empty,
        NotANumber,
        Zero,
    }

    impl SheetIdError {
        pub fn message(&self) -> &'static str {
            match self {
                Self::Empty => "sheet id must not be empty",
                Self::NotANumber => "sheet id must be a positive integer",
                Self::Zero => "sheet id must be greater than zero",
            }
        }
    }

    impl std::fmt::Display for SheetIdError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.message())
        }
    }

    impl std::error::Error for SheetIdError {}
}
