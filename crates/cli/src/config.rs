#![forbid(unsafe_code)]

use clap::{ArgAction, Args};
use gs_core::Calendar;
use gs_core::ids::SheetId;
use std::path::PathBuf;
use time::macros::format_description;
use time::{Date, UtcOffset};

pub(crate) const DEFAULT_STORAGE_DIR: &str = ".goalsheet";
pub(crate) const LOG_ENV: &str = "GOALSHEET_LOG";

#[derive(Args, Debug, Clone)]
pub(crate) struct GlobalArgs {
    /// Directory holding goalsheet.db (default: .goalsheet).
    #[arg(
        long,
        global = true,
        env = "GOALSHEET_STORAGE_DIR",
        value_name = "DIR"
    )]
    pub(crate) storage_dir: Option<PathBuf>,

    /// Offset in which a day starts and ends, e.g. +09:00 (default: UTC).
    #[arg(
        long,
        global = true,
        env = "GOALSHEET_UTC_OFFSET",
        value_name = "OFFSET",
        value_parser = parse_utc_offset
    )]
    pub(crate) utc_offset: Option<UtcOffset>,

    /// One JSON object per sheet instead of text.
    #[arg(long, global = true, default_value_t = false)]
    pub(crate) json: bool,

    /// More log output on stderr (repeat for more). GOALSHEET_LOG overrides it.
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub(crate) verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Debug)]
pub(crate) struct CliConfig {
    pub(crate) storage_dir: PathBuf,
    pub(crate) calendar: Calendar,
    pub(crate) output: OutputFormat,
    pub(crate) log_filter: String,
}

impl CliConfig {
    pub(crate) fn resolve(args: &GlobalArgs) -> Self {
        let log_filter = std::env::var(LOG_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| verbosity_filter(args.verbose).to_string());
        Self {
            storage_dir: args
                .storage_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR)),
            calendar: Calendar::new(args.utc_offset.unwrap_or(UtcOffset::UTC)),
            output: if args.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            log_filter,
        }
    }
}

fn verbosity_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

pub(crate) fn parse_utc_offset(value: &str) -> Result<UtcOffset, String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("utc") || value.eq_ignore_ascii_case("z") {
        return Ok(UtcOffset::UTC);
    }
    UtcOffset::parse(
        value,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .map_err(|err| format!("expected an offset like +09:00 ({err})"))
}

pub(crate) fn parse_date(value: &str) -> Result<Date, String> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|err| format!("expected a date like 2014-03-02 ({err})"))
}

pub(crate) fn parse_sheet_id(value: &str) -> Result<SheetId, String> {
    SheetId::parse(value).map_err(|err| err.message().to_string())
}

pub(crate) fn parse_hours(value: &str) -> Result<f64, String> {
    let hours = value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("expected a number of hours (got {value})"))?;
    if !hours.is_finite() {
        return Err(format!("expected a finite number of hours (got {value})"));
    }
    Ok(hours)
}
