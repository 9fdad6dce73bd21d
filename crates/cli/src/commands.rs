#![forbid(unsafe_code)]

use crate::config::{CliConfig, OutputFormat, parse_date, parse_hours, parse_sheet_id};
use crate::render::{JsonRenderer, ProgressRenderer, TextRenderer};
use clap::{Args, Subcommand};
use gs_core::ids::SheetId;
use gs_core::{Calendar, LedgerError, ProgressLedger, SheetFields};
use gs_storage::{KeyValueStore, Sheets, SqliteKvStore};
use std::error::Error;
use time::{Date, OffsetDateTime};

type CommandResult = Result<(), Box<dyn Error>>;

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Create a sheet and print it.
    New(NewArgs),
    /// Print every known sheet.
    List(AtArgs),
    /// Print one sheet.
    Show(ShowArgs),
    /// Change fields of a sheet. Out-of-range values are skipped with a warning.
    Set(SetArgs),
    /// Add practiced hours to a sheet.
    Log(LogArgs),
    /// Delete a sheet and everything stored under it.
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
pub(crate) struct NewArgs {
    #[arg(long)]
    title: Option<String>,
    /// First day of practice (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    start: Option<Date>,
    /// Day the goal should be reached (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    goal: Option<Date>,
    /// Hours required to reach the goal (default: 1000).
    #[arg(long, value_parser = parse_hours)]
    total: Option<f64>,
    /// Planned pace; derived from start, goal and total when omitted.
    #[arg(long, value_parser = parse_hours)]
    hours_per_day: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct AtArgs {
    /// Evaluate the schedule as of this day instead of today (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    at: Option<Date>,
}

#[derive(Args, Debug)]
pub(crate) struct ShowArgs {
    #[arg(value_parser = parse_sheet_id)]
    id: SheetId,
    #[command(flatten)]
    at: AtArgs,
}

#[derive(Args, Debug)]
pub(crate) struct SetArgs {
    #[arg(value_parser = parse_sheet_id)]
    id: SheetId,
    #[arg(long)]
    title: Option<String>,
    #[arg(long, value_parser = parse_date)]
    start: Option<Date>,
    #[arg(long, value_parser = parse_date)]
    goal: Option<Date>,
    #[arg(long, value_parser = parse_hours)]
    total: Option<f64>,
    #[arg(long, value_parser = parse_hours)]
    done: Option<f64>,
    #[arg(long, value_parser = parse_hours)]
    hours_per_day: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct LogArgs {
    #[arg(value_parser = parse_sheet_id)]
    id: SheetId,
    #[arg(value_parser = parse_hours, allow_negative_numbers = true)]
    hours: f64,
}

#[derive(Args, Debug)]
pub(crate) struct RemoveArgs {
    #[arg(value_parser = parse_sheet_id)]
    id: SheetId,
}

pub(crate) fn run(command: Command, config: &CliConfig) -> CommandResult {
    let mut store = SqliteKvStore::open(&config.storage_dir)?;
    let mut sheets = Sheets::new(&mut store, config.calendar);
    let stdout = std::io::stdout();
    let mut renderer: Box<dyn ProgressRenderer> = match config.output {
        OutputFormat::Text => Box::new(TextRenderer::new(stdout.lock())),
        OutputFormat::Json => Box::new(JsonRenderer::new(stdout.lock())),
    };

    match command {
        Command::New(args) => new_sheet(&mut sheets, renderer.as_mut(), args),
        Command::List(args) => list(&mut sheets, renderer.as_mut(), args),
        Command::Show(args) => show(&sheets, renderer.as_mut(), args),
        Command::Set(args) => set(&mut sheets, renderer.as_mut(), args),
        Command::Log(args) => log_hours(&mut sheets, renderer.as_mut(), args),
        Command::Remove(args) => remove(&mut sheets, args),
    }
}

fn new_sheet<S: KeyValueStore>(
    sheets: &mut Sheets<'_, S>,
    renderer: &mut dyn ProgressRenderer,
    args: NewArgs,
) -> CommandResult {
    let calendar = sheets.calendar();
    let ledger = sheets.create(SheetFields {
        title: args.title,
        start_date: args.start.map(|date| calendar.at_midnight(date)),
        goal_date: args.goal.map(|date| calendar.at_midnight(date)),
        total: args.total,
        hours_per_day: args.hours_per_day,
        ..SheetFields::default()
    })?;
    tracing::info!(sheet_id = %ledger.sheet_id(), "created sheet");
    renderer.render(&ledger, &ledger.progress())?;
    Ok(())
}

fn list<S: KeyValueStore>(
    sheets: &mut Sheets<'_, S>,
    renderer: &mut dyn ProgressRenderer,
    args: AtArgs,
) -> CommandResult {
    let now = evaluation_time(sheets.calendar(), args.at);
    for ledger in sheets.load_all()? {
        renderer.render(&ledger, &ledger.progress_at(now))?;
    }
    Ok(())
}

fn show<S: KeyValueStore>(
    sheets: &Sheets<'_, S>,
    renderer: &mut dyn ProgressRenderer,
    args: ShowArgs,
) -> CommandResult {
    let ledger = require_sheet(sheets, args.id)?;
    let now = evaluation_time(sheets.calendar(), args.at.at);
    renderer.render(&ledger, &ledger.progress_at(now))?;
    Ok(())
}

fn set<S: KeyValueStore>(
    sheets: &mut Sheets<'_, S>,
    renderer: &mut dyn ProgressRenderer,
    args: SetArgs,
) -> CommandResult {
    let mut ledger = require_sheet(sheets, args.id)?;
    let calendar = sheets.calendar();

    if let Some(title) = args.title {
        ledger.set_title(Some(title).filter(|title| !title.is_empty()));
    }
    if let Some(start) = args.start {
        ledger.set_start_date(Some(calendar.at_midnight(start)));
    }
    if let Some(goal) = args.goal {
        ledger.set_goal_date(Some(calendar.at_midnight(goal)));
    }
    // total before done, so raising both in one call works
    if let Some(total) = args.total {
        warn_rejected(ledger.set_total(total));
    }
    if let Some(done) = args.done {
        warn_rejected(ledger.set_done(done));
    }
    if let Some(hours_per_day) = args.hours_per_day {
        warn_rejected(ledger.set_hours_per_day(hours_per_day));
    }

    sheets.save(&ledger)?;
    renderer.render(&ledger, &ledger.progress())?;
    Ok(())
}

fn log_hours<S: KeyValueStore>(
    sheets: &mut Sheets<'_, S>,
    renderer: &mut dyn ProgressRenderer,
    args: LogArgs,
) -> CommandResult {
    let mut ledger = require_sheet(sheets, args.id)?;
    let done = ledger.done() + args.hours;
    ledger
        .set_done(done)
        .map_err(|err| format!("cannot log {} hours on sheet {}: {err}", args.hours, args.id))?;
    sheets.save(&ledger)?;
    tracing::info!(sheet_id = %args.id, hours = args.hours, done, "logged hours");
    renderer.render(&ledger, &ledger.progress())?;
    Ok(())
}

fn remove<S: KeyValueStore>(sheets: &mut Sheets<'_, S>, args: RemoveArgs) -> CommandResult {
    let indexed = sheets.registry().contains(args.id)?;
    if !indexed && sheets.find(args.id)?.is_none() {
        return Err(format!("unknown sheet {}", args.id).into());
    }
    sheets.remove(args.id)?;
    println!("removed sheet {}", args.id);
    Ok(())
}

fn require_sheet<S: KeyValueStore>(
    sheets: &Sheets<'_, S>,
    sheet_id: SheetId,
) -> Result<ProgressLedger, Box<dyn Error>> {
    sheets
        .find(sheet_id)?
        .ok_or_else(|| format!("unknown sheet {sheet_id}").into())
}

fn evaluation_time(calendar: Calendar, at: Option<Date>) -> OffsetDateTime {
    match at {
        Some(date) => calendar.at_midnight(date),
        None => OffsetDateTime::now_utc(),
    }
}

fn warn_rejected(result: Result<(), LedgerError>) {
    if let Err(err) = result {
        tracing::warn!("value rejected, keeping the previous one: {err}");
    }
}
