#![forbid(unsafe_code)]

use gs_core::{Progress, ProgressLedger};
use serde_json::{Value, json};
use std::io::{self, Write};
use time::OffsetDateTime;
use time::macros::format_description;

const BAR_WIDTH: usize = 50;

/// Receives each sheet together with the triple computed for it.
pub(crate) trait ProgressRenderer {
    fn render(&mut self, ledger: &ProgressLedger, progress: &Progress) -> io::Result<()>;
}

pub(crate) struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ProgressRenderer for TextRenderer<W> {
    fn render(&mut self, ledger: &ProgressLedger, progress: &Progress) -> io::Result<()> {
        let title = ledger.title().unwrap_or("(untitled)");
        writeln!(self.out, "#{} {title}", ledger.sheet_id())?;
        writeln!(
            self.out,
            "  start {}  goal {}  pace {:.2} h/day",
            format_date(ledger.start_date()),
            format_date(ledger.goal_date()),
            ledger.hours_per_day()
        )?;
        writeln!(
            self.out,
            "  done {:.2}  delay {:.2}  yet {:.2}  total {:.2}",
            progress.done, progress.delay, progress.yet, progress.total
        )?;
        writeln!(self.out, "  [{}]", bar(progress, BAR_WIDTH))
    }
}

pub(crate) struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ProgressRenderer for JsonRenderer<W> {
    fn render(&mut self, ledger: &ProgressLedger, progress: &Progress) -> io::Result<()> {
        writeln!(self.out, "{}", sheet_json(ledger, progress))
    }
}

pub(crate) fn sheet_json(ledger: &ProgressLedger, progress: &Progress) -> Value {
    json!({
        "id": ledger.sheet_id().get(),
        "title": ledger.title(),
        "startDate": ledger.start_date().map(|at| format_date(Some(at))),
        "goalDate": ledger.goal_date().map(|at| format_date(Some(at))),
        "hoursPerDay": ledger.hours_per_day(),
        "done": progress.done,
        "delay": progress.delay,
        "yet": progress.yet,
        "total": progress.total,
    })
}

fn format_date(at: Option<OffsetDateTime>) -> String {
    let Some(at) = at else {
        return "-".to_string();
    };
    at.date()
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| at.date().to_string())
}

/// `#` done, `!` delay, `.` yet, scaled to `width` cells.
pub(crate) fn bar(progress: &Progress, width: usize) -> String {
    if progress.total <= 0.0 {
        return " ".repeat(width);
    }
    let cells = |hours: f64| -> usize {
        let scaled = (hours / progress.total * width as f64).round();
        (scaled.max(0.0) as usize).min(width)
    };
    let done = cells(progress.done);
    let delay = cells(progress.done + progress.delay).saturating_sub(done);
    let yet = width - done - delay;
    format!("{}{}{}", "#".repeat(done), "!".repeat(delay), ".".repeat(yet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_core::ids::SheetId;
    use gs_core::{Calendar, SheetFields};
    use time::macros::datetime;

    fn progress(done: f64, delay: f64, yet: f64) -> Progress {
        Progress {
            done,
            delay,
            yet,
            total: done + delay + yet,
        }
    }

    #[test]
    fn bar_splits_cells_by_share() {
        assert_eq!(bar(&progress(20.0, 10.0, 70.0), 10), "##!.......");
        assert_eq!(bar(&progress(0.0, 0.0, 1000.0), 5), ".....");
        assert_eq!(bar(&progress(1000.0, 0.0, 0.0), 5), "#####");
        assert_eq!(bar(&progress(0.0, 0.0, 0.0), 3), "   ");
    }

    #[test]
    fn text_renderer_prints_triple_and_dates() {
        let ledger = ProgressLedger::with_fields(
            SheetId::try_new(3).expect("sheet id"),
            Calendar::UTC,
            SheetFields {
                title: Some("piano".to_string()),
                start_date: Some(datetime!(2014-03-02 0:00 UTC)),
                done: Some(6.0),
                hours_per_day: Some(8.0),
                ..SheetFields::default()
            },
        );
        let progress = ledger.progress_at(datetime!(2014-03-03 0:00 UTC));

        let mut out = Vec::new();
        TextRenderer::new(&mut out)
            .render(&ledger, &progress)
            .expect("render");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("#3 piano\n"), "{text}");
        assert!(text.contains("start 2014-03-02  goal -"), "{text}");
        assert!(text.contains("done 6.00  delay 2.00  yet 992.00  total 1000.00"), "{text}");
    }

    #[test]
    fn json_renderer_writes_one_object_per_line() {
        let ledger = ProgressLedger::new(SheetId::try_new(1).expect("sheet id"), Calendar::UTC);
        let mut out = Vec::new();
        JsonRenderer::new(&mut out)
            .render(&ledger, &ledger.progress())
            .expect("render");
        let text = String::from_utf8(out).expect("utf8");
        let value: Value = serde_json::from_str(text.trim_end()).expect("json");
        assert_eq!(value["id"], json!(1));
        assert_eq!(value["title"], Value::Null);
        assert_eq!(value["yet"], json!(1000.0));
    }
}
