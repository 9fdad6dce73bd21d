#![forbid(unsafe_code)]

use super::{KeyValueStore, NamespacedStore, SheetRegistry, StoreError};
use gs_core::ids::SheetId;
use gs_core::{Calendar, ProgressLedger, SheetFields, to_millis};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub fn sheet_key(sheet_id: SheetId) -> String {
    format!("sheet[{sheet_id}]")
}

/// Stored shape of one sheet under `sheet[<id>]`. Dates are epoch milliseconds.
///
/// Every field is optional so records written before `delay`/`yet` were stored still load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetRecord {
    pub title: Option<String>,
    pub start_date: Option<i64>,
    pub goal_date: Option<i64>,
    pub done: Option<f64>,
    pub delay: Option<f64>,
    pub yet: Option<f64>,
    pub total: Option<f64>,
    pub hours_per_day: Option<f64>,
}

impl SheetRecord {
    pub fn from_ledger(ledger: &ProgressLedger) -> Self {
        Self {
            title: ledger.title().map(str::to_string),
            start_date: ledger.start_date().map(to_millis),
            goal_date: ledger.goal_date().map(to_millis),
            done: Some(ledger.done()),
            delay: Some(ledger.delay()),
            yet: Some(ledger.yet()),
            total: Some(ledger.total()),
            hours_per_day: Some(ledger.hours_per_day()),
        }
    }

    pub fn into_fields(self, calendar: Calendar) -> SheetFields {
        SheetFields {
            title: self.title,
            start_date: self.start_date.and_then(|ms| date_from_millis(calendar, ms)),
            goal_date: self.goal_date.and_then(|ms| date_from_millis(calendar, ms)),
            done: self.done,
            delay: self.delay,
            yet: self.yet,
            total: self.total,
            hours_per_day: self.hours_per_day,
        }
    }
}

fn date_from_millis(calendar: Calendar, ms: i64) -> Option<OffsetDateTime> {
    let at = calendar.from_millis(ms);
    if at.is_none() {
        tracing::warn!(timestamp = ms, "ignoring out-of-range sheet date");
    }
    at
}

/// Loads, saves and removes ledgers, keeping the registry index in step.
#[derive(Debug)]
pub struct Sheets<'s, S: KeyValueStore> {
    store: &'s mut S,
    calendar: Calendar,
}

impl<'s, S: KeyValueStore> Sheets<'s, S> {
    pub fn new(store: &'s mut S, calendar: Calendar) -> Self {
        Self { store, calendar }
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    pub fn registry(&mut self) -> SheetRegistry<'_, S> {
        SheetRegistry::new(&mut *self.store)
    }

    pub fn index(&mut self) -> Result<Vec<SheetId>, StoreError> {
        self.registry().index()
    }

    /// Allocates an id, builds the ledger and saves it.
    pub fn create(&mut self, fields: SheetFields) -> Result<ProgressLedger, StoreError> {
        let sheet_id = self.registry().create_id()?;
        let ledger = ProgressLedger::with_fields(sheet_id, self.calendar, fields);
        self.save(&ledger)?;
        Ok(ledger)
    }

    /// A sheet with no stored record loads with defaults.
    pub fn load(&self, sheet_id: SheetId) -> Result<ProgressLedger, StoreError> {
        Ok(self.find(sheet_id)?.unwrap_or_else(|| {
            ProgressLedger::with_fields(sheet_id, self.calendar, SheetFields::default())
        }))
    }

    pub fn find(&self, sheet_id: SheetId) -> Result<Option<ProgressLedger>, StoreError> {
        let Some(record) = self.store.get_json::<SheetRecord>(&sheet_key(sheet_id))? else {
            return Ok(None);
        };
        tracing::debug!(%sheet_id, "loaded sheet");
        Ok(Some(ProgressLedger::with_fields(
            sheet_id,
            self.calendar,
            record.into_fields(self.calendar),
        )))
    }

    pub fn load_all(&mut self) -> Result<Vec<ProgressLedger>, StoreError> {
        let ids = self.index()?;
        ids.into_iter().map(|sheet_id| self.load(sheet_id)).collect()
    }

    pub fn save(&mut self, ledger: &ProgressLedger) -> Result<(), StoreError> {
        let sheet_id = ledger.sheet_id();
        self.store
            .set_json(&sheet_key(sheet_id), &SheetRecord::from_ledger(ledger))?;
        let indexed = self.registry().add_to_index(sheet_id)?;
        tracing::debug!(%sheet_id, indexed, "saved sheet");
        Ok(())
    }

    /// Drops the stored record, any `sheet[<id>].*` scalars, and the index entry.
    pub fn remove(&mut self, sheet_id: SheetId) -> Result<(), StoreError> {
        self.store.remove(&sheet_key(sheet_id))?;
        NamespacedStore::new(&mut *self.store, sheet_id).clear()?;
        let unindexed = self.registry().remove_from_index(sheet_id)?;
        tracing::debug!(%sheet_id, unindexed, "removed sheet");
        Ok(())
    }
}
