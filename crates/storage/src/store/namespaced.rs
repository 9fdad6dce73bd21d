#![forbid(unsafe_code)]

use super::{KeyValueStore, StoreError};
use gs_core::ids::SheetId;
use gs_core::{Calendar, to_millis};
use time::OffsetDateTime;

const TITLE: &str = "title";
const START_DATE: &str = "start_date";
const GOAL_DATE: &str = "goal_date";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyForm {
    /// `foo`
    #[default]
    Local,
    /// `sheet[1].foo`
    Raw,
}

/// View of the store scoped to one sheet: every name maps to `sheet[<id>].<name>`.
#[derive(Debug)]
pub struct NamespacedStore<'s, S: KeyValueStore> {
    store: &'s mut S,
    sheet_id: SheetId,
    prefix: String,
}

impl<'s, S: KeyValueStore> NamespacedStore<'s, S> {
    pub fn new(store: &'s mut S, sheet_id: SheetId) -> Self {
        Self {
            store,
            sheet_id,
            prefix: super::sheet_key(sheet_id),
        }
    }

    pub fn sheet_id(&self) -> SheetId {
        self.sheet_id
    }

    pub fn key_prefix(&self) -> &str {
        &self.prefix
    }

    pub fn key_for(&self, name: &str) -> String {
        format!("{}.{name}", self.prefix)
    }

    pub fn get(&self, name: &str) -> Result<Option<String>, StoreError> {
        self.store.get(&self.key_for(name))
    }

    pub fn get_or(&self, name: &str, default: &str) -> Result<String, StoreError> {
        self.store.get_or(&self.key_for(name), default)
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<(), StoreError> {
        let key = self.key_for(name);
        self.store.set(&key, value)
    }

    pub fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        let key = self.key_for(name);
        self.store.remove(&key)
    }

    /// Reads a millisecond timestamp written by [`Self::set_date`]. The result is in UTC.
    pub fn get_date(&self, name: &str) -> Result<Option<OffsetDateTime>, StoreError> {
        let Some(ms) = self.store.get_json::<i64>(&self.key_for(name))? else {
            return Ok(None);
        };
        Calendar::UTC
            .from_millis(ms)
            .map(Some)
            .ok_or(StoreError::InvalidInput("timestamp out of range"))
    }

    pub fn set_date(&mut self, name: &str, at: OffsetDateTime) -> Result<(), StoreError> {
        self.set(name, &to_millis(at).to_string())
    }

    /// Removes every key under this sheet's prefix. Walks the whole store.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        for key in self.keys(KeyForm::Raw)? {
            self.store.remove(&key)?;
        }
        Ok(())
    }

    pub fn keys(&self, form: KeyForm) -> Result<Vec<String>, StoreError> {
        let scoped = format!("{}.", self.prefix);
        let keys = self
            .store
            .keys()?
            .into_iter()
            .filter_map(|key| {
                let local = key.strip_prefix(&scoped)?.to_string();
                Some(match form {
                    KeyForm::Local => local,
                    KeyForm::Raw => key,
                })
            })
            .collect();
        Ok(keys)
    }

    pub fn title(&self) -> Result<Option<String>, StoreError> {
        self.get(TITLE)
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), StoreError> {
        self.set(TITLE, title)
    }

    pub fn start_date(&self) -> Result<Option<OffsetDateTime>, StoreError> {
        self.get_date(START_DATE)
    }

    pub fn set_start_date(&mut self, at: OffsetDateTime) -> Result<(), StoreError> {
        self.set_date(START_DATE, at)
    }

    pub fn goal_date(&self) -> Result<Option<OffsetDateTime>, StoreError> {
        self.get_date(GOAL_DATE)
    }

    pub fn set_goal_date(&mut self, at: OffsetDateTime) -> Result<(), StoreError> {
        self.set_date(GOAL_DATE, at)
    }
}
