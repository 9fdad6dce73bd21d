#![forbid(unsafe_code)]

use super::{KeyValueStore, StoreError};
use gs_core::ids::SheetId;

pub const SEQUENCE_KEY: &str = "sheet_id_sequence";
pub const INDEX_KEY: &str = "sheet_index";

/// Sheet id allocation plus the list of live sheets.
///
/// Allocation is a plain read-increment-write with no transaction around it. Two processes
/// sharing one store can hand out the same id.
#[derive(Debug)]
pub struct SheetRegistry<'s, S: KeyValueStore> {
    store: &'s mut S,
}

impl<'s, S: KeyValueStore> SheetRegistry<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    pub fn create_id(&mut self) -> Result<SheetId, StoreError> {
        let current = self.store.get_json_or::<u64>(SEQUENCE_KEY, 0)?;
        let next = current
            .checked_add(1)
            .ok_or(StoreError::InvalidInput("sheet id sequence overflow"))?;
        self.store.set(SEQUENCE_KEY, &next.to_string())?;
        tracing::debug!(sheet_id = next, "allocated sheet id");
        SheetId::try_new(next).map_err(|_| StoreError::InvalidInput("invalid sheet id"))
    }

    pub fn index(&self) -> Result<Vec<SheetId>, StoreError> {
        let raw = self.store.get_json_or::<Vec<u64>>(INDEX_KEY, Vec::new())?;
        let mut ids = Vec::with_capacity(raw.len());
        for value in raw {
            match SheetId::try_new(value) {
                Ok(id) => ids.push(id),
                Err(err) => tracing::warn!(value, "skipping sheet index entry: {err}"),
            }
        }
        Ok(ids)
    }

    pub fn contains(&self, sheet_id: SheetId) -> Result<bool, StoreError> {
        Ok(self.index()?.contains(&sheet_id))
    }

    /// Returns `false` when the id was already indexed.
    pub fn add_to_index(&mut self, sheet_id: SheetId) -> Result<bool, StoreError> {
        let mut ids = self.index()?;
        if ids.contains(&sheet_id) {
            return Ok(false);
        }
        ids.push(sheet_id);
        self.write_index(&ids)?;
        Ok(true)
    }

    /// Returns `false` when the id was not indexed.
    pub fn remove_from_index(&mut self, sheet_id: SheetId) -> Result<bool, StoreError> {
        let mut ids = self.index()?;
        let before = ids.len();
        ids.retain(|id| *id != sheet_id);
        if ids.len() == before {
            return Ok(false);
        }
        self.write_index(&ids)?;
        Ok(true)
    }

    fn write_index(&mut self, ids: &[SheetId]) -> Result<(), StoreError> {
        let raw = ids.iter().map(|id| id.get()).collect::<Vec<_>>();
        self.store.set_json(INDEX_KEY, &raw)
    }
}
