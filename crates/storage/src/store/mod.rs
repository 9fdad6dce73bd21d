#![forbid(unsafe_code)]

mod error;
mod kv;
mod memory;
mod namespaced;
mod registry;
mod sheets;
mod sqlite;

pub use error::StoreError;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use namespaced::{KeyForm, NamespacedStore};
pub use registry::{INDEX_KEY, SEQUENCE_KEY, SheetRegistry};
pub use sheets::{SheetRecord, Sheets, sheet_key};
pub use sqlite::SqliteKvStore;
