#![forbid(unsafe_code)]

use super::StoreError;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Flat string-keyed store. Keys carry no structure at this level; prefixes are the
/// business of [`super::NamespacedStore`].
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Every stored key. Callers must not rely on the order.
    fn keys(&self) -> Result<Vec<String>, StoreError>;

    fn clear(&mut self) -> Result<(), StoreError>;

    fn get_or(&self, key: &str, default: &str) -> Result<String, StoreError> {
        Ok(self.get(key)?.unwrap_or_else(|| default.to_string()))
    }

    fn has(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.keys()?.len())
    }

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn key_at(&self, index: usize) -> Result<Option<String>, StoreError> {
        Ok(self.keys()?.into_iter().nth(index))
    }

    /// `None` when the key is absent. Text that does not parse as `T` is an error.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                key: key.to_string(),
                source,
            })
    }

    /// `default` is returned as-is when the key is absent; it is never parsed.
    fn get_json_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, StoreError> {
        Ok(self.get_json(key)?.unwrap_or(default))
    }

    fn set_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(StoreError::Serialize)?;
        self.set(key, &raw)
    }
}
