//! `window.localStorage` backend

use wasm_bindgen::JsValue;
use web_sys::Storage;

use super::{KeyValueStore, StorageError};

/// LocalStorage handle (falls back to "unavailable" when the browser blocks it)
#[derive(Debug, Clone)]
pub struct LocalStore {
    storage: Option<Storage>,
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStore {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - scores and settings won't persist");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.storage.as_ref().ok_or(StorageError::Unavailable)
    }
}

fn rejected(key: &str, err: JsValue) -> StorageError {
    StorageError::Rejected {
        key: key.to_string(),
        reason: err.as_string().unwrap_or_else(|| format!("{:?}", err)),
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?.get_item(key).map_err(|e| rejected(key, e))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| rejected(key, e))
    }
}
