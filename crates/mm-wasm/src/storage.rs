//! `localStorage`-backed key-value store.

use mm_core::persist::{KeyValueStore, PersistError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// The window's `localStorage`, if the browser grants it.
///
/// Private browsing modes may refuse storage entirely; every call then
/// fails with `PersistError::Unavailable` and the editor keeps running.
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage is not available; changes will not be saved");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, PersistError> {
        self.storage
            .as_ref()
            .ok_or_else(|| PersistError::Unavailable("localStorage is not available".into()))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.storage()?.set_item(key, value).map_err(js_error)
    }
}

fn js_error(e: JsValue) -> PersistError {
    PersistError::Unavailable(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}
