//! `localStorage`-backed key-value store

use mixtape_core::{CoreError, KeyValueStore, Result};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// `KeyValueStore` over the window's `localStorage`
pub struct WebStorage {
    storage: Storage,
}

impl WebStorage {
    /// Open the current window's `localStorage`
    ///
    /// Returns `None` outside a window context or when storage is disabled.
    pub fn local() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

fn js_error(op: &str, key: &str, e: &JsValue) -> CoreError {
    CoreError::storage(format!("localStorage {op} {key:?} failed: {e:?}"))
}

impl KeyValueStore for WebStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| js_error("get", key, &e))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| js_error("set", key, &e))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| js_error("remove", key, &e))
    }
}
