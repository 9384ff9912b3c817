//! Persistence port
//!
//! Every piece of persisted state (the playlist, the last played index and
//! position) goes through a single local key-value store. Hosts provide the
//! store: an in-memory map in tests, a JSON file natively, `localStorage` in
//! the browser.

use crate::error::Result;
use std::rc::Rc;
use std::sync::Arc;

/// Fixed keys in the local key-value store
pub mod keys {
    /// Serialized track list (JSON array of `Track`)
    pub const PLAYLIST: &str = "playlist";

    /// Last played track index (stringified integer)
    pub const LAST_PLAYED_INDEX: &str = "lastPlayedIndex";

    /// Last played position in seconds (stringified float)
    pub const LAST_PLAYED_TIME: &str = "lastPlayedTime";
}

/// Local key-value store
///
/// Values are opaque strings and every write is a full-value overwrite, so
/// reordered writes never need a read-modify-write cycle. All methods take
/// `&self`; implementations use interior mutability so one store can be
/// shared by the track store and the playback controller.
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key` (absent keys are not an error)
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
