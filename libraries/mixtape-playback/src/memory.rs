//! Persisted playback position
//!
//! Last-played index and position live in the shared key-value store as
//! stringified numbers. Anything unreadable is treated as absent.

use mixtape_core::{keys, KeyValueStore};

/// Restore-on-start storage for the playback controller
pub struct PlaybackMemory<S> {
    store: S,
}

impl<S: KeyValueStore> PlaybackMemory<S> {
    /// Wrap `store`
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Last persisted track index
    pub fn load_index(&self) -> Option<usize> {
        let raw = self.read(keys::LAST_PLAYED_INDEX)?;
        let index = raw.trim().parse::<usize>().ok();
        if index.is_none() {
            tracing::debug!("Ignoring malformed persisted index {:?}", raw);
        }
        index
    }

    /// Last persisted position in seconds (finite and non-negative)
    pub fn load_position(&self) -> Option<f64> {
        let raw = self.read(keys::LAST_PLAYED_TIME)?;
        let position = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite() && *t >= 0.0);
        if position.is_none() {
            tracing::debug!("Ignoring malformed persisted position {:?}", raw);
        }
        position
    }

    /// Persist the current track index
    pub fn save_index(&self, index: usize) {
        self.write(keys::LAST_PLAYED_INDEX, &index.to_string());
    }

    /// Persist the current position
    pub fn save_position(&self, secs: f64) {
        if !secs.is_finite() || secs < 0.0 {
            return;
        }
        self.write(keys::LAST_PLAYED_TIME, &secs.to_string());
    }

    /// Backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", key, e);
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!("Failed to persist {}: {}", key, e);
        }
    }
}
