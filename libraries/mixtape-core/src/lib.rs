//! Mixtape Core
//!
//! Platform-agnostic core types, the persistence port and error handling
//! shared by every Mixtape crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `NewTrack`, `TrackId`, `MediaRef`
//! - **Persistence Port**: the `KeyValueStore` trait and its fixed keys
//! - **Error Handling**: unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use mixtape_core::{keys, KeyValueStore, MediaRef, Track, TrackId};
//! use std::cell::RefCell;
//! use std::collections::HashMap;
//!
//! #[derive(Default)]
//! struct Scratch(RefCell<HashMap<String, String>>);
//!
//! impl KeyValueStore for Scratch {
//!     fn get(&self, key: &str) -> mixtape_core::Result<Option<String>> {
//!         Ok(self.0.borrow().get(key).cloned())
//!     }
//!     fn set(&self, key: &str, value: &str) -> mixtape_core::Result<()> {
//!         self.0.borrow_mut().insert(key.to_string(), value.to_string());
//!         Ok(())
//!     }
//!     fn remove(&self, key: &str) -> mixtape_core::Result<()> {
//!         self.0.borrow_mut().remove(key);
//!         Ok(())
//!     }
//! }
//!
//! let store = Scratch::default();
//! let track = Track::new(TrackId::new(1), "intro.mp3", MediaRef::new("blob:mixtape/1"));
//! store.set(keys::PLAYLIST, &serde_json::to_string(&vec![track]).unwrap()).unwrap();
//! assert!(store.get(keys::PLAYLIST).unwrap().is_some());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use storage::{keys, KeyValueStore};
pub use types::{MediaRef, NewTrack, Track, TrackId};
