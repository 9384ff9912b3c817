//! Mixtape Storage
//!
//! Persistence adapters and the track list for Mixtape.
//!
//! This crate provides:
//! - `MemoryStore`: in-memory `KeyValueStore` (tests, ephemeral sessions)
//! - `JsonFileStore`: `KeyValueStore` persisted as one JSON object file
//! - `TrackStore`: the ordered, persisted track list
//! - Upload intake: turning user-chosen files into `NewTrack` records with
//!   session-scoped media references
//!
//! # Example
//!
//! ```rust
//! use mixtape_core::{MediaRef, NewTrack};
//! use mixtape_storage::{MemoryStore, TrackStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new());
//! let mut tracks = TrackStore::open(Arc::clone(&store));
//!
//! tracks.add(vec![NewTrack::new("song.mp3", MediaRef::new("blob:mixtape/1"))]);
//! assert_eq!(tracks.len(), 1);
//!
//! // A second store over the same backing data sees the persisted list
//! let reopened = TrackStore::open(store);
//! assert_eq!(reopened.all()[0].title, "song.mp3");
//! ```

mod error;
mod file;
pub mod intake;
mod memory;
mod track_store;

pub use error::{Result, StorageError};
pub use file::JsonFileStore;
pub use intake::{intake_files, is_audio_file, ObjectUrlRegistry, UploadedFile};
pub use memory::MemoryStore;
pub use track_store::TrackStore;
