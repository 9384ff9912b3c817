//! Mixtape - Playback Control
//!
//! Platform-agnostic playback controller for Mixtape.
//!
//! This crate provides:
//! - Transport state (idle, paused, playing) with play/pause/toggle
//! - Track navigation with wrap-around (next, previous, select)
//! - Auto-advance when a track ends (the playlist loops)
//! - Volume control (0.0 - 1.0, mute preserves the level)
//! - Seeking and position/duration telemetry
//! - Restore-on-start of the last-played track and position
//! - Event queue for UI synchronization
//!
//! # Architecture
//!
//! `mixtape-playback` does no decoding and no output itself:
//! - Playback goes through the `MediaPrimitive` trait
//! - Progress comes back as `MediaSignal`s, tagged with a `LoadToken`
//! - Persistence goes through `mixtape_core::KeyValueStore`
//!
//! The `wasm` feature adds browser bindings (`localStorage`, `<audio>`).
//!
//! # Example
//!
//! ```rust
//! use mixtape_core::{KeyValueStore, MediaRef, Result as CoreResult, Track, TrackId};
//! use mixtape_playback::{
//!     LoadToken, MediaPrimitive, MediaSignal, PlaybackConfig, PlaybackController,
//!     PlaybackState, Result,
//! };
//!
//! // Implement MediaPrimitive for your platform
//! #[derive(Default)]
//! struct Silent {
//!     token: Option<LoadToken>,
//! }
//!
//! impl MediaPrimitive for Silent {
//!     fn load(&mut self, token: LoadToken, _media_ref: &MediaRef) {
//!         self.token = Some(token);
//!     }
//!     fn unload(&mut self) {}
//!     fn play(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!     fn pause(&mut self) {}
//!     fn current_time(&self) -> f64 {
//!         0.0
//!     }
//!     fn set_current_time(&mut self, _secs: f64) {}
//!     fn duration(&self) -> f64 {
//!         180.0
//!     }
//!     fn set_volume(&mut self, _volume: f32) {}
//! }
//!
//! // Any KeyValueStore works; this one forgets everything
//! struct NoStore;
//!
//! impl KeyValueStore for NoStore {
//!     fn get(&self, _key: &str) -> CoreResult<Option<String>> {
//!         Ok(None)
//!     }
//!     fn set(&self, _key: &str, _value: &str) -> CoreResult<()> {
//!         Ok(())
//!     }
//!     fn remove(&self, _key: &str) -> CoreResult<()> {
//!         Ok(())
//!     }
//! }
//!
//! let mut controller =
//!     PlaybackController::new(Silent::default(), NoStore, PlaybackConfig::default());
//!
//! controller.set_queue(vec![
//!     Track::new(TrackId::new(1), "A", MediaRef::new("blob:mixtape/a")),
//!     Track::new(TrackId::new(2), "B", MediaRef::new("blob:mixtape/b")),
//! ]);
//! assert_eq!(controller.state(), PlaybackState::Paused);
//!
//! controller.play_track(1).unwrap();
//!
//! // The platform reports the new track is ready
//! let token = controller.media().token.unwrap();
//! controller.handle_signal(MediaSignal::ReadyToPlay { token });
//!
//! assert!(controller.is_playing());
//! assert_eq!(controller.current_index(), Some(1));
//! ```

mod controller;
mod error;
mod events;
mod media;
mod memory;
pub mod types;
mod volume;

// wasm-bindgen expands to unsafe glue
#[cfg(feature = "wasm")]
#[allow(unsafe_code)]
pub mod wasm;

// Public exports
pub use controller::PlaybackController;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use media::{LoadToken, MediaPrimitive, MediaSignal};
pub use memory::PlaybackMemory;
pub use types::{PlaybackConfig, PlaybackSnapshot, PlaybackState};
pub use volume::Volume;
