//! Platform-agnostic media primitive
//!
//! Abstracts the component that actually decodes and plays audio: an
//! `<audio>` element in the browser, an output sink on desktop. The
//! controller drives it through `MediaPrimitive` and learns about progress
//! through `MediaSignal`s the host delivers back.

use crate::error::Result;
use mixtape_core::{MediaRef, TrackId};
use serde::{Deserialize, Serialize};

/// Identity of one load request
///
/// Every `load` gets a fresh token. Signals carry the token of the load
/// they belong to so the controller can drop signals for superseded loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadToken {
    /// Monotonic load counter of the issuing controller
    pub generation: u64,

    /// Track the load was issued for
    pub track_id: TrackId,
}

impl LoadToken {
    /// Create a token
    pub fn new(generation: u64, track_id: TrackId) -> Self {
        Self {
            generation,
            track_id,
        }
    }
}

/// Platform media playback
///
/// Implementors own the decoding and output. All calls are effect-only and
/// must not block; readiness, progress and completion are reported
/// asynchronously as `MediaSignal`s tagged with the token passed to `load`.
pub trait MediaPrimitive {
    /// Start loading `media_ref`, replacing whatever was loaded
    ///
    /// Emits `ReadyToPlay` once playable, `Failed` if it never will be.
    fn load(&mut self, token: LoadToken, media_ref: &MediaRef);

    /// Drop the loaded media and stop output
    fn unload(&mut self);

    /// Start or resume output
    ///
    /// # Returns
    /// * `Ok(())` - Playback started (or will start once data is available)
    /// * `Err(_)` - The platform declined to play
    fn play(&mut self) -> Result<()>;

    /// Pause output, keeping the position
    fn pause(&mut self);

    /// Current position in seconds
    fn current_time(&self) -> f64;

    /// Move the position; out-of-range values are clamped by the implementor
    fn set_current_time(&mut self, secs: f64);

    /// Duration in seconds, 0 or NaN while unknown
    fn duration(&self) -> f64;

    /// Output volume in `[0, 1]`
    fn set_volume(&mut self, volume: f32);
}

/// Signals delivered from the media primitive to the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaSignal {
    /// Enough data is available to start playback
    ReadyToPlay {
        /// Load the signal belongs to
        token: LoadToken,
    },

    /// Position advanced
    TimeUpdate {
        /// Load the signal belongs to
        token: LoadToken,
    },

    /// Reached the end of the media
    Ended {
        /// Load the signal belongs to
        token: LoadToken,
    },

    /// Loading or starting failed asynchronously
    Failed {
        /// Load the signal belongs to
        token: LoadToken,
        /// Platform error message
        message: String,
    },
}

impl MediaSignal {
    /// Token of the load this signal belongs to
    pub fn token(&self) -> LoadToken {
        match self {
            Self::ReadyToPlay { token }
            | Self::TimeUpdate { token }
            | Self::Ended { token }
            | Self::Failed { token, .. } => *token,
        }
    }
}
