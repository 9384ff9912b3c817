//! Playback Events
//!
//! Event-based communication for UI synchronization.
//! Events are queued by the controller and drained by the host after each
//! command or signal; the host then re-renders from a snapshot.

use crate::types::PlaybackState;
use mixtape_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlaybackEvent {
    /// Transport state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A different track became current
    #[serde(rename_all = "camelCase")]
    TrackChanged {
        /// Position in the queue
        index: usize,
        /// ID of the new (current) track
        track_id: TrackId,
    },

    /// Position or duration refreshed
    #[serde(rename_all = "camelCase")]
    PositionUpdate {
        /// Current position in seconds
        current_time: f64,
        /// Track duration in seconds
        duration: f64,
    },

    /// Volume or mute changed
    VolumeChanged {
        /// Stored volume level (0.0 - 1.0)
        volume: f32,
        /// Whether audio is muted
        muted: bool,
    },

    /// Track finished playing naturally (reached end)
    #[serde(rename_all = "camelCase")]
    TrackFinished {
        /// ID of the finished track
        track_id: TrackId,
    },

    /// Non-fatal playback error
    Error {
        /// Error message
        message: String,
    },
}
