//! Core types for playback control

use mixtape_core::TrackId;
use serde::{Deserialize, Serialize};

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Track list is empty, nothing loaded
    #[default]
    Idle,

    /// A track is selected but not playing
    Paused,

    /// Playing audio
    Playing,
}

/// Playback controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Volume at startup (0.0 - 1.0)
    pub initial_volume: f32,

    /// Minimum playback progress between periodic position saves, in
    /// seconds. 0 disables periodic saves.
    pub position_save_interval_secs: f64,

    /// Persist the position when the user pauses
    pub save_position_on_pause: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            initial_volume: 0.5,
            position_save_interval_secs: 5.0,
            save_position_on_pause: true,
        }
    }
}

/// Read-only view of the controller for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    /// Transport state
    pub state: PlaybackState,

    /// Index into the queue, `None` when idle
    pub current_index: Option<usize>,

    /// Id of the current track
    pub current_track_id: Option<TrackId>,

    /// Title of the current track
    pub title: Option<String>,

    /// Artist of the current track
    pub artist: Option<String>,

    /// Album of the current track
    pub album: Option<String>,

    /// Stored volume (preserved under mute)
    pub volume: f32,

    /// Mute flag
    pub muted: bool,

    /// Position in seconds
    pub current_time: f64,

    /// Duration in seconds (0 until known)
    pub duration: f64,

    /// Number of tracks in the queue
    pub queue_len: usize,
}

impl PlaybackSnapshot {
    /// Check if audio is playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Volume actually sent to the output
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }
}
