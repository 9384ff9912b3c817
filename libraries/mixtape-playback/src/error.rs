//! Error types for playback control

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The media primitive declined to start (autoplay policy, decode failure)
    #[error("Playback start rejected: {0}")]
    StartRejected(String),

    /// The media primitive has nothing playable loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Media primitive error
    #[error("Media error: {0}")]
    Media(String),
}

impl PlaybackError {
    /// Create a start-rejected error
    pub fn start_rejected(msg: impl Into<String>) -> Self {
        Self::StartRejected(msg.into())
    }

    /// Create a media error
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
