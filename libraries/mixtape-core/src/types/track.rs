/// Track domain type
use crate::types::{MediaRef, TrackId};
use serde::{Deserialize, Serialize};

/// One playlist entry
///
/// Persisted as part of the JSON playlist array. Lists written before the
/// `mediaRef` rename stored the reference under `audio`; both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Display title (the source file name by default)
    pub title: String,

    /// Artist name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,

    /// Album name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,

    /// Playable media reference
    #[serde(alias = "audio")]
    pub media_ref: MediaRef,
}

impl Track {
    /// Create a track with no artist or album
    pub fn new(id: TrackId, title: impl Into<String>, media_ref: MediaRef) -> Self {
        Self {
            id,
            title: title.into(),
            artist: None,
            album: None,
            media_ref,
        }
    }

    /// Title to show in lists and the now-playing line
    pub fn display_title(&self) -> &str {
        &self.title
    }

    /// Build a stored track from an intake record
    pub fn from_new(id: TrackId, new: NewTrack) -> Self {
        Self {
            id,
            title: new.title,
            artist: new.artist,
            album: new.album,
            media_ref: new.media_ref,
        }
    }
}

/// A track that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrack {
    /// Display title
    pub title: String,

    /// Artist name
    pub artist: Option<String>,

    /// Album name
    pub album: Option<String>,

    /// Playable media reference
    pub media_ref: MediaRef,
}

impl NewTrack {
    /// Create an intake record with only a title
    pub fn new(title: impl Into<String>, media_ref: MediaRef) -> Self {
        Self {
            title: title.into(),
            artist: None,
            album: None,
            media_ref,
        }
    }
}
