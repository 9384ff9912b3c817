//! Playlist view
//!
//! Pure rendering over the track list and a playback snapshot. The view
//! never touches the controller; the shell re-renders after every command.

use mixtape_core::{Track, TrackId};
use mixtape_playback::{PlaybackSnapshot, PlaybackState};
use std::fmt::Write;

/// One rendered playlist line
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistRow {
    /// Zero-based position in the playlist
    pub position: usize,
    /// Id used by `select` and `delete`
    pub id: TrackId,
    /// Display title (file name unless tagged)
    pub title: String,
    pub artist: Option<String>,
    /// Whether this is the controller's current track
    pub is_current: bool,
}

/// Renderer for the track list
pub struct PlaylistView;

impl PlaylistView {
    /// Build rows for `tracks`, marking `current`
    pub fn rows(tracks: &[Track], current: Option<usize>) -> Vec<PlaylistRow> {
        tracks
            .iter()
            .enumerate()
            .map(|(position, track)| PlaylistRow {
                position,
                id: track.id,
                title: track.display_title().to_string(),
                artist: track.artist.clone(),
                is_current: current == Some(position),
            })
            .collect()
    }

    /// Render the playlist as text, one track per line
    ///
    /// Tracks are addressed by id in `select` and `delete`, so the id is the
    /// leading column.
    pub fn render(tracks: &[Track], current: Option<usize>) -> String {
        if tracks.is_empty() {
            return "Playlist is empty. Use `add <path>` to upload files.\n".to_string();
        }

        let mut out = String::new();
        for row in Self::rows(tracks, current) {
            let marker = if row.is_current { '>' } else { ' ' };
            let id = row.id.get();
            let _ = match row.artist {
                Some(artist) => writeln!(out, "{} {:>4}  {} - {}", marker, id, artist, row.title),
                None => writeln!(out, "{} {:>4}  {}", marker, id, row.title),
            };
        }
        out
    }
}

/// Format seconds as `MM:SS`; non-finite or negative input shows `00:00`
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "00:00".to_string();
    }
    let total = secs.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// One-line status for the current track
pub fn now_playing(snapshot: &PlaybackSnapshot) -> String {
    let Some(title) = snapshot.title.as_deref() else {
        return "Nothing loaded".to_string();
    };

    let state = match snapshot.state {
        PlaybackState::Playing => "playing",
        PlaybackState::Paused => "paused",
        PlaybackState::Idle => "idle",
    };

    let mut line = format!("[{}] ", state);
    if let Some(artist) = snapshot.artist.as_deref() {
        let _ = write!(line, "{} - ", artist);
    }
    line.push_str(title);
    if let Some(album) = snapshot.album.as_deref() {
        let _ = write!(line, " ({})", album);
    }

    let volume = if snapshot.muted {
        "muted".to_string()
    } else {
        format!("{:.0}%", snapshot.volume * 100.0)
    };

    let _ = write!(
        line,
        "  {} / {}  vol {}",
        format_time(snapshot.current_time),
        format_time(snapshot.duration),
        volume
    );
    line
}
