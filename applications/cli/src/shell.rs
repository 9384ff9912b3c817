//! Application shell
//!
//! Wires user intents into the track store and the playback controller.
//! The shell never edits playback state itself; it forwards intents and
//! keeps the controller's queue in step with the store.

use crate::command::{Command, HELP};
use crate::config::AppConfig;
use crate::error::Result;
use crate::view::{now_playing, PlaylistView};
use mixtape_core::{KeyValueStore, Track, TrackId};
use mixtape_playback::{
    MediaPrimitive, MediaSignal, PlaybackController, PlaybackEvent, PlaybackSnapshot,
};
use mixtape_storage::{intake_files, is_audio_file, ObjectUrlRegistry, TrackStore, UploadedFile};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use walkdir::WalkDir;

/// What the run loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading commands
    Continue,
    /// Leave the run loop
    Quit,
}

/// The playlist and the playback controller behind one command surface
pub struct Shell<M, S> {
    tracks: TrackStore<S>,
    controller: PlaybackController<M, S>,
    registry: Arc<ObjectUrlRegistry>,
    extensions: Vec<String>,
}

impl<M: MediaPrimitive, S: KeyValueStore + Clone> Shell<M, S> {
    /// Rehydrate the playlist from `store` and hand it to a new controller
    pub fn new(media: M, store: S, registry: Arc<ObjectUrlRegistry>, config: &AppConfig) -> Self {
        let tracks = TrackStore::open(store.clone());
        let mut controller = PlaybackController::new(media, store, config.playback.clone());
        controller.set_queue(tracks.all().to_vec());

        Self {
            tracks,
            controller,
            registry,
            extensions: config.library.extensions.clone(),
        }
    }

    // ===== Intents =====

    /// Upload files into the playlist
    pub fn upload(&mut self, files: Vec<UploadedFile>) -> Vec<Track> {
        let added = self.tracks.add(intake_files(files, &self.registry));
        if !added.is_empty() {
            self.sync_queue();
        }
        added
    }

    /// Upload files and directories; directories contribute their audio files
    pub fn add_paths(&mut self, paths: &[PathBuf]) -> Vec<Track> {
        let files = collect_uploads(paths, &self.extensions);
        self.upload(files)
    }

    /// Start playing the track with `id`; returns `false` for unknown ids
    pub fn select(&mut self, id: TrackId) -> Result<bool> {
        let Some(index) = self.tracks.position(id) else {
            tracing::debug!("Select of unknown track {}", id);
            return Ok(false);
        };
        self.controller.play_track(index)?;
        Ok(true)
    }

    /// Remove the track with `id`; unknown ids are a no-op
    pub fn delete(&mut self, id: TrackId) -> Option<Track> {
        let (_, track) = self.tracks.remove(id)?;
        self.registry.revoke(&track.media_ref);
        self.sync_queue();
        Some(track)
    }

    /// Deliver media signals to the controller
    pub fn pump(&mut self, signals: impl IntoIterator<Item = MediaSignal>) {
        for signal in signals {
            self.controller.handle_signal(signal);
        }
    }

    /// Run one text command, writing any output to `out`
    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<Outcome> {
        match command {
            Command::Add(paths) => {
                let added = self.add_paths(&paths);
                writeln!(out, "Added {} track(s)", added.len())?;
            }
            Command::List => {
                let listing = PlaylistView::render(self.tracks.all(), self.controller.current_index());
                write!(out, "{}", listing)?;
            }
            Command::Select(id) => {
                if !self.select(id)? {
                    writeln!(out, "No track with id {}", id)?;
                    return Ok(Outcome::Continue);
                }
                self.print_status(out)?;
            }
            Command::Delete(id) => match self.delete(id) {
                Some(track) => writeln!(out, "Removed {}", track.display_title())?,
                None => writeln!(out, "No track with id {}", id)?,
            },
            Command::Play => {
                self.controller.play()?;
                self.print_status(out)?;
            }
            Command::Pause => {
                self.controller.pause();
                self.print_status(out)?;
            }
            Command::Toggle => {
                self.controller.toggle_play()?;
                self.print_status(out)?;
            }
            Command::Next => {
                self.controller.next();
                self.print_status(out)?;
            }
            Command::Previous => {
                self.controller.previous();
                self.print_status(out)?;
            }
            Command::Volume(level) => {
                self.controller.set_volume(f32::from(level) / 100.0);
                self.print_status(out)?;
            }
            Command::Mute => {
                self.controller.toggle_mute();
                self.print_status(out)?;
            }
            Command::Seek(secs) => {
                self.controller.seek(secs);
                self.print_status(out)?;
            }
            Command::Status => self.print_status(out)?,
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(Outcome::Quit),
        }

        Ok(Outcome::Continue)
    }

    // ===== Queries =====

    /// Playlist contents in order
    pub fn tracks(&self) -> &[Track] {
        self.tracks.all()
    }

    /// The playback controller
    pub fn controller(&self) -> &PlaybackController<M, S> {
        &self.controller
    }

    /// Mutable access to the playback controller
    pub fn controller_mut(&mut self) -> &mut PlaybackController<M, S> {
        &mut self.controller
    }

    /// Current playback state for display
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.controller.snapshot()
    }

    /// Take the playback events queued since the last call
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.controller.drain_events()
    }

    /// Media refs issued for uploaded files
    pub fn registry(&self) -> &ObjectUrlRegistry {
        &self.registry
    }

    fn sync_queue(&mut self) {
        self.controller.set_queue(self.tracks.all().to_vec());
    }

    fn print_status(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "{}", now_playing(&self.controller.snapshot()))?;
        Ok(())
    }
}

/// Expand `paths` into upload candidates
///
/// Files are taken as given. Directories are walked recursively in file
/// name order and contribute files whose extension is in `extensions`.
/// Missing paths are skipped with a warning.
pub fn collect_uploads(paths: &[PathBuf], extensions: &[String]) -> Vec<UploadedFile> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            files.extend(
                WalkDir::new(path)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(std::result::Result::ok)
                    .filter(|e| e.file_type().is_file() && is_audio_file(e.path(), extensions))
                    .map(|e| UploadedFile::from_path(e.into_path())),
            );
        } else if path.is_file() {
            files.push(UploadedFile::from_path(path.clone()));
        } else {
            tracing::warn!("Skipping {:?}: no such file or directory", path);
        }
    }

    files
}
