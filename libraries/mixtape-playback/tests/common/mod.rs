//! Shared test helpers: a recording media primitive and track fixtures

#![allow(dead_code)]

use mixtape_core::{MediaRef, Track, TrackId};
use mixtape_playback::{
    LoadToken, MediaPrimitive, MediaSignal, PlaybackConfig, PlaybackController, PlaybackError,
    Result,
};
use mixtape_storage::MemoryStore;
use std::sync::Arc;

/// Call made on the media primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(LoadToken, MediaRef),
    Unload,
    Play,
    Pause,
    SetCurrentTime(f64),
    SetVolume(f32),
}

/// Media primitive that records every call
#[derive(Debug, Default)]
pub struct RecordingMedia {
    pub calls: Vec<Call>,
    pub loaded: Option<LoadToken>,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f32,
    pub playing: bool,
    /// When set, `play()` fails with this message
    pub reject_play: Option<String>,
    /// When set, `play()` reports nothing playable
    pub nothing_playable: bool,
}

impl RecordingMedia {
    pub fn play_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::Play).count()
    }

    pub fn load_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Load(..)))
            .count()
    }

    pub fn seeks(&self) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::SetCurrentTime(t) => Some(*t),
                _ => None,
            })
            .collect()
    }
}

impl MediaPrimitive for RecordingMedia {
    fn load(&mut self, token: LoadToken, media_ref: &MediaRef) {
        self.calls.push(Call::Load(token, media_ref.clone()));
        self.loaded = Some(token);
        self.current_time = 0.0;
        self.duration = f64::NAN;
        self.playing = false;
    }

    fn unload(&mut self) {
        self.calls.push(Call::Unload);
        self.loaded = None;
        self.playing = false;
    }

    fn play(&mut self) -> Result<()> {
        if let Some(message) = &self.reject_play {
            return Err(PlaybackError::start_rejected(message.clone()));
        }
        if self.nothing_playable {
            return Err(PlaybackError::NoTrackLoaded);
        }
        self.calls.push(Call::Play);
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
        self.playing = false;
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, secs: f64) {
        self.calls.push(Call::SetCurrentTime(secs));
        self.current_time = secs;
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(Call::SetVolume(volume));
        self.volume = volume;
    }
}

pub type TestController = PlaybackController<RecordingMedia, Arc<MemoryStore>>;

/// Tracks with ids 1..=n, in order
pub fn tracks(titles: &[&str]) -> Vec<Track> {
    titles
        .iter()
        .zip(1u64..)
        .map(|(title, id)| {
            Track::new(
                TrackId::new(id),
                *title,
                MediaRef::new(format!("blob:mixtape/{title}")),
            )
        })
        .collect()
}

pub fn controller_over(store: Arc<MemoryStore>) -> TestController {
    PlaybackController::new(RecordingMedia::default(), store, PlaybackConfig::default())
}

/// Controller over a fresh store with `titles` queued
pub fn controller_with(titles: &[&str]) -> (TestController, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let mut controller = controller_over(Arc::clone(&store));
    controller.set_queue(tracks(titles));
    (controller, store)
}

pub fn current_token(controller: &TestController) -> LoadToken {
    controller.loaded_token().expect("a track is loaded")
}

/// Deliver `ReadyToPlay` for the current load
pub fn ready(controller: &mut TestController) {
    let token = current_token(controller);
    controller.media_mut().duration = 200.0;
    controller.handle_signal(MediaSignal::ReadyToPlay { token });
}

/// Deliver `TimeUpdate` at `secs` for the current load
pub fn tick(controller: &mut TestController, secs: f64) {
    let token = current_token(controller);
    controller.media_mut().current_time = secs;
    controller.handle_signal(MediaSignal::TimeUpdate { token });
}

/// Deliver `Ended` for the current load
pub fn end(controller: &mut TestController) {
    let token = current_token(controller);
    let duration = controller.media().duration;
    controller.media_mut().current_time = duration;
    controller.handle_signal(MediaSignal::Ended { token });
}

/// Start playback of the current track
pub fn start(controller: &mut TestController) {
    ready(controller);
    controller.play().expect("play succeeds");
}
