//! WASM-compatible player facade

use super::{media::JsMediaElement, storage::WebStorage};
use crate::{LoadToken, MediaSignal, PlaybackConfig, PlaybackController, PlaybackError};
use js_sys::Function;
use mixtape_core::{MediaRef, NewTrack, TrackId};
use mixtape_storage::TrackStore;
use serde::Deserialize;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Track description handed over by the upload form
///
/// The page creates the object URL (`URL.createObjectURL`) itself.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WasmNewTrack {
    title: String,
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    album: Option<String>,
    media_ref: String,
}

impl From<WasmNewTrack> for NewTrack {
    fn from(track: WasmNewTrack) -> Self {
        NewTrack {
            title: track.title,
            artist: track.artist,
            album: track.album,
            media_ref: MediaRef::new(track.media_ref),
        }
    }
}

/// WASM-compatible player
///
/// Owns the persisted track list and the playback controller, both backed
/// by `localStorage`. Every call flushes queued playback events to the
/// registered `onEvent` callback.
#[wasm_bindgen]
pub struct WasmPlayer {
    tracks: TrackStore<Rc<WebStorage>>,
    inner: PlaybackController<JsMediaElement, Rc<WebStorage>>,
    on_event: Option<Function>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player driving `element`, restoring from `localStorage`
    #[wasm_bindgen(constructor)]
    pub fn new(element: JsMediaElement) -> Result<WasmPlayer, JsValue> {
        console_error_panic_hook::set_once();

        let storage = Rc::new(
            WebStorage::local().ok_or_else(|| JsValue::from_str("localStorage unavailable"))?,
        );
        let tracks = TrackStore::open(Rc::clone(&storage));
        let mut inner = PlaybackController::new(element, storage, PlaybackConfig::default());
        inner.set_queue(tracks.all().to_vec());

        Ok(Self {
            tracks,
            inner,
            on_event: None,
        })
    }

    // ===== Track List =====

    /// Append uploaded tracks (`[{title, mediaRef}]`)
    #[wasm_bindgen(js_name = addTracks)]
    pub fn add_tracks(&mut self, tracks: JsValue) -> Result<(), JsValue> {
        let new_tracks: Vec<WasmNewTrack> = serde_wasm_bindgen::from_value(tracks)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse tracks: {}", e)))?;

        let added = self
            .tracks
            .add(new_tracks.into_iter().map(NewTrack::from).collect());
        if !added.is_empty() {
            self.inner.set_queue(self.tracks.all().to_vec());
        }
        self.flush();
        Ok(())
    }

    /// Delete a track by id; unknown ids are ignored
    ///
    /// Returns the removed track's media ref so the page can revoke it.
    #[wasm_bindgen(js_name = removeTrack)]
    pub fn remove_track(&mut self, id: f64) -> Option<String> {
        let (_, removed) = self.tracks.remove(TrackId::from_f64(id)?)?;
        self.inner.set_queue(self.tracks.all().to_vec());
        self.flush();
        Some(removed.media_ref.as_str().to_string())
    }

    /// All tracks in order, as plain objects
    pub fn tracks(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.tracks.all()).unwrap_or(JsValue::NULL)
    }

    // ===== Playback Control =====

    /// Start or resume playback
    pub fn play(&mut self) -> Result<(), JsValue> {
        let result = self.inner.play();
        self.flush();
        result.map_err(to_js)
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.inner.pause();
        self.flush();
    }

    /// Toggle between playing and paused
    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&mut self) -> Result<(), JsValue> {
        let result = self.inner.toggle_play();
        self.flush();
        result.map_err(to_js)
    }

    /// Skip to next track
    pub fn next(&mut self) {
        self.inner.next();
        self.flush();
    }

    /// Go to previous track
    pub fn previous(&mut self) {
        self.inner.previous();
        self.flush();
    }

    /// Start playing the track with `id` (playlist click)
    #[wasm_bindgen(js_name = playTrack)]
    pub fn play_track(&mut self, id: f64) -> Result<(), JsValue> {
        let Some(index) = TrackId::from_f64(id).and_then(|id| self.tracks.position(id)) else {
            return Ok(());
        };
        let result = self.inner.play_track(index);
        self.flush();
        result.map_err(to_js)
    }

    // ===== Volume & Seeking =====

    /// Set volume (0.0 - 1.0)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, volume: f32) {
        self.inner.set_volume(volume);
        self.flush();
    }

    /// Toggle mute
    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&mut self) {
        self.inner.toggle_mute();
        self.flush();
    }

    /// Seek to position in seconds
    pub fn seek(&mut self, secs: f64) {
        self.inner.seek(secs);
        self.flush();
    }

    // ===== Media Element Events =====

    /// `canplay` fired for the given load
    #[wasm_bindgen(js_name = onCanPlay)]
    pub fn on_can_play(&mut self, generation: f64, track_id: f64) {
        if let Some(token) = token(generation, track_id) {
            self.signal(MediaSignal::ReadyToPlay { token });
        }
    }

    /// `timeupdate` fired for the given load
    #[wasm_bindgen(js_name = onTimeUpdate)]
    pub fn on_time_update(&mut self, generation: f64, track_id: f64) {
        if let Some(token) = token(generation, track_id) {
            self.signal(MediaSignal::TimeUpdate { token });
        }
    }

    /// `ended` fired for the given load
    #[wasm_bindgen(js_name = onEnded)]
    pub fn on_ended(&mut self, generation: f64, track_id: f64) {
        if let Some(token) = token(generation, track_id) {
            self.signal(MediaSignal::Ended { token });
        }
    }

    /// `error` fired or `play()` rejected for the given load
    #[wasm_bindgen(js_name = onMediaError)]
    pub fn on_media_error(&mut self, generation: f64, track_id: f64, message: String) {
        if let Some(token) = token(generation, track_id) {
            self.signal(MediaSignal::Failed { token, message });
        }
    }

    // ===== State Queries =====

    /// Current state as a plain object
    pub fn snapshot(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.inner.snapshot()).unwrap_or(JsValue::NULL)
    }

    /// Register the playback event callback
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: Function) {
        self.on_event = Some(callback);
    }

    // ===== Internal =====

    fn signal(&mut self, signal: MediaSignal) {
        self.inner.handle_signal(signal);
        self.flush();
    }

    fn flush(&mut self) {
        let events = self.inner.drain_events();
        let Some(ref cb) = self.on_event else {
            return;
        };

        for event in events {
            if let Ok(js_event) = serde_wasm_bindgen::to_value(&event) {
                cb.call1(&JsValue::NULL, &js_event).ok();
            }
        }
    }
}

/// Rebuild a load token echoed back by the page; malformed ids match nothing
fn token(generation: f64, track_id: f64) -> Option<LoadToken> {
    let track_id = TrackId::from_f64(track_id)?;
    Some(LoadToken::new(generation as u64, track_id))
}

fn to_js(error: PlaybackError) -> JsValue {
    JsValue::from_str(&error.to_string())
}
