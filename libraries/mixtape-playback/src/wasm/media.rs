//! `<audio>` element media primitive
//!
//! The JavaScript side supplies an object with the methods below, wrapping
//! an `HTMLAudioElement`. It forwards the element's `canplay`, `timeupdate`,
//! `ended` and `error` events (and a rejected `play()` promise) to the
//! matching `WasmPlayer` entry points together with the generation and
//! track id it was loaded with.

use crate::error::{PlaybackError, Result};
use crate::media::{LoadToken, MediaPrimitive};
use mixtape_core::MediaRef;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// JavaScript wrapper around an `<audio>` element
    pub type JsMediaElement;

    #[wasm_bindgen(method, js_name = load)]
    fn js_load(this: &JsMediaElement, generation: f64, track_id: f64, src: &str);

    #[wasm_bindgen(method, js_name = unload)]
    fn js_unload(this: &JsMediaElement);

    #[wasm_bindgen(method, catch, js_name = play)]
    fn js_play(this: &JsMediaElement) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = pause)]
    fn js_pause(this: &JsMediaElement);

    #[wasm_bindgen(method, getter, js_name = currentTime)]
    fn js_current_time(this: &JsMediaElement) -> f64;

    #[wasm_bindgen(method, setter, js_name = currentTime)]
    fn js_set_current_time(this: &JsMediaElement, secs: f64);

    #[wasm_bindgen(method, getter, js_name = duration)]
    fn js_duration(this: &JsMediaElement) -> f64;

    #[wasm_bindgen(method, setter, js_name = volume)]
    fn js_set_volume(this: &JsMediaElement, volume: f64);
}

impl MediaPrimitive for JsMediaElement {
    fn load(&mut self, token: LoadToken, media_ref: &MediaRef) {
        // Track ids never exceed `TrackId::MAX`, so the id survives as a JS number
        self.js_load(
            token.generation as f64,
            token.track_id.get() as f64,
            media_ref.as_str(),
        );
    }

    fn unload(&mut self) {
        self.js_unload();
    }

    fn play(&mut self) -> Result<()> {
        self.js_play()
            .map_err(|e| PlaybackError::start_rejected(format!("{e:?}")))
    }

    fn pause(&mut self) {
        self.js_pause();
    }

    fn current_time(&self) -> f64 {
        self.js_current_time()
    }

    fn set_current_time(&mut self, secs: f64) {
        self.js_set_current_time(secs);
    }

    fn duration(&self) -> f64 {
        self.js_duration()
    }

    fn set_volume(&mut self, volume: f32) {
        self.js_set_volume(f64::from(volume));
    }
}
