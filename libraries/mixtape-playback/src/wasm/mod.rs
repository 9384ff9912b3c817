//! WASM bindings for mixtape-playback
//!
//! Browser host for the playback controller: `localStorage` as the
//! key-value store, an `<audio>` element wrapper as the media primitive and
//! a `WasmPlayer` facade exported to JavaScript.

pub mod media;
pub mod player;
pub mod storage;

pub use media::JsMediaElement;
pub use player::WasmPlayer;
pub use storage::WebStorage;
