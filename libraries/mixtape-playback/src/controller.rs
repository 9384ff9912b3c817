//! Playback controller - core orchestration
//!
//! Owns the current track pointer, transport state, volume and position,
//! drives a `MediaPrimitive` and persists the last-played index and
//! position through `PlaybackMemory`.
//!
//! All methods are called from a single dispatch thread, one command or
//! signal at a time. Signals for a load that has since been superseded are
//! ignored by comparing `LoadToken`s.

use crate::{
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    media::{LoadToken, MediaPrimitive, MediaSignal},
    memory::PlaybackMemory,
    types::{PlaybackConfig, PlaybackSnapshot, PlaybackState},
    volume::Volume,
};
use mixtape_core::{KeyValueStore, Track};

/// Main playback controller
///
/// Platform-agnostic: the host supplies the media primitive and the
/// key-value store, forwards user intents as method calls and media
/// signals through `handle_signal`.
pub struct PlaybackController<M, S> {
    media: M,
    memory: PlaybackMemory<S>,
    config: PlaybackConfig,

    // Playable queue (mirror of the track store)
    queue: Vec<Track>,
    current_index: Option<usize>,

    state: PlaybackState,
    volume: Volume,
    current_time: f64,
    duration: f64,

    // Load tracking
    generation: u64,
    loaded: Option<LoadToken>,
    autoplay: bool,

    // Restore-on-start, consumed by the first non-empty queue
    restored_index: Option<usize>,
    restored_position: Option<f64>,

    last_saved_position: f64,

    // Events queued for the host
    pending_events: Vec<PlaybackEvent>,
}

impl<M: MediaPrimitive, S: KeyValueStore> PlaybackController<M, S> {
    /// Create a controller over `media`, restoring from `store`
    pub fn new(mut media: M, store: S, config: PlaybackConfig) -> Self {
        let memory = PlaybackMemory::new(store);
        let restored_index = memory.load_index();
        let restored_position = memory.load_position();

        let volume = Volume::new(config.initial_volume);
        media.set_volume(volume.effective());

        tracing::debug!(
            "Playback controller created (restored index {:?}, position {:?})",
            restored_index,
            restored_position
        );

        Self {
            media,
            memory,
            config,
            queue: Vec::new(),
            current_index: None,
            state: PlaybackState::Idle,
            volume,
            current_time: 0.0,
            duration: 0.0,
            generation: 0,
            loaded: None,
            autoplay: false,
            restored_index,
            restored_position,
            last_saved_position: 0.0,
            pending_events: Vec::new(),
        }
    }

    // ===== Queue =====

    /// Replace the playable queue with the track store's current contents
    ///
    /// Keeps the current track when it is still present. When the current
    /// track was removed, the track now at its position (or the first track
    /// if it was last) becomes current and the transport state is kept. An
    /// empty queue returns the controller to `Idle`.
    pub fn set_queue(&mut self, tracks: Vec<Track>) {
        let previous = self.current_track().map(|t| t.id);
        self.queue = tracks;

        if self.queue.is_empty() {
            self.clear();
            return;
        }

        match (self.current_index, previous) {
            (Some(old_index), Some(id)) => {
                if let Some(index) = self.queue.iter().position(|t| t.id == id) {
                    if index != old_index {
                        self.current_index = Some(index);
                        self.memory.save_index(index);
                        self.emit_track_changed();
                    }
                } else {
                    let index = if old_index < self.queue.len() {
                        old_index
                    } else {
                        0
                    };
                    tracing::info!("Current track {} removed, moving to index {}", id, index);
                    let autoplay = self.state == PlaybackState::Playing;
                    self.change_track(index, autoplay);
                }
            }
            _ => {
                let restored = self.restored_index.take();
                let index = restored.filter(|i| *i < self.queue.len()).unwrap_or(0);

                self.current_index = Some(index);
                if restored != Some(index) {
                    self.memory.save_index(index);
                }

                self.set_state(PlaybackState::Paused);
                self.emit_track_changed();
                self.load_current(false);

                if let Some(position) = self.restored_position.take() {
                    tracing::debug!("Restoring position {:.1}s", position);
                    self.media.set_current_time(position);
                    self.current_time = position;
                    self.last_saved_position = position;
                }
            }
        }
    }

    // ===== Playback Control =====

    /// Start or resume playback
    ///
    /// No-op on an empty queue or when already playing. If the media
    /// primitive declines, the controller stays `Paused`, an `Error` event is
    /// queued and the failure is returned.
    pub fn play(&mut self) -> Result<()> {
        if self.state != PlaybackState::Paused {
            return Ok(());
        }

        if self.loaded.is_none() {
            self.load_current(false);
        }

        match self.media.play() {
            Ok(()) => {
                self.set_state(PlaybackState::Playing);
                Ok(())
            }
            Err(e) => {
                let error = match e {
                    PlaybackError::StartRejected(_) => e,
                    other => PlaybackError::start_rejected(other.to_string()),
                };
                tracing::warn!("{}", error);
                self.autoplay = false;
                self.emit(PlaybackEvent::Error {
                    message: error.to_string(),
                });
                Err(error)
            }
        }
    }

    /// Pause playback
    ///
    /// Also cancels a pending autoplay so a late ready signal does not
    /// restart output.
    pub fn pause(&mut self) {
        self.autoplay = false;

        if self.state != PlaybackState::Playing {
            return;
        }

        self.media.pause();
        self.refresh_time();
        if self.config.save_position_on_pause {
            self.save_position();
        }
        self.set_state(PlaybackState::Paused);
    }

    /// Play when paused, pause when playing
    pub fn toggle_play(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Playing => {
                self.pause();
                Ok(())
            }
            PlaybackState::Paused => self.play(),
            PlaybackState::Idle => Ok(()),
        }
    }

    /// Make the track at `index` current
    ///
    /// If playing, the new track starts once the media reports it is ready.
    /// Out-of-range indices and re-selecting the current track are no-ops.
    pub fn select_track(&mut self, index: usize) {
        if index >= self.queue.len() {
            tracing::debug!("Ignoring selection of index {} (queue has {})", index, self.queue.len());
            return;
        }
        if self.current_index == Some(index) && self.loaded.is_some() {
            return;
        }

        let autoplay = self.state == PlaybackState::Playing;
        self.change_track(index, autoplay);
    }

    /// Make the track at `index` current and start playing it
    ///
    /// Playback of a newly selected track starts once the media reports it
    /// is ready. Re-selecting the current track resumes it.
    pub fn play_track(&mut self, index: usize) -> Result<()> {
        if index >= self.queue.len() {
            tracing::debug!("Ignoring selection of index {} (queue has {})", index, self.queue.len());
            return Ok(());
        }
        if self.current_index == Some(index) && self.loaded.is_some() {
            return self.play();
        }

        self.change_track(index, true);
        self.set_state(PlaybackState::Playing);
        Ok(())
    }

    /// Skip to the next track, wrapping to the first
    pub fn next(&mut self) {
        let n = self.queue.len();
        let Some(current) = self.current_index else {
            return;
        };
        if n == 0 {
            return;
        }

        let autoplay = self.state == PlaybackState::Playing;
        self.change_track((current + 1) % n, autoplay);
    }

    /// Go to the previous track, wrapping to the last
    pub fn previous(&mut self) {
        let n = self.queue.len();
        let Some(current) = self.current_index else {
            return;
        };
        if n == 0 {
            return;
        }

        let autoplay = self.state == PlaybackState::Playing;
        self.change_track((current + n - 1) % n, autoplay);
    }

    // ===== Volume Control =====

    /// Set volume (0.0 - 1.0, clamped)
    ///
    /// Any level above zero clears mute. NaN and infinities are ignored.
    pub fn set_volume(&mut self, level: f32) {
        if !self.volume.set_level(level) {
            tracing::debug!("Ignoring non-finite volume {}", level);
            return;
        }
        if self.volume.level() > 0.0 && self.volume.is_muted() {
            self.volume.unmute();
        }
        self.apply_volume();
    }

    /// Toggle mute, keeping the stored level
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    // ===== Seeking =====

    /// Seek to `secs`
    ///
    /// The value is forwarded unchanged; the media primitive clamps. NaN and
    /// infinities are ignored, as is seeking with nothing loaded.
    pub fn seek(&mut self, secs: f64) {
        if !secs.is_finite() {
            tracing::debug!("Ignoring non-finite seek {}", secs);
            return;
        }
        if self.loaded.is_none() {
            return;
        }

        self.media.set_current_time(secs);
        self.current_time = secs;
        self.emit_position();
    }

    // ===== Media Signals =====

    /// Process a signal from the media primitive
    pub fn handle_signal(&mut self, signal: MediaSignal) {
        if self.loaded != Some(signal.token()) {
            tracing::debug!("Ignoring stale media signal {:?}", signal);
            return;
        }

        match signal {
            MediaSignal::ReadyToPlay { .. } => self.on_ready(),
            MediaSignal::TimeUpdate { .. } => self.on_time_update(),
            MediaSignal::Ended { token } => self.on_ended(token),
            MediaSignal::Failed { message, .. } => self.on_failed(message),
        }
    }

    fn on_ready(&mut self) {
        self.duration = sanitize(self.media.duration());

        if !std::mem::take(&mut self.autoplay) || self.state != PlaybackState::Playing {
            return;
        }

        if let Err(e) = self.media.play() {
            let message = e.to_string();
            tracing::warn!("Autoplay rejected: {}", message);
            self.set_state(PlaybackState::Paused);
            self.emit(PlaybackEvent::Error { message });
        }
    }

    fn on_time_update(&mut self) {
        self.refresh_time();
        self.emit_position();

        let interval = self.config.position_save_interval_secs;
        if self.state == PlaybackState::Playing
            && interval > 0.0
            && (self.current_time - self.last_saved_position).abs() >= interval
        {
            self.save_position();
        }
    }

    fn on_ended(&mut self, token: LoadToken) {
        self.refresh_time();
        self.save_position();
        self.emit(PlaybackEvent::TrackFinished {
            track_id: token.track_id,
        });

        let n = self.queue.len();
        let Some(current) = self.current_index else {
            return;
        };
        if n == 0 {
            return;
        }

        let autoplay = self.state == PlaybackState::Playing;
        self.change_track((current + 1) % n, autoplay);
    }

    fn on_failed(&mut self, message: String) {
        tracing::warn!("Media failed: {}", message);
        self.autoplay = false;
        if self.state == PlaybackState::Playing {
            self.set_state(PlaybackState::Paused);
        }
        self.emit(PlaybackEvent::Error { message });
    }

    // ===== State Queries =====

    /// Transport state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Check if playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Index of the current track
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// The current track
    pub fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.queue.get(i))
    }

    /// The playable queue
    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    /// Stored volume level (preserved under mute)
    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    /// Volume sent to the media primitive
    pub fn effective_volume(&self) -> f32 {
        self.volume.effective()
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Position in seconds
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Token of the current load
    pub fn loaded_token(&self) -> Option<LoadToken> {
        self.loaded
    }

    /// Controller configuration
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let track = self.current_track();
        PlaybackSnapshot {
            state: self.state,
            current_index: self.current_index,
            current_track_id: track.map(|t| t.id),
            title: track.map(|t| t.display_title().to_string()),
            artist: track.and_then(|t| t.artist.clone()),
            album: track.and_then(|t| t.album.clone()),
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
            current_time: self.current_time,
            duration: self.duration,
            queue_len: self.queue.len(),
        }
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// The media primitive
    pub fn media(&self) -> &M {
        &self.media
    }

    /// The media primitive, mutably (hosts poll it for signals)
    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    // ===== Internal =====

    fn change_track(&mut self, index: usize, autoplay: bool) {
        self.current_index = Some(index);
        self.memory.save_index(index);
        self.emit_track_changed();
        self.load_current(autoplay);
    }

    fn load_current(&mut self, autoplay: bool) {
        let Some((track_id, media_ref)) = self
            .current_track()
            .map(|t| (t.id, t.media_ref.clone()))
        else {
            return;
        };

        self.generation += 1;
        let token = LoadToken::new(self.generation, track_id);
        tracing::debug!("Loading track {} ({})", track_id, media_ref);

        self.media.load(token, &media_ref);
        self.loaded = Some(token);
        self.autoplay = autoplay;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.last_saved_position = 0.0;
    }

    fn clear(&mut self) {
        if self.loaded.take().is_some() {
            self.media.unload();
        }
        self.current_index = None;
        self.autoplay = false;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.last_saved_position = 0.0;
        self.set_state(PlaybackState::Idle);
    }

    fn refresh_time(&mut self) {
        self.current_time = sanitize(self.media.current_time());
        self.duration = sanitize(self.media.duration());
    }

    fn save_position(&mut self) {
        self.memory.save_position(self.current_time);
        self.last_saved_position = self.current_time;
    }

    fn apply_volume(&mut self) {
        self.media.set_volume(self.volume.effective());
        self.emit(PlaybackEvent::VolumeChanged {
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
        });
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.emit(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit_track_changed(&mut self) {
        if let Some((index, track)) = self.current_index.zip(self.current_track()) {
            let track_id = track.id;
            self.emit(PlaybackEvent::TrackChanged { index, track_id });
        }
    }

    fn emit_position(&mut self) {
        self.emit(PlaybackEvent::PositionUpdate {
            current_time: self.current_time,
            duration: self.duration,
        });
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }
}

/// Clamp platform time values (NaN before metadata) to a non-negative number
fn sanitize(secs: f64) -> f64 {
    if secs.is_finite() && secs > 0.0 {
        secs
    } else {
        0.0
    }
}
