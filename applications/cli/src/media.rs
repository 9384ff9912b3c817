//! Native media primitive backed by rodio
//!
//! Each load opens the file behind the media ref, decodes it into a fresh
//! paused `Sink` on the default output stream and queues the resulting
//! signal. The run loop calls `poll_signals` on a fixed tick to pick up
//! progress and end-of-track.

use mixtape_core::MediaRef;
use mixtape_playback::{LoadToken, MediaPrimitive, MediaSignal, PlaybackError, Result};
use mixtape_storage::ObjectUrlRegistry;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::time::Duration;

pub struct RodioMedia {
    stream: OutputStream,
    registry: Arc<ObjectUrlRegistry>,
    sink: Option<Sink>,
    token: Option<LoadToken>,
    duration: f64,
    volume: f32,
    ended: bool,
    pending: VecDeque<MediaSignal>,
}

impl RodioMedia {
    /// Open the default output device
    pub fn open(registry: Arc<ObjectUrlRegistry>) -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::media(format!("no audio output device: {}", e)))?;
        // rodio logs to stderr when the stream is dropped
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            registry,
            sink: None,
            token: None,
            duration: 0.0,
            volume: 1.0,
            ended: false,
            pending: VecDeque::new(),
        })
    }

    /// Signals produced since the last poll
    ///
    /// Queued load results first, then `TimeUpdate` while playing, or a
    /// single `Ended` once the sink has drained.
    pub fn poll_signals(&mut self) -> Vec<MediaSignal> {
        let mut signals: Vec<MediaSignal> = self.pending.drain(..).collect();

        if let (Some(sink), Some(token)) = (&self.sink, self.token) {
            if !self.ended && !sink.is_paused() {
                if sink.empty() {
                    self.ended = true;
                    signals.push(MediaSignal::Ended { token });
                } else {
                    signals.push(MediaSignal::TimeUpdate { token });
                }
            }
        }

        signals
    }

    fn open_sink(&self, media_ref: &MediaRef) -> std::result::Result<(Sink, f64), String> {
        let path = self
            .registry
            .resolve(media_ref)
            .ok_or_else(|| format!("{} is no longer available (re-add the file)", media_ref))?;

        let file = File::open(&path).map_err(|e| format!("failed to open {:?}: {}", path, e))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| format!("failed to decode {:?}: {}", path, e))?;
        let duration = source
            .total_duration()
            .map_or(0.0, |d| d.as_secs_f64());

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.pause();
        sink.set_volume(self.volume);

        Ok((sink, duration))
    }
}

impl MediaPrimitive for RodioMedia {
    fn load(&mut self, token: LoadToken, media_ref: &MediaRef) {
        self.unload();
        self.token = Some(token);

        match self.open_sink(media_ref) {
            Ok((sink, duration)) => {
                tracing::debug!("Loaded {} ({:.1}s)", media_ref, duration);
                self.sink = Some(sink);
                self.duration = duration;
                self.pending.push_back(MediaSignal::ReadyToPlay { token });
            }
            Err(message) => {
                tracing::warn!("{}", message);
                self.pending.push_back(MediaSignal::Failed { token, message });
            }
        }
    }

    fn unload(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.token = None;
        self.duration = 0.0;
        self.ended = false;
        self.pending.clear();
    }

    fn play(&mut self) -> Result<()> {
        let sink = self.sink.as_ref().ok_or(PlaybackError::NoTrackLoaded)?;
        sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn current_time(&self) -> f64 {
        self.sink
            .as_ref()
            .map_or(0.0, |sink| sink.get_pos().as_secs_f64())
    }

    fn set_current_time(&mut self, secs: f64) {
        let Some(sink) = &self.sink else {
            return;
        };

        let mut target = secs.max(0.0);
        if self.duration > 0.0 {
            target = target.min(self.duration);
        }

        if let Err(e) = sink.try_seek(Duration::from_secs_f64(target)) {
            tracing::warn!("Seek to {:.1}s failed: {}", target, e);
        }
        self.ended = false;
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }
}
