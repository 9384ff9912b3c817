//! Integration tests for the playback controller
//!
//! These tests drive the controller the way a host does: intents as method
//! calls, media feedback as signals, persistence through a shared store.

mod common;

use common::{
    controller_over, controller_with, current_token, end, ready, start, tick, tracks, Call,
    RecordingMedia,
};
use mixtape_core::{keys, CoreError, KeyValueStore, TrackId};
use mixtape_playback::{
    MediaSignal, PlaybackConfig, PlaybackController, PlaybackError, PlaybackEvent, PlaybackState,
};
use mixtape_storage::MemoryStore;
use std::sync::Arc;

fn stored(store: &MemoryStore, key: &str) -> Option<String> {
    store.get(key).unwrap()
}

fn stored_time(store: &MemoryStore) -> Option<f64> {
    stored(store, keys::LAST_PLAYED_TIME).map(|v| v.parse().unwrap())
}

// ===== Lifecycle =====

#[test]
fn test_new_controller_is_idle_with_initial_volume() {
    let controller = controller_over(Arc::new(MemoryStore::new()));

    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(controller.current_index(), None);
    assert_eq!(controller.volume(), 0.5);
    assert_eq!(controller.media().volume, 0.5);
}

#[test]
fn test_first_queue_selects_first_track_paused() {
    let (controller, store) = controller_with(&["A", "B", "C"]);

    assert_eq!(controller.state(), PlaybackState::Paused);
    assert_eq!(controller.current_index(), Some(0));
    assert_eq!(controller.current_track().unwrap().title, "A");
    assert_eq!(controller.media().load_count(), 1);
    assert_eq!(stored(&store, keys::LAST_PLAYED_INDEX).as_deref(), Some("0"));
    assert!(!controller.media().playing, "no autoplay on startup");
}

// ===== Transport =====

#[test]
fn test_play_and_pause() {
    let (mut controller, store) = controller_with(&["A"]);
    start(&mut controller);

    assert_eq!(controller.state(), PlaybackState::Playing);
    assert!(controller.media().playing);

    tick(&mut controller, 3.0);
    controller.pause();

    assert_eq!(controller.state(), PlaybackState::Paused);
    assert!(!controller.media().playing);
    assert_eq!(stored_time(&store), Some(3.0), "pause persists the position");
}

#[test]
fn test_toggle_play() {
    let (mut controller, _) = controller_with(&["A"]);
    ready(&mut controller);

    controller.toggle_play().unwrap();
    assert!(controller.is_playing());

    controller.toggle_play().unwrap();
    assert_eq!(controller.state(), PlaybackState::Paused);
}

#[test]
fn test_rejected_start_stays_paused_and_reports() {
    let (mut controller, _) = controller_with(&["A"]);
    controller.drain_events();
    controller.media_mut().reject_play = Some("NotAllowedError".to_string());

    let result = controller.play();

    assert!(matches!(result, Err(PlaybackError::StartRejected(_))));
    assert_eq!(controller.state(), PlaybackState::Paused);
    assert!(controller
        .drain_events()
        .iter()
        .any(|e| matches!(e, PlaybackEvent::Error { .. })));

    // Still usable afterwards
    controller.media_mut().reject_play = None;
    controller.play().unwrap();
    assert!(controller.is_playing());
}

#[test]
fn test_nothing_playable_is_reported_as_rejected_start() {
    let (mut controller, _) = controller_with(&["A"]);
    controller.drain_events();
    controller.media_mut().nothing_playable = true;

    let error = controller.play().unwrap_err();

    assert!(matches!(error, PlaybackError::StartRejected(_)));
    assert_eq!(error.to_string(), "Playback start rejected: No track loaded");
    assert_eq!(controller.state(), PlaybackState::Paused);
}

#[test]
fn test_commands_on_empty_queue_are_noops() {
    let mut controller = controller_over(Arc::new(MemoryStore::new()));

    controller.play().unwrap();
    controller.next();
    controller.previous();
    controller.seek(10.0);
    controller.select_track(0);
    controller.play_track(0).unwrap();

    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(controller.current_index(), None);
    assert!(controller
        .media()
        .calls
        .iter()
        .all(|c| matches!(c, Call::SetVolume(_))));
}

// ===== Navigation =====

#[test]
fn test_next_cycles_and_wraps() {
    let (mut controller, store) = controller_with(&["A", "B", "C"]);
    assert_eq!(controller.current_index(), Some(0));

    controller.next();
    assert_eq!(controller.current_index(), Some(1));

    controller.next();
    assert_eq!(controller.current_index(), Some(2));

    controller.next();
    assert_eq!(controller.current_index(), Some(0));
    assert_eq!(stored(&store, keys::LAST_PLAYED_INDEX).as_deref(), Some("0"));
}

#[test]
fn test_previous_wraps_to_last() {
    let (mut controller, _) = controller_with(&["A", "B", "C"]);

    controller.previous();
    assert_eq!(controller.current_index(), Some(2));

    controller.previous();
    assert_eq!(controller.current_index(), Some(1));
}

#[test]
fn test_track_changed_events() {
    let (mut controller, _) = controller_with(&["A", "B"]);
    controller.drain_events();

    controller.next();

    assert_eq!(
        controller.drain_events(),
        vec![PlaybackEvent::TrackChanged {
            index: 1,
            track_id: TrackId::new(2),
        }]
    );
}

#[test]
fn test_select_out_of_range_is_ignored() {
    let (mut controller, _) = controller_with(&["A", "B"]);

    controller.select_track(5);

    assert_eq!(controller.current_index(), Some(0));
    assert_eq!(controller.media().load_count(), 1);
}

#[test]
fn test_select_while_paused_does_not_autoplay() {
    let (mut controller, _) = controller_with(&["A", "B"]);

    controller.select_track(1);
    ready(&mut controller);

    assert_eq!(controller.current_index(), Some(1));
    assert_eq!(controller.state(), PlaybackState::Paused);
    assert_eq!(controller.media().play_count(), 0);
}

#[test]
fn test_select_while_playing_starts_once_ready() {
    let (mut controller, _) = controller_with(&["A", "B"]);
    start(&mut controller);
    assert_eq!(controller.media().play_count(), 1);

    controller.select_track(1);
    assert!(controller.is_playing());
    assert_eq!(controller.media().play_count(), 1, "waits for readiness");

    ready(&mut controller);
    assert_eq!(controller.media().play_count(), 2);
    assert!(controller.media().playing);
}

#[test]
fn test_play_track_from_paused() {
    let (mut controller, _) = controller_with(&["A", "B", "C"]);

    controller.play_track(2).unwrap();
    assert!(controller.is_playing());
    assert_eq!(controller.current_index(), Some(2));

    ready(&mut controller);
    assert_eq!(controller.media().play_count(), 1);
}

#[test]
fn test_play_track_on_current_resumes() {
    let (mut controller, _) = controller_with(&["A", "B"]);
    ready(&mut controller);

    controller.play_track(0).unwrap();

    assert!(controller.is_playing());
    assert_eq!(controller.media().load_count(), 1, "no reload");
}

// ===== Stale Signals =====

#[test]
fn test_superseded_ready_signal_is_ignored() {
    let (mut controller, _) = controller_with(&["A", "B", "C"]);
    start(&mut controller);

    controller.select_track(1);
    let superseded = current_token(&controller);
    controller.select_track(2);

    controller.handle_signal(MediaSignal::ReadyToPlay { token: superseded });
    assert_eq!(controller.media().play_count(), 1);

    ready(&mut controller);
    assert_eq!(controller.media().play_count(), 2);
    assert_eq!(controller.current_index(), Some(2));
}

#[test]
fn test_pause_cancels_pending_autoplay() {
    let (mut controller, _) = controller_with(&["A", "B"]);
    start(&mut controller);

    controller.next();
    controller.pause();
    ready(&mut controller);

    assert_eq!(controller.state(), PlaybackState::Paused);
    assert_eq!(controller.media().play_count(), 1);
}

#[test]
fn test_stale_ended_does_not_advance() {
    let (mut controller, _) = controller_with(&["A", "B", "C"]);
    let old = current_token(&controller);

    controller.next();
    controller.handle_signal(MediaSignal::Ended { token: old });

    assert_eq!(controller.current_index(), Some(1));
}

// ===== Auto-advance =====

#[test]
fn test_end_of_last_track_wraps_and_keeps_playing() {
    let (mut controller, store) = controller_with(&["A", "B", "C"]);
    controller.play_track(2).unwrap();
    ready(&mut controller);
    controller.drain_events();

    end(&mut controller);

    assert_eq!(controller.current_index(), Some(0));
    assert!(controller.is_playing());
    assert_eq!(stored_time(&store), Some(200.0), "finished position persisted");
    assert_eq!(stored(&store, keys::LAST_PLAYED_INDEX).as_deref(), Some("0"));
    assert!(controller.drain_events().contains(&PlaybackEvent::TrackFinished {
        track_id: TrackId::new(3)
    }));

    ready(&mut controller);
    assert!(controller.media().playing);
}

#[test]
fn test_single_track_playlist_loops() {
    let (mut controller, _) = controller_with(&["A"]);
    start(&mut controller);

    end(&mut controller);
    assert_eq!(controller.current_index(), Some(0));
    assert_eq!(controller.media().load_count(), 2);

    ready(&mut controller);
    assert!(controller.media().playing);
}

// ===== Telemetry =====

#[test]
fn test_time_update_refreshes_and_saves_periodically() {
    let (mut controller, store) = controller_with(&["A"]);
    start(&mut controller);

    tick(&mut controller, 2.0);
    assert_eq!(controller.current_time(), 2.0);
    assert_eq!(controller.duration(), 200.0);
    assert_eq!(stored_time(&store), None);

    tick(&mut controller, 6.0);
    assert_eq!(stored_time(&store), Some(6.0));

    tick(&mut controller, 8.0);
    assert_eq!(stored_time(&store), Some(6.0));

    tick(&mut controller, 11.5);
    assert_eq!(stored_time(&store), Some(11.5));
}

#[test]
fn test_nan_duration_reads_as_zero() {
    let (mut controller, _) = controller_with(&["A"]);
    let token = current_token(&controller);

    controller.handle_signal(MediaSignal::TimeUpdate { token });

    assert_eq!(controller.duration(), 0.0);
}

#[test]
fn test_failed_media_pauses_and_reports() {
    let (mut controller, _) = controller_with(&["A", "B"]);
    start(&mut controller);
    controller.drain_events();

    let token = current_token(&controller);
    controller.handle_signal(MediaSignal::Failed {
        token,
        message: "decode error".to_string(),
    });

    assert_eq!(controller.state(), PlaybackState::Paused);
    let events = controller.drain_events();
    assert!(events.contains(&PlaybackEvent::Error {
        message: "decode error".to_string()
    }));
}

#[test]
fn test_rejected_autoplay_pauses() {
    let (mut controller, _) = controller_with(&["A", "B"]);
    start(&mut controller);

    controller.next();
    controller.media_mut().reject_play = Some("NotAllowedError".to_string());
    ready(&mut controller);

    assert_eq!(controller.state(), PlaybackState::Paused);
}

// ===== Seeking =====

#[test]
fn test_seek_forwards_value() {
    let (mut controller, _) = controller_with(&["A"]);
    ready(&mut controller);

    controller.seek(12.0);
    controller.seek(f64::NAN);
    controller.seek(500.0);

    assert_eq!(controller.media().seeks(), vec![12.0, 500.0]);
    assert_eq!(controller.current_time(), 500.0);
}

// ===== Volume =====

#[test]
fn test_mute_scenario() {
    let (mut controller, _) = controller_with(&["A"]);
    assert_eq!(controller.volume(), 0.5);
    assert!(!controller.is_muted());

    controller.toggle_mute();
    assert_eq!(controller.effective_volume(), 0.0);
    assert_eq!(controller.media().volume, 0.0);
    assert_eq!(controller.volume(), 0.5);

    controller.toggle_mute();
    assert_eq!(controller.effective_volume(), 0.5);
    assert_eq!(controller.media().volume, 0.5);
}

#[test]
fn test_volume_up_clears_mute() {
    let (mut controller, _) = controller_with(&["A"]);
    controller.toggle_mute();

    controller.set_volume(0.0);
    assert!(controller.is_muted(), "zero does not unmute");

    controller.set_volume(0.8);
    assert!(!controller.is_muted());
    assert_eq!(controller.media().volume, 0.8);
}

#[test]
fn test_volume_clamped_and_nan_ignored() {
    let (mut controller, _) = controller_with(&["A"]);

    controller.set_volume(1.7);
    assert_eq!(controller.volume(), 1.0);

    controller.set_volume(f32::NAN);
    assert_eq!(controller.volume(), 1.0);
}

// ===== Restore-on-start =====

#[test]
fn test_restores_index_and_position() {
    let store = Arc::new(MemoryStore::with_entries([
        (keys::LAST_PLAYED_INDEX, "2"),
        (keys::LAST_PLAYED_TIME, "42.5"),
    ]));
    let mut controller = controller_over(store);

    controller.set_queue(tracks(&["A", "B", "C"]));

    assert_eq!(controller.current_index(), Some(2));
    assert_eq!(controller.media().seeks(), vec![42.5]);
    assert_eq!(controller.current_time(), 42.5);
    assert!(matches!(controller.media().calls[1], Call::Load(..)));
}

#[test]
fn test_restore_round_trip() {
    let store = Arc::new(MemoryStore::new());
    {
        let mut controller = controller_over(Arc::clone(&store));
        controller.set_queue(tracks(&["A", "B", "C"]));
        controller.play_track(1).unwrap();
        ready(&mut controller);
        tick(&mut controller, 30.25);
        controller.pause();
    }

    let mut controller = controller_over(store);
    controller.set_queue(tracks(&["A", "B", "C"]));

    assert_eq!(controller.current_index(), Some(1));
    assert_eq!(controller.media().seeks(), vec![30.25]);
}

#[test]
fn test_out_of_range_restored_index_falls_back() {
    let store = Arc::new(MemoryStore::with_entries([(keys::LAST_PLAYED_INDEX, "7")]));
    let mut controller = controller_over(Arc::clone(&store));

    controller.set_queue(tracks(&["A", "B", "C"]));

    assert_eq!(controller.current_index(), Some(0));
    assert_eq!(stored(&store, keys::LAST_PLAYED_INDEX).as_deref(), Some("0"));
}

#[test]
fn test_malformed_persisted_values_use_defaults() {
    let store = Arc::new(MemoryStore::with_entries([
        (keys::LAST_PLAYED_INDEX, "two"),
        (keys::LAST_PLAYED_TIME, "NaN"),
    ]));
    let mut controller = controller_over(store);

    controller.set_queue(tracks(&["A", "B"]));

    assert_eq!(controller.current_index(), Some(0));
    assert_eq!(controller.current_time(), 0.0);
    assert!(controller.media().seeks().is_empty());
}

/// Store whose every read and write fails
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> mixtape_core::Result<Option<String>> {
        Err(CoreError::storage("quota exceeded"))
    }

    fn set(&self, _key: &str, _value: &str) -> mixtape_core::Result<()> {
        Err(CoreError::storage("quota exceeded"))
    }

    fn remove(&self, _key: &str) -> mixtape_core::Result<()> {
        Err(CoreError::storage("quota exceeded"))
    }
}

#[test]
fn test_unreadable_store_starts_from_the_beginning() {
    let mut controller =
        PlaybackController::new(RecordingMedia::default(), BrokenStore, PlaybackConfig::default());

    controller.set_queue(tracks(&["A", "B"]));

    assert_eq!(controller.current_index(), Some(0));
    assert_eq!(controller.current_time(), 0.0);
    assert!(controller.media().seeks().is_empty());

    // Failed saves never interrupt playback
    controller.play_track(1).unwrap();
    let token = controller.loaded_token().unwrap();
    controller.handle_signal(MediaSignal::ReadyToPlay { token });
    controller.pause();
    assert_eq!(controller.current_index(), Some(1));
    assert_eq!(controller.state(), PlaybackState::Paused);
}

// ===== Queue Changes =====

#[test]
fn test_removing_current_track_moves_to_its_successor() {
    let (mut controller, store) = controller_with(&["A", "B", "C"]);
    start(&mut controller);
    controller.select_track(1);
    ready(&mut controller);
    let plays = controller.media().play_count();

    let mut remaining = tracks(&["A", "B", "C"]);
    remaining.remove(1);
    controller.set_queue(remaining);

    assert_eq!(controller.current_index(), Some(1));
    assert_eq!(controller.current_track().unwrap().id, TrackId::new(3));
    assert!(controller.is_playing());
    assert_eq!(stored(&store, keys::LAST_PLAYED_INDEX).as_deref(), Some("1"));

    ready(&mut controller);
    assert_eq!(controller.media().play_count(), plays + 1);
}

#[test]
fn test_removing_current_last_track_wraps_to_first() {
    let (mut controller, _) = controller_with(&["A", "B", "C"]);
    controller.select_track(2);

    controller.set_queue(tracks(&["A", "B"]));

    assert_eq!(controller.current_index(), Some(0));
    assert_eq!(controller.state(), PlaybackState::Paused);
}

#[test]
fn test_removing_earlier_track_repoints_index() {
    let (mut controller, store) = controller_with(&["A", "B", "C"]);
    controller.select_track(2);
    let token = current_token(&controller);

    let mut remaining = tracks(&["A", "B", "C"]);
    remaining.remove(0);
    controller.set_queue(remaining);

    assert_eq!(controller.current_index(), Some(1));
    assert_eq!(controller.current_track().unwrap().id, TrackId::new(3));
    assert_eq!(current_token(&controller), token, "no reload");
    assert_eq!(stored(&store, keys::LAST_PLAYED_INDEX).as_deref(), Some("1"));
}

#[test]
fn test_emptied_queue_returns_to_idle() {
    let (mut controller, _) = controller_with(&["A"]);
    start(&mut controller);
    tick(&mut controller, 4.0);

    controller.set_queue(Vec::new());

    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(controller.current_index(), None);
    assert_eq!(controller.current_time(), 0.0);
    assert_eq!(controller.media().calls.last(), Some(&Call::Unload));
    assert!(controller.loaded_token().is_none());

    controller.set_queue(tracks(&["B"]));
    assert_eq!(controller.state(), PlaybackState::Paused);
    assert_eq!(controller.current_index(), Some(0));
}

#[test]
fn test_snapshot_reflects_state() {
    let (mut controller, _) = controller_with(&["A", "B"]);
    start(&mut controller);
    tick(&mut controller, 9.0);

    let snapshot = controller.snapshot();

    assert!(snapshot.is_playing());
    assert_eq!(snapshot.current_index, Some(0));
    assert_eq!(snapshot.title.as_deref(), Some("A"));
    assert_eq!(snapshot.current_time, 9.0);
    assert_eq!(snapshot.duration, 200.0);
    assert_eq!(snapshot.queue_len, 2);
    assert_eq!(snapshot.effective_volume(), 0.5);
}
