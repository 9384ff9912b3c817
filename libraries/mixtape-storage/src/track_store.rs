//! Ordered, persisted track list
//!
//! Insertion order is meaningful: it defines "next" and "previous" for the
//! playback controller. Ids are unique within the list at all times.

use mixtape_core::{keys, KeyValueStore, NewTrack, Track, TrackId};
use std::collections::HashSet;

/// The playlist
///
/// Every mutation writes the full list under `keys::PLAYLIST`. Persisted
/// data that is absent or unparsable loads as an empty list.
pub struct TrackStore<S> {
    store: S,
    tracks: Vec<Track>,
    last_issued: TrackId,
}

impl<S: KeyValueStore> TrackStore<S> {
    /// Rehydrate the track list from `store`
    ///
    /// Every persisted track is kept. Entries whose id repeats an earlier
    /// one, or lies outside the issuable range, get fresh ids and the
    /// repaired list is written back.
    pub fn open(store: S) -> Self {
        let loaded = match store.get(keys::PLAYLIST) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Track>>(&json) {
                Ok(tracks) => tracks,
                Err(e) => {
                    tracing::warn!("Ignoring unreadable persisted playlist: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read persisted playlist: {}", e);
                Vec::new()
            }
        };

        let mut seen = HashSet::new();
        let needs_id: Vec<bool> = loaded
            .iter()
            .map(|t| !t.id.is_issuable() || !seen.insert(t.id))
            .collect();

        let mut this = Self {
            store,
            last_issued: seen.iter().copied().max().unwrap_or(TrackId::new(0)),
            tracks: loaded,
        };

        let mut repaired = 0;
        for (index, needs_id) in needs_id.into_iter().enumerate() {
            if needs_id {
                let id = this.issue_id();
                this.tracks[index].id = id;
                repaired += 1;
            }
        }

        if repaired > 0 {
            tracing::warn!("Assigned fresh ids to {} persisted tracks", repaired);
            this.persist();
        }

        tracing::debug!("Loaded {} persisted tracks", this.tracks.len());
        this
    }

    /// Append `new_tracks`, assigning each a fresh id
    ///
    /// Returns the stored tracks. Empty input is a no-op and writes nothing.
    pub fn add(&mut self, new_tracks: Vec<NewTrack>) -> Vec<Track> {
        if new_tracks.is_empty() {
            return Vec::new();
        }

        let mut added = Vec::with_capacity(new_tracks.len());
        for new in new_tracks {
            let track = Track::from_new(self.issue_id(), new);
            self.tracks.push(track.clone());
            added.push(track);
        }

        tracing::info!("Added {} tracks ({} total)", added.len(), self.tracks.len());
        self.persist();

        added
    }

    /// Remove the track with `id`
    ///
    /// Returns its former position and the track. Unknown ids are a no-op.
    pub fn remove(&mut self, id: TrackId) -> Option<(usize, Track)> {
        let index = self.position(id)?;
        let track = self.tracks.remove(index);

        tracing::info!("Removed track {} ({:?})", id, track.title);
        self.persist();

        Some((index, track))
    }

    /// Current contents in insertion order
    pub fn all(&self) -> &[Track] {
        &self.tracks
    }

    /// Look up a track by id
    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Position of the track with `id`
    pub fn position(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Backing key-value store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Next unused id
    ///
    /// Ids count up from the highest one seen. Once that reaches
    /// `TrackId::MAX` the lowest id not in the list is handed out instead.
    fn issue_id(&mut self) -> TrackId {
        if let Some(id) = self.last_issued.checked_next() {
            self.last_issued = id;
            return id;
        }

        let id = lowest_free(self.tracks.iter().map(|t| t.id));
        tracing::warn!("Track id space exhausted, reusing free id {}", id);
        id
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.tracks) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize playlist: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.set(keys::PLAYLIST, &json) {
            tracing::warn!("Failed to persist playlist: {}", e);
        }
    }
}

/// Smallest positive id not in `ids`
fn lowest_free(ids: impl Iterator<Item = TrackId>) -> TrackId {
    let mut taken: Vec<u64> = ids.map(TrackId::get).collect();
    taken.sort_unstable();

    let mut candidate = 1;
    for id in taken {
        if id == candidate {
            candidate += 1;
        } else if id > candidate {
            break;
        }
    }
    TrackId::new(candidate)
}
