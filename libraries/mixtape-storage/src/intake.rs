//! Upload intake
//!
//! Turns a batch of user-chosen local files into `NewTrack` records. Each
//! file gets a freshly minted media reference that lives only as long as the
//! `ObjectUrlRegistry` that issued it, the same lifetime a browser object
//! URL has. Only metadata survives a restart.

use mixtape_core::{MediaRef, NewTrack};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use uuid::Uuid;

const OBJECT_URL_PREFIX: &str = "blob:mixtape/";

/// A file chosen by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// File name as shown to the user (becomes the track title)
    pub name: String,

    /// Location of the bytes
    pub path: PathBuf,
}

impl UploadedFile {
    /// Describe a local file, using its file name as the display name
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }
}

/// Session-scoped registry of generated media references
#[derive(Debug, Default)]
pub struct ObjectUrlRegistry {
    urls: RwLock<HashMap<MediaRef, PathBuf>>,
}

impl ObjectUrlRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a new reference for `path`
    pub fn create(&self, path: impl Into<PathBuf>) -> MediaRef {
        let media_ref = MediaRef::new(format!("{OBJECT_URL_PREFIX}{}", Uuid::new_v4()));
        if let Ok(mut urls) = self.urls.write() {
            urls.insert(media_ref.clone(), path.into());
        }
        media_ref
    }

    /// Resolve a reference minted by this registry
    pub fn resolve(&self, media_ref: &MediaRef) -> Option<PathBuf> {
        self.urls.read().ok()?.get(media_ref).cloned()
    }

    /// Release a reference; later `resolve` calls return `None`
    pub fn revoke(&self, media_ref: &MediaRef) {
        if let Ok(mut urls) = self.urls.write() {
            urls.remove(media_ref);
        }
    }

    /// Number of live references
    pub fn len(&self) -> usize {
        self.urls.read().map(|u| u.len()).unwrap_or(0)
    }

    /// Check if no references are live
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Convert a batch of files into intake records
///
/// The title is the file name (extension included), artist and album are
/// left empty. An empty batch yields an empty vec.
pub fn intake_files(files: Vec<UploadedFile>, registry: &ObjectUrlRegistry) -> Vec<NewTrack> {
    files
        .into_iter()
        .map(|file| {
            let media_ref = registry.create(file.path);
            tracing::debug!("Minted {} for {:?}", media_ref, file.name);
            NewTrack::new(file.name, media_ref)
        })
        .collect()
}

/// Check whether `path` has one of `extensions` (case-insensitive, no dot)
pub fn is_audio_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
}
