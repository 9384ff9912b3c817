/// ID and reference types for Mixtape entities
use serde::{Deserialize, Serialize};
use std::fmt;

/// Track identifier
///
/// Unique within a track list and stable for the whole session. Integer ids
/// keep the persisted playlist readable by older builds. Issued ids never
/// exceed [`TrackId::MAX`], so they survive a round trip through a JS number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(u64);

impl TrackId {
    /// Largest id ever issued (`Number.MAX_SAFE_INTEGER`)
    pub const MAX: Self = Self((1 << 53) - 1);

    /// Create a track ID
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id following this one, `None` past [`TrackId::MAX`]
    pub const fn checked_next(self) -> Option<Self> {
        if self.0 >= Self::MAX.0 {
            None
        } else {
            Some(Self(self.0 + 1))
        }
    }

    /// Convert a JS number, `None` unless it is an integer in `0..=MAX`
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_f64(value: f64) -> Option<Self> {
        if value.fract() != 0.0 || !(0.0..=Self::MAX.0 as f64).contains(&value) {
            return None;
        }
        Some(Self(value as u64))
    }

    /// Whether this id is in the range ids are issued from
    pub const fn is_issuable(self) -> bool {
        self.0 <= Self::MAX.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TrackId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Opaque reference the platform resolves to playable audio
///
/// Typically a transient object URL. Not guaranteed to resolve after the
/// application restarts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
    /// Wrap a platform reference
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
