//! Domain types

mod ids;
mod track;

pub use ids::{MediaRef, TrackId};
pub use track::{NewTrack, Track};
