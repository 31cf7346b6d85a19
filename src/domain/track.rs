use std::fmt;

use serde::{Deserialize, Serialize};

/// Represents the catalog identifier of a track.
///
/// Upstream ids are numeric; the same id is what gets stored
/// in the favorites file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub i64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Represent a music track as the catalog returns it.
///
/// Lives only for the duration of one rendered result set,
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub cover_url: String,
    pub preview_url: String,
}
