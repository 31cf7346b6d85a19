use serde::Deserialize;
use url::Url;

use crate::{
    catalog::error::CatalogError,
    domain::track::{Track, TrackId},
};

/// Public Deezer search endpoint (reached through the relay strategy).
pub const DEEZER_SEARCH_URL: &str = "https://api.deezer.com/search";

/// builds `<base>?q=<query>&limit=<limit>`
pub fn search_url(base: &str, query: &str, limit: u32) -> Result<Url, url::ParseError> {
    let limit = limit.to_string();
    Url::parse_with_params(base, &[("q", query), ("limit", limit.as_str())])
}

/// Deezer wraps results in a `data` array; a bare array is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchBody {
    Envelope { data: Vec<RawTrack> },
    Bare(Vec<RawTrack>),
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    preview: String,
    #[serde(default)]
    artist: RawArtist,
    #[serde(default)]
    album: RawAlbum,
}

#[derive(Debug, Default, Deserialize)]
struct RawArtist {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawAlbum {
    #[serde(default)]
    title: String,
    #[serde(default)]
    cover_medium: String,
}

impl RawTrack {
    fn into_track(self) -> Track {
        Track {
            id: TrackId(self.id),
            title: self.title,
            artist: self.artist.name,
            album: self.album.title,
            cover_url: self.album.cover_medium,
            preview_url: self.preview,
        }
    }
}

/// Normalizes a search response body into at most `limit` tracks.
///
/// Records are passed through without per-record validation; absent
/// fields become empty values. A body that is neither an envelope nor
/// an array is malformed.
pub fn parse_search_body(body: &str, limit: u32) -> Result<Vec<Track>, CatalogError> {
    let parsed: SearchBody = serde_json::from_str(body)?;

    let raw = match parsed {
        SearchBody::Envelope { data } => data,
        SearchBody::Bare(records) => records,
    };

    let mut tracks: Vec<Track> = raw.into_iter().map(RawTrack::into_track).collect();
    tracks.truncate(limit as usize);

    Ok(tracks)
}
