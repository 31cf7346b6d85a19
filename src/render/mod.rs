use crate::domain::track::{Track, TrackId};

/// Shown when the user submits an empty query.
pub const PROMPT_EMPTY_QUERY: &str = "Type something to search";

/// Shown when a search matched nothing.
pub const STATUS_NO_RESULTS: &str = "No results.";

/// One generic message for every upstream failure; details go to the log.
pub const STATUS_FETCH_ERROR: &str =
    "Error fetching from Deezer. Check your network or catalog configuration.";

/// Templated into the page on first load.
pub const STATUS_READY: &str =
    "Ready — try searching for \"Adele\", \"Drake\", \"Coldplay\" or \"Eminem\".";

/// One full replacement of the results area plus the status line text.
/// The page swaps the grid wholesale; prior cards never survive a render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedResults {
    pub status: String,
    pub html: String,
    pub count: usize,
}

impl RenderedResults {
    pub fn status_only(status: &str) -> Self {
        Self {
            status: status.to_string(),
            html: String::new(),
            count: 0,
        }
    }
}

pub fn render_tracks(tracks: &[Track], is_favorite: impl Fn(TrackId) -> bool) -> RenderedResults {
    if tracks.is_empty() {
        return RenderedResults::status_only(STATUS_NO_RESULTS);
    }

    let html: String = tracks
        .iter()
        .map(|track| render_card(track, is_favorite(track.id)))
        .collect();

    RenderedResults {
        status: String::new(),
        html,
        count: tracks.len(),
    }
}

pub fn favorite_label(favorite: bool) -> &'static str {
    if favorite { "★ Favorite" } else { "☆ Favorite" }
}

/// Element id of a card's audio element, doubling as its playback handle.
pub fn preview_handle(id: TrackId) -> String {
    format!("preview-{id}")
}

fn render_card(track: &Track, favorite: bool) -> String {
    let title = escape_html(&track.title);
    let artist = escape_html(&track.artist);
    let album = escape_html(&track.album);
    let cover = escape_html(&track.cover_url);
    let preview = escape_html(&track.preview_url);
    let handle = preview_handle(track.id);

    format!(
        r#"<div class="card">
  <img class="cover" src="{cover}" alt="{title} cover">
  <div class="title">{title}</div>
  <div class="meta">{artist} • {album}</div>
  <div class="actions">
    <button class="fav" data-id="{id}">{label}</button>
  </div>
  <audio id="{handle}" data-handle="{handle}" controls preload="none">
    <source src="{preview}" type="audio/mpeg">
    Your browser does not support audio.
  </audio>
</div>
"#,
        id = track.id,
        label = favorite_label(favorite),
    )
}

/// Escapes text for embedding in markup, element or attribute position.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }

    escaped
}
