use std::sync::Arc;

use log::error;

use crate::{
    catalog::{Catalog, error::CatalogError},
    domain::track::{Track, TrackId},
    favorites::{FavoritesStore, error::StoreError},
    playback::PlaybackCoordinator,
    render::{self, RenderedResults},
};

/// Wires user actions to the catalog client, the favorites store and
/// the playback coordinator. All widget state lives here; the http
/// layer is a thin transport on top.
pub struct Controller {
    catalog: Arc<dyn Catalog>,
    favorites: FavoritesStore,
    playback: PlaybackCoordinator,
    default_limit: u32,
}

/// A validated search ready to run. Carries its own catalog handle so
/// the upstream request can proceed while the controller itself is
/// free to serve favorites and playback calls.
pub struct SearchPlan {
    catalog: Arc<dyn Catalog>,
    query: String,
    limit: u32,
}

impl SearchPlan {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn run(&self) -> Result<Vec<Track>, CatalogError> {
        self.catalog.search(&self.query, self.limit)
    }
}

impl Controller {
    pub fn new(catalog: Arc<dyn Catalog>, favorites: FavoritesStore, default_limit: u32) -> Self {
        Self {
            catalog,
            favorites,
            playback: PlaybackCoordinator::new(),
            default_limit,
        }
    }

    /// Validates a submission. Empty queries plan nothing; otherwise
    /// the plan carries the trimmed query and the resolved limit.
    pub fn plan_search(&self, raw_query: &str, raw_limit: Option<&str>) -> Option<SearchPlan> {
        let query = raw_query.trim();
        if query.is_empty() {
            // No catalog call for empty submissions
            return None;
        }

        Some(SearchPlan {
            catalog: Arc::clone(&self.catalog),
            query: query.to_string(),
            limit: parse_limit(raw_limit, self.default_limit),
        })
    }

    /// Turns a finished upstream call into a renderable outcome. An
    /// upstream failure becomes a status line, never an error for the
    /// transport layer.
    pub fn render_search(
        &self,
        query: &str,
        result: Result<Vec<Track>, CatalogError>,
    ) -> RenderedResults {
        match result {
            Ok(tracks) => render::render_tracks(&tracks, |id| self.favorites.is_favorite(id)),

            Err(e) => {
                error!("search {query:?} failed: {e}");
                RenderedResults::status_only(render::STATUS_FETCH_ERROR)
            }
        }
    }

    /// Search submission as one call, for callers that do not share
    /// the controller behind a lock.
    pub fn handle_search(&self, raw_query: &str, raw_limit: Option<&str>) -> RenderedResults {
        match self.plan_search(raw_query, raw_limit) {
            Some(plan) => self.render_search(plan.query(), plan.run()),

            None => RenderedResults::status_only(render::PROMPT_EMPTY_QUERY),
        }
    }

    pub fn toggle_favorite(&mut self, id: TrackId) -> Result<bool, StoreError> {
        self.favorites.toggle(id)
    }

    pub fn is_favorite(&self, id: TrackId) -> bool {
        self.favorites.is_favorite(id)
    }

    pub fn favorite_ids(&self) -> &[TrackId] {
        self.favorites.ids()
    }

    pub fn playback_started(&mut self, handle: &str) -> Option<String> {
        self.playback.register_play_start(handle)
    }

    pub fn playback_ended(&mut self, handle: &str) {
        self.playback.register_ended(handle);
    }
}

/// Absent, non-numeric or zero limits fall back to the configured default.
fn parse_limit(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|&limit| limit > 0)
        .unwrap_or(default)
}
