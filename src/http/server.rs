use log::info;
use rouille::{Request, Response};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::{
    config::HttpConfig,
    controller::Controller,
    domain::track::TrackId,
    http::error::ApiError,
    render::{self, RenderedResults},
};

pub struct HttpServer {
    controller: Arc<Mutex<Controller>>,
    pub config: HttpConfig,
}

impl HttpServer {
    pub fn new(controller: Controller, config: HttpConfig) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            config,
        }
    }

    pub fn run(self) {
        let addr = format!("{}:{}", self.config.bind_addr, self.config.port);
        rouille::start_server(addr, move |request| self.handle_request(request));
    }

    fn handle_request(&self, request: &Request) -> Response {
        Self::log_request(request);

        let response = rouille::router!(request,
            (GET) (/) => {
                Self::handle_widget_page()
            },

            (GET) (/api/search) => {
                self.handle_search(request)
            },

            (POST) (/api/favorites/toggle) => {
                self.handle_toggle_favorite(request)
            },

            (GET) (/api/favorites) => {
                self.handle_list_favorites()
            },

            (POST) (/api/playback/started) => {
                self.handle_playback_started(request)
            },

            (POST) (/api/playback/ended) => {
                self.handle_playback_ended(request)
            },

            _ => Response::empty_404()
        );

        info!("Response: {} {}", request.method(), response.status_code);
        response
    }

    fn log_request(request: &Request) {
        info!("{} {}", request.method(), request.url());
    }

    fn handle_widget_page() -> Response {
        let template = include_str!("../../html/app.html");
        Response::html(template.replace("{{STATUS}}", render::STATUS_READY))
    }

    /// Always answers 200; a failed search is carried in `status`,
    /// never as a transport error.
    fn handle_search(&self, request: &Request) -> Response {
        let query = request.get_param("q").unwrap_or_default();
        let limit = request.get_param("limit");

        // The upstream request runs with the lock released; favorites
        // and playback calls must not queue behind a slow search.
        let plan = {
            let controller = self.controller.lock().unwrap();
            controller.plan_search(&query, limit.as_deref())
        };

        let outcome = match plan {
            Some(plan) => {
                let result = plan.run();

                let controller = self.controller.lock().unwrap();
                controller.render_search(plan.query(), result)
            }

            None => RenderedResults::status_only(render::PROMPT_EMPTY_QUERY),
        };

        Response::json(&SearchResponse::from_outcome(outcome))
    }

    fn handle_toggle_favorite(&self, request: &Request) -> Response {
        let body: ToggleRequest = match rouille::input::json_input(request) {
            Ok(body) => body,
            Err(_) => return ApiError::BadRequest("invalid toggle body".into()).into_response(),
        };

        let result = {
            let mut controller = self.controller.lock().unwrap();
            controller.toggle_favorite(TrackId(body.id))
        };

        match result {
            Ok(favorite) => Response::json(&ToggleResponse {
                id: body.id,
                favorite,
                label: render::favorite_label(favorite).to_string(),
            }),

            Err(e) => {
                log::error!("favorite toggle for {} failed: {e}", body.id);
                ApiError::from(e).into_response()
            }
        }
    }

    fn handle_list_favorites(&self) -> Response {
        let ids: Vec<TrackId> = {
            let controller = self.controller.lock().unwrap();
            controller.favorite_ids().to_vec()
        };

        Response::json(&FavoritesResponse { ids })
    }

    fn handle_playback_started(&self, request: &Request) -> Response {
        let body: PlaybackRequest = match rouille::input::json_input(request) {
            Ok(body) => body,
            Err(_) => return ApiError::BadRequest("invalid playback body".into()).into_response(),
        };

        let stop = {
            let mut controller = self.controller.lock().unwrap();
            controller.playback_started(&body.handle)
        };

        Response::json(&PlaybackResponse { stop })
    }

    fn handle_playback_ended(&self, request: &Request) -> Response {
        let body: PlaybackRequest = match rouille::input::json_input(request) {
            Ok(body) => body,
            Err(_) => return ApiError::BadRequest("invalid playback body".into()).into_response(),
        };

        {
            let mut controller = self.controller.lock().unwrap();
            controller.playback_ended(&body.handle);
        }

        Response::empty_204()
    }
}

#[derive(Serialize, Deserialize)]
struct SearchResponse {
    status: String,
    html: String,
    count: usize,
}

impl SearchResponse {
    fn from_outcome(outcome: RenderedResults) -> Self {
        Self {
            status: outcome.status,
            html: outcome.html,
            count: outcome.count,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ToggleRequest {
    id: i64,
}

#[derive(Serialize, Deserialize)]
struct ToggleResponse {
    id: i64,
    favorite: bool,
    label: String,
}

#[derive(Serialize, Deserialize)]
struct FavoritesResponse {
    ids: Vec<TrackId>,
}

#[derive(Serialize, Deserialize)]
struct PlaybackRequest {
    handle: String,
}

#[derive(Serialize, Deserialize)]
struct PlaybackResponse {
    stop: Option<String>,
}

#[cfg(test)]
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: rouille::Response,
) -> anyhow::Result<T> {
    Ok(serde_json::from_reader(
        response.data.into_reader_and_size().0,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io::Read,
        path::Path,
        sync::{Arc, Mutex},
        thread,
        time::{Duration, Instant},
    };

    use rouille::Request;
    use tempfile::{TempDir, tempdir};

    use crate::{
        catalog::{Catalog, error::CatalogError},
        domain::track::Track,
        favorites::FavoritesStore,
    };

    struct FakeCatalog {
        response: FakeResponse,
    }

    #[derive(Clone)]
    enum FakeResponse {
        Tracks(Vec<Track>),
        Upstream(u16),
        Slow(Duration),
    }

    impl Catalog for FakeCatalog {
        fn search(&self, _query: &str, _limit: u32) -> Result<Vec<Track>, CatalogError> {
            match &self.response {
                FakeResponse::Tracks(tracks) => Ok(tracks.clone()),
                FakeResponse::Upstream(status) => Err(CatalogError::Status(*status)),

                FakeResponse::Slow(delay) => {
                    thread::sleep(*delay);
                    Ok(Vec::new())
                }
            }
        }
    }

    fn mock_track(id: i64, title: &str) -> Track {
        Track {
            id: TrackId(id),
            title: title.to_string(),
            artist: "Some Artist".to_string(),
            album: "Some Album".to_string(),
            cover_url: format!("https://cdn.example/cover/{id}.jpg"),
            preview_url: format!("https://cdn.example/preview/{id}.mp3"),
        }
    }

    fn create_server(response: FakeResponse) -> (HttpServer, TempDir) {
        let dir = tempdir().unwrap();
        let server = server_with_favorites(response, &dir.path().join("favorites.json"));

        (server, dir)
    }

    fn server_with_favorites(response: FakeResponse, favorites_path: &Path) -> HttpServer {
        let favorites = FavoritesStore::load(favorites_path);
        let controller = Controller::new(Arc::new(FakeCatalog { response }), favorites, 20);

        HttpServer {
            controller: Arc::new(Mutex::new(controller)),
            config: HttpConfig {
                bind_addr: "0.0.0.0".to_string(),
                port: 8080,
            },
        }
    }

    fn create_empty_server() -> (HttpServer, TempDir) {
        create_server(FakeResponse::Tracks(vec![]))
    }

    fn json_post(url: &str, body: &str) -> Request {
        Request::fake_http(
            "POST",
            url,
            vec![("Content-Type".to_string(), "application/json".to_string())],
            body.as_bytes().to_vec(),
        )
    }

    // --------------------------------------------------
    // WIDGET PAGE
    // --------------------------------------------------

    #[test]
    fn test_widget_page_served_with_ready_status() -> anyhow::Result<()> {
        let (server, _dir) = create_empty_server();

        let request = Request::fake_http("GET", "/", vec![], vec![]);

        let response = server.handle_request(&request);
        assert_eq!(response.status_code, 200);

        let mut body = String::new();
        response
            .data
            .into_reader_and_size()
            .0
            .read_to_string(&mut body)?;

        assert!(body.contains(render::STATUS_READY));
        assert!(body.contains(r#"id="grid""#));
        assert!(!body.contains("{{STATUS}}"));

        Ok(())
    }

    #[test]
    fn test_widget_page_clears_grid_at_submit() -> anyhow::Result<()> {
        let (server, _dir) = create_empty_server();

        let response = server.handle_request(&Request::fake_http("GET", "/", vec![], vec![]));

        let mut body = String::new();
        response
            .data
            .into_reader_and_size()
            .0
            .read_to_string(&mut body)?;

        // Stale cards drop the moment a new search is submitted, not
        // when the response lands.
        let submit = body.find("'Searching...'").unwrap();
        assert!(body[submit..].contains("grid.innerHTML = '';"));

        Ok(())
    }

    #[test]
    fn test_unknown_route_is_404() {
        let (server, _dir) = create_empty_server();

        let request = Request::fake_http("GET", "/definitely/not/here", vec![], vec![]);

        let response = server.handle_request(&request);

        assert_eq!(response.status_code, 404);
    }

    // --------------------------------------------------
    // SEARCH
    // --------------------------------------------------

    #[test]
    fn test_search_empty_query_prompts() -> anyhow::Result<()> {
        let (server, _dir) = create_empty_server();

        let request = Request::fake_http("GET", "/api/search?q=", vec![], vec![]);

        let response = server.handle_request(&request);
        assert_eq!(response.status_code, 200);

        let body: SearchResponse = parse_json_response(response)?;

        assert_eq!(body.status, render::PROMPT_EMPTY_QUERY);
        assert_eq!(body.count, 0);
        assert_eq!(body.html, "");

        Ok(())
    }

    #[test]
    fn test_search_renders_cards() -> anyhow::Result<()> {
        let tracks = vec![mock_track(1, "Hello"), mock_track(2, "Skyfall")];
        let (server, _dir) = create_server(FakeResponse::Tracks(tracks));

        let request = Request::fake_http("GET", "/api/search?q=adele&limit=10", vec![], vec![]);

        let response = server.handle_request(&request);
        assert_eq!(response.status_code, 200);

        let body: SearchResponse = parse_json_response(response)?;

        assert_eq!(body.status, "");
        assert_eq!(body.count, 2);
        assert!(body.html.contains("Hello"));
        assert!(body.html.contains("Skyfall"));

        Ok(())
    }

    #[test]
    fn test_search_upstream_failure_still_200() -> anyhow::Result<()> {
        let (server, _dir) = create_server(FakeResponse::Upstream(500));

        let request = Request::fake_http("GET", "/api/search?q=adele", vec![], vec![]);

        let response = server.handle_request(&request);
        assert_eq!(response.status_code, 200);

        let body: SearchResponse = parse_json_response(response)?;

        assert_eq!(body.status, render::STATUS_FETCH_ERROR);
        assert_eq!(body.count, 0);
        assert_eq!(body.html, "");

        Ok(())
    }

    #[test]
    fn test_playback_event_not_stalled_by_slow_search() {
        let (server, _dir) = create_server(FakeResponse::Slow(Duration::from_millis(300)));
        let server = Arc::new(server);

        let search_thread = {
            let server = Arc::clone(&server);
            thread::spawn(move || {
                let request = Request::fake_http("GET", "/api/search?q=adele", vec![], vec![]);
                let response = server.handle_request(&request);
                assert_eq!(response.status_code, 200);
            })
        };

        // Let the search reach the upstream call
        thread::sleep(Duration::from_millis(50));

        let started = Instant::now();
        let response = server.handle_request(&json_post(
            "/api/playback/started",
            r#"{"handle":"preview-1"}"#,
        ));
        let waited = started.elapsed();

        assert_eq!(response.status_code, 200);
        assert!(
            waited < Duration::from_millis(200),
            "playback event queued {waited:?} behind the search"
        );

        search_thread.join().unwrap();
    }

    // --------------------------------------------------
    // FAVORITES
    // --------------------------------------------------

    #[test]
    fn test_toggle_favorite_roundtrip() -> anyhow::Result<()> {
        let (server, _dir) = create_empty_server();

        let response = server.handle_request(&json_post("/api/favorites/toggle", r#"{"id":42}"#));
        assert_eq!(response.status_code, 200);

        let body: ToggleResponse = parse_json_response(response)?;
        assert_eq!(body.id, 42);
        assert!(body.favorite);
        assert_eq!(body.label, "★ Favorite");

        let response = server.handle_request(&json_post("/api/favorites/toggle", r#"{"id":42}"#));
        let body: ToggleResponse = parse_json_response(response)?;
        assert!(!body.favorite);
        assert_eq!(body.label, "☆ Favorite");

        Ok(())
    }

    #[test]
    fn test_toggle_favorite_persist_failure_is_500() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("favorites.json");
        // Occupy the file's path so every save fails
        std::fs::create_dir(&path)?;

        let server = server_with_favorites(FakeResponse::Tracks(vec![]), &path);

        let response = server.handle_request(&json_post("/api/favorites/toggle", r#"{"id":7}"#));
        assert_eq!(response.status_code, 500);

        let request = Request::fake_http("GET", "/api/favorites", vec![], vec![]);
        let body: FavoritesResponse = parse_json_response(server.handle_request(&request))?;
        assert!(body.ids.is_empty());

        Ok(())
    }

    #[test]
    fn test_toggle_favorite_invalid_body() {
        let (server, _dir) = create_empty_server();

        let response = server.handle_request(&json_post("/api/favorites/toggle", "not json"));

        assert_eq!(response.status_code, 400);
    }

    #[test]
    fn test_list_favorites_keeps_insertion_order() -> anyhow::Result<()> {
        let (server, _dir) = create_empty_server();

        for id in [3, 1, 2] {
            let body = format!(r#"{{"id":{id}}}"#);
            server.handle_request(&json_post("/api/favorites/toggle", &body));
        }

        let request = Request::fake_http("GET", "/api/favorites", vec![], vec![]);
        let response = server.handle_request(&request);
        assert_eq!(response.status_code, 200);

        let body: FavoritesResponse = parse_json_response(response)?;

        assert_eq!(body.ids, vec![TrackId(3), TrackId(1), TrackId(2)]);

        Ok(())
    }

    // --------------------------------------------------
    // PLAYBACK
    // --------------------------------------------------

    #[test]
    fn test_playback_started_reports_handle_to_stop() -> anyhow::Result<()> {
        let (server, _dir) = create_empty_server();

        let response = server.handle_request(&json_post(
            "/api/playback/started",
            r#"{"handle":"preview-1"}"#,
        ));
        assert_eq!(response.status_code, 200);

        let body: PlaybackResponse = parse_json_response(response)?;
        assert_eq!(body.stop, None);

        let response = server.handle_request(&json_post(
            "/api/playback/started",
            r#"{"handle":"preview-2"}"#,
        ));
        let body: PlaybackResponse = parse_json_response(response)?;
        assert_eq!(body.stop.as_deref(), Some("preview-1"));

        Ok(())
    }

    #[test]
    fn test_playback_ended_clears_active() -> anyhow::Result<()> {
        let (server, _dir) = create_empty_server();

        server.handle_request(&json_post(
            "/api/playback/started",
            r#"{"handle":"preview-1"}"#,
        ));

        let response = server.handle_request(&json_post(
            "/api/playback/ended",
            r#"{"handle":"preview-1"}"#,
        ));
        assert_eq!(response.status_code, 204);

        // Next start has nothing to stop
        let response = server.handle_request(&json_post(
            "/api/playback/started",
            r#"{"handle":"preview-2"}"#,
        ));
        let body: PlaybackResponse = parse_json_response(response)?;
        assert_eq!(body.stop, None);

        Ok(())
    }

    #[test]
    fn test_playback_invalid_body() {
        let (server, _dir) = create_empty_server();

        let response = server.handle_request(&json_post("/api/playback/started", r#"{"nope":1}"#));

        assert_eq!(response.status_code, 400);
    }
}
