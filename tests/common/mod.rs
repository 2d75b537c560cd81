//! Fake Spotify Web API for integration tests.
//!
//! Serves a fixed catalog on a random local port. Every route except the token
//! endpoint requires `Authorization: Bearer good-token`.
//!
//! Track IDs are 22-digit zero-padded numbers (see [`tid`]). A few numbers
//! have special behaviour:
//! - 99: track lookup answers 404
//! - 98: primary artist lookup answers 500
//! - 97: first track lookup answers 429 with `Retry-After: 0`
//! - 96: track has no artists
//!
//! Playlist `loop` has two pages whose `next` cursors point at each other.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Instant,
};

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use vibecheck::{config::Config, spotify::SpotifyClient, types::Credential};

pub const GOOD_TOKEN: &str = "good-token";
pub const GOOD_CODE: &str = "good-code";

/// Builds a valid 22-character track ID from a number.
pub fn tid(n: u32) -> String {
    format!("{:0>22}", n)
}

pub fn good_credential() -> Credential {
    Credential::bearer(GOOD_TOKEN)
}

pub fn popularity(n: u32) -> u32 {
    40 + n % 50
}

#[derive(Clone)]
struct FakeState {
    base_url: String,
    track_hits: Arc<AtomicUsize>,
    track_arrivals: Arc<Mutex<Vec<Instant>>>,
    rate_limited_hits: Arc<AtomicUsize>,
}

pub struct FakeSpotify {
    pub base_url: String,
    pub track_hits: Arc<AtomicUsize>,
    track_arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl FakeSpotify {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let state = FakeState {
            base_url: base_url.clone(),
            track_hits: Arc::new(AtomicUsize::new(0)),
            track_arrivals: Arc::new(Mutex::new(Vec::new())),
            rate_limited_hits: Arc::new(AtomicUsize::new(0)),
        };
        let track_hits = Arc::clone(&state.track_hits);
        let track_arrivals = Arc::clone(&state.track_arrivals);

        let app = Router::new()
            .route("/me", get(me))
            .route("/me/playlists", get(my_playlists))
            .route("/me/tracks", get(liked_tracks))
            .route("/playlists/{id}/tracks", get(playlist_tracks))
            .route("/tracks/{id}", get(track))
            .route("/artists/{id}", get(artist))
            .route("/api/token", post(token))
            .with_state(state);

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url,
            track_hits,
            track_arrivals,
        }
    }

    pub fn config(&self) -> Config {
        Config {
            client_id: "test-client".to_string(),
            auth_url: format!("{}/authorize", self.base_url),
            token_url: format!("{}/api/token", self.base_url),
            api_url: self.base_url.clone(),
            enrich_delay_ms: 0,
            request_timeout_secs: 5,
            ..Config::default()
        }
    }

    pub fn client(&self) -> SpotifyClient {
        SpotifyClient::new(Arc::new(self.config())).expect("client")
    }

    pub fn track_hits(&self) -> usize {
        self.track_hits.load(Ordering::SeqCst)
    }

    /// Arrival time of every track lookup, in arrival order.
    pub fn track_arrivals(&self) -> Vec<Instant> {
        self.track_arrivals.lock().unwrap().clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", GOOD_TOKEN))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": {"status": 401, "message": "Invalid access token"}})),
    )
        .into_response()
}

fn offset(query: &HashMap<String, String>) -> u32 {
    query
        .get("offset")
        .and_then(|o| o.parse().ok())
        .unwrap_or(0)
}

fn track_item(n: u32) -> Value {
    json!({"added_at": "2024-01-01T00:00:00Z", "track": {"id": tid(n), "name": format!("Track {}", n)}})
}

async fn me(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"id": "tester", "display_name": "Tester"})).into_response()
}

async fn my_playlists(
    State(state): State<FakeState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let page = match offset(&query) {
        0 => json!({
            "items": [
                {"id": "multi", "name": "Multi", "images": [{"url": "http://img/multi.png"}], "tracks": {"total": 3}},
                {"name": "entry without id"}
            ],
            "next": format!("{}/me/playlists?offset=1", state.base_url),
            "total": 3
        }),
        _ => json!({
            "items": [
                {"id": "broken", "name": "Broken", "images": [], "tracks": {"total": 2}}
            ],
            "next": null,
            "total": 3
        }),
    };
    Json(page).into_response()
}

async fn liked_tracks(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "items": [track_item(5), {"track": null}, track_item(6)],
        "next": null,
        "total": 3
    }))
    .into_response()
}

async fn playlist_tracks(
    State(state): State<FakeState>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let page = match (id.as_str(), offset(&query)) {
        ("multi", 0) => json!({
            "items": [track_item(1), {"track": null}, track_item(2)],
            "next": format!("{}/playlists/multi/tracks?offset=1", state.base_url),
            "total": 5
        }),
        ("multi", _) => json!({
            "items": [{"track": {"id": null, "name": "local file"}}, 42, track_item(3)],
            "next": null,
            "total": 5
        }),
        ("broken", 0) => json!({
            "items": [track_item(4)],
            "next": format!("{}/playlists/broken/tracks?offset=1", state.base_url),
            "total": 2
        }),
        ("broken", _) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        ("loop", 0) => json!({
            "items": [track_item(7)],
            "next": format!("{}/playlists/loop/tracks?offset=1", state.base_url),
            "total": 2
        }),
        ("loop", _) => json!({
            "items": [track_item(8)],
            "next": format!("{}/playlists/loop/tracks?offset=0", state.base_url),
            "total": 2
        }),
        ("ghost", _) => return StatusCode::NOT_FOUND.into_response(),
        _ => json!({"items": [], "next": null, "total": 0}),
    };
    Json(page).into_response()
}

async fn track(
    State(state): State<FakeState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    state.track_hits.fetch_add(1, Ordering::SeqCst);
    state.track_arrivals.lock().unwrap().push(Instant::now());

    let Some(n) = id.parse::<u32>().ok().filter(|_| id.len() == 22) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match n {
        99 => return StatusCode::NOT_FOUND.into_response(),
        97 if state.rate_limited_hits.fetch_add(1, Ordering::SeqCst) == 0 => {
            return (StatusCode::TOO_MANY_REQUESTS, [("retry-after", "0")]).into_response();
        }
        _ => {}
    }

    let artists = match n {
        96 => json!([]),
        98 => json!([{"id": "broken-artist"}]),
        _ => json!([{"id": format!("artist{}", n)}]),
    };

    Json(json!({
        "id": id,
        "name": format!("Track {}", n),
        "popularity": popularity(n),
        "duration_ms": 180_000 + n * 1_000,
        "explicit": n % 2 == 0,
        "album": {"release_date": format!("{}-05-01", 2000 + n)},
        "artists": artists
    }))
    .into_response()
}

async fn artist(Path(id): Path<String>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if id == "broken-artist" {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({"id": id, "genres": ["lo-fi beats", "chillhop"]})).into_response()
}

async fn token(Form(form): Form<HashMap<String, String>>) -> Response {
    let valid = form.get("grant_type").map(String::as_str) == Some("authorization_code")
        && form.get("code").map(String::as_str) == Some(GOOD_CODE)
        && form.get("code_verifier").is_some_and(|v| !v.is_empty());

    if !valid {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_grant"})),
        )
            .into_response();
    }

    Json(json!({
        "access_token": GOOD_TOKEN,
        "token_type": "Bearer",
        "scope": "playlist-read-private user-library-read",
        "expires_in": 3600,
        "refresh_token": "refresh-me"
    }))
    .into_response()
}
