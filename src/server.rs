use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Router,
    routing::{get, post},
};

use crate::{
    Res, analysis::EnrichOptions, api, config::Config, info, management::SessionStore,
    spotify::SpotifyClient,
};

/// Shared, cheaply cloneable state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: SpotifyClient,
    pub sessions: SessionStore,
    pub enrich_options: EnrichOptions,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Res<Self> {
        let catalog = SpotifyClient::new(Arc::clone(&config))?;
        Ok(Self {
            enrich_options: EnrichOptions::from(config.as_ref()),
            config,
            catalog,
            sessions: SessionStore::new(),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/", get(api::login))
        .route("/login", get(api::login))
        .route("/logout", get(api::logout))
        .route("/callback", get(api::callback))
        .route("/playlists", get(api::playlists))
        .route("/analyze", post(api::analyze))
        .route("/analyze/playlists", post(api::analyze_playlists))
        .layer(Extension(state))
}

pub async fn start_api_server(state: AppState) -> Res<()> {
    let addr = SocketAddr::from_str(&state.config.server_address)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
