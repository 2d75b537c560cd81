use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::Query,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    analysis, api::session_credential, error::AnalysisError, server::AppState,
    spotify::playlists,
};

/// Lists the user's playlists plus the "Liked Songs" entry.
///
/// Track IDs are included unless `?include_tracks=false` is given.
pub async fn playlists(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<AppState>,
    jar: CookieJar,
) -> Response {
    let Some(credential) = session_credential(&state, &jar).await else {
        return AnalysisError::MissingCredential.into_response();
    };

    if let Err(e) = analysis::check_credential(&state.catalog, &credential).await {
        return e.into_response();
    }

    let with_track_ids = params
        .get("include_tracks")
        .is_none_or(|v| v != "false" && v != "0");

    let list = playlists::list_playlists(&state.catalog, &credential, with_track_ids).await;
    Json(list).into_response()
}
