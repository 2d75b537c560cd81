use axum::{
    Extension, Json,
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    analysis::{self, AnalysisResponse},
    api::session_credential,
    error::AnalysisError,
    server::AppState,
    types::Credential,
    success,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Raw values; anything that is not a well-formed track ID is dropped.
    #[serde(default)]
    pub track_ids: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzePlaylistsRequest {
    #[serde(default)]
    pub playlist_ids: Vec<String>,
}

pub async fn analyze(
    Extension(state): Extension<AppState>,
    jar: CookieJar,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let credential = session_credential(&state, &jar).await;
    let request = match accept_body(credential.as_ref(), body) {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };

    match analysis::analyze(
        &state.catalog,
        credential.as_ref(),
        &request.track_ids,
        &state.enrich_options,
    )
    .await
    {
        Ok(result) => {
            success!(
                "Analysed {} tracks: {}",
                result.summary.tracks_analyzed,
                result.vibe
            );
            Json(AnalysisResponse::from(&result)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn analyze_playlists(
    Extension(state): Extension<AppState>,
    jar: CookieJar,
    body: Result<Json<AnalyzePlaylistsRequest>, JsonRejection>,
) -> Response {
    let credential = session_credential(&state, &jar).await;
    let request = match accept_body(credential.as_ref(), body) {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };

    match analysis::analyze_playlists(
        &state.catalog,
        credential.as_ref(),
        &request.playlist_ids,
        &state.enrich_options,
    )
    .await
    {
        Ok(result) => {
            success!(
                "Analysed {} tracks from {} playlists: {}",
                result.summary.tracks_analyzed,
                request.playlist_ids.len(),
                result.vibe
            );
            Json(AnalysisResponse::from(&result)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Unwraps a JSON body, reporting an unusable one as a validation error.
///
/// A missing session is reported first so that logged-out callers always see
/// the same answer.
fn accept_body<T>(
    credential: Option<&Credential>,
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, AnalysisError> {
    credential.ok_or(AnalysisError::MissingCredential)?;
    body.map(|Json(request)| request)
        .map_err(|rejection| AnalysisError::MalformedRequest(rejection.body_text()))
}
