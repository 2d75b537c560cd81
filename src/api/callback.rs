use std::collections::HashMap;

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{api::session_id, server::AppState, success, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<AppState>,
    jar: CookieJar,
) -> Response {
    if let Some(error) = params.get("error") {
        warning!("Authorization denied: {}", error);
        return failure("<h4>Login was cancelled.</h4>");
    }

    let (Some(code), Some(oauth_state)) = (params.get("code"), params.get("state")) else {
        return failure("<h4>Missing authorization code.</h4>");
    };

    let Some(session_id) = session_id(&jar) else {
        return failure("<h4>Missing session. Please start the login again.</h4>");
    };

    let Some(verifier) = state.sessions.take_verifier(&session_id, oauth_state).await else {
        return failure("<h4>Login state mismatch. Please start the login again.</h4>");
    };

    match state.catalog.exchange_code(code, &verifier).await {
        Ok(token) => {
            if !state.sessions.complete_login(&session_id, &token).await {
                return failure("<h4>Session expired during login.</h4>");
            }
            success!("Authentication successful!");
            Redirect::to("/playlists").into_response()
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            failure("<h4>Login failed.</h4>")
        }
    }
}

fn failure(message: &'static str) -> Response {
    (StatusCode::BAD_REQUEST, Html(message)).into_response()
}
