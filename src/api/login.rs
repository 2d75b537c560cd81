use axum::{
    Extension,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::{
    api::{session_cookie, session_id},
    management::SESSION_COOKIE,
    server::AppState,
    spotify, utils, warning,
};

pub async fn login(Extension(state): Extension<AppState>, jar: CookieJar) -> Response {
    let verifier = utils::generate_code_verifier();
    let challenge = utils::generate_code_challenge(&verifier);
    let oauth_state = utils::generate_state();

    let auth_url = match spotify::auth::authorize_url(&state.config, &oauth_state, &challenge) {
        Ok(url) => url,
        Err(e) => {
            warning!("Cannot build authorization url: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h4>Login is misconfigured.</h4>"),
            )
                .into_response();
        }
    };

    let session_id = state.sessions.begin_login(verifier, oauth_state).await;
    (jar.add(session_cookie(session_id)), Redirect::to(&auth_url)).into_response()
}

pub async fn logout(Extension(state): Extension<AppState>, jar: CookieJar) -> Response {
    if let Some(id) = session_id(&jar) {
        state.sessions.logout(&id).await;
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to("/login")).into_response()
}
