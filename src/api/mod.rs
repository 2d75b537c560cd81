//! # API Module
//!
//! HTTP handlers of the local web backend. They own the browser-facing glue:
//! the OAuth redirect dance, the session cookie and JSON (de)serialisation.
//! All analysis work is delegated to [`crate::analysis`] with the session's
//! credential passed explicitly.
//!
//! ## Endpoints
//!
//! - [`health`] - `GET /health`, status and version
//! - [`login`] - `GET /login`, redirects to the Spotify consent page
//! - [`callback`] - `GET /callback`, exchanges the authorization code
//! - [`logout`] - `GET /logout`, forgets the session
//! - [`playlists`] - `GET /playlists`, the user's playlists with track IDs
//! - [`analyze`] - `POST /analyze`, analyses a list of track IDs
//! - [`analyze_playlists`] - `POST /analyze/playlists`, analyses whole playlists
//!
//! Errors of the analysis endpoints are returned as `{"kind", "message"}`
//! bodies with a status derived from the error kind.

mod analyze;
mod callback;
mod health;
mod login;
mod playlists;

pub use analyze::{AnalyzePlaylistsRequest, AnalyzeRequest, analyze, analyze_playlists};
pub use callback::callback;
pub use health::health;
pub use login::{login, logout};
pub use playlists::playlists;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{management::SESSION_COOKIE, server::AppState, types::Credential};

/// Reads the session ID from the request cookies.
fn session_id(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(Cookie::value)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn session_cookie(id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

async fn session_credential(state: &AppState, jar: &CookieJar) -> Option<Credential> {
    let id = session_id(jar)?;
    state.sessions.credential(&id).await
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header::COOKIE};

    use super::*;

    fn jar(cookie: &'static str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static(cookie));
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn reads_session_among_other_cookies() {
        let jar = jar("theme=dark; vibecheck_session=abc123; other=1");
        assert_eq!(session_id(&jar).as_deref(), Some("abc123"));
    }

    #[test]
    fn ignores_missing_or_empty_session() {
        assert_eq!(session_id(&jar("theme=dark")), None);
        assert_eq!(session_id(&jar("vibecheck_session_old=x")), None);
        assert_eq!(session_id(&jar("vibecheck_session=")), None);
    }

    #[test]
    fn value_may_contain_equals_sign() {
        let jar = jar("vibecheck_session=abc=def");
        assert_eq!(session_id(&jar).as_deref(), Some("abc=def"));
    }

    #[test]
    fn session_cookie_round_trips_through_jar() {
        let jar = CookieJar::new().add(session_cookie("s3ss10n".to_string()));
        assert_eq!(session_id(&jar).as_deref(), Some("s3ss10n"));

        let cookie = jar.get(SESSION_COOKIE).expect("cookie");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }
}
