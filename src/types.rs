use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

/// Token as returned by the Spotify token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub obtained_at: u64,
}

/// Opaque bearer token proving an authenticated Spotify session.
///
/// Supplied once per request and never mutated. Validity is ultimately decided
/// by Spotify; the optional expiry only lets us short-circuit tokens we already
/// know to be stale.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    access_token: String,
    expires_at: Option<i64>,
}

impl Credential {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
        }
    }

    pub fn from_token(token: &Token) -> Self {
        let expires_at = (token.expires_in > 0).then(|| {
            let obtained_at = i64::try_from(token.obtained_at).unwrap_or(i64::MAX);
            let expires_in = i64::try_from(token.expires_in).unwrap_or(i64::MAX);
            obtained_at.saturating_add(expires_in)
        });
        Self {
            access_token: token.access_token.clone(),
            expires_at,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.access_token
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|at| Utc::now().timestamp() >= at)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// One page of a paginated Spotify collection.
///
/// Items are kept as raw JSON so that a single malformed entry can be skipped
/// without discarding the whole page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub items: Vec<Value>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracksRef {
    #[serde(default)]
    pub total: u64,
}

/// Playlist item of `GET /me/playlists`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedPlaylist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Option<Vec<Image>>,
    #[serde(default)]
    pub tracks: Option<TracksRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRef {
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    #[serde(default)]
    pub id: Option<String>,
}

/// Response of `GET /tracks/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackDetail {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub album: Option<AlbumRef>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

impl TrackDetail {
    pub fn primary_artist_id(&self) -> Option<&str> {
        self.artists.first().and_then(|a| a.id.as_deref())
    }

    pub fn release_date(&self) -> Option<&str> {
        self.album.as_ref().and_then(|a| a.release_date.as_deref())
    }
}

/// Response of `GET /artists/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistDetail {
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub track_count: u64,
    pub track_ids: Vec<String>,
}

/// A track joined with the genres of its primary artist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTrack {
    pub popularity: u32,
    pub duration_ms: u64,
    pub explicit: bool,
    pub release_year: Option<i32>,
    pub genres: Vec<String>,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub tracks: u64,
    pub id: String,
}

#[derive(Tabled)]
pub struct StatTableRow {
    pub metric: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_in: u64, obtained_at: u64) -> Token {
        Token {
            access_token: "token".to_string(),
            refresh_token: None,
            scope: String::new(),
            expires_in,
            obtained_at,
        }
    }

    #[test]
    fn huge_lifetime_saturates() {
        let now = Utc::now().timestamp() as u64;
        assert!(!Credential::from_token(&token(u64::MAX, now)).is_expired());
        assert!(!Credential::from_token(&token(i64::MAX as u64, now)).is_expired());
    }

    #[test]
    fn past_expiry_is_expired() {
        assert!(Credential::from_token(&token(60, 1_000)).is_expired());
    }

    #[test]
    fn unknown_lifetime_never_expires() {
        assert!(!Credential::from_token(&token(0, 1_000)).is_expired());
        assert!(!Credential::bearer("token").is_expired());
    }

    #[test]
    fn debug_hides_the_token() {
        let rendered = format!("{:?}", Credential::bearer("secret-value"));
        assert!(!rendered.contains("secret-value"));
    }
}
