//! Configuration management for the playlist vibe analyser.
//!
//! Configuration is read once at startup from environment variables (optionally
//! seeded from `.env` files) into an immutable [`Config`] which is then passed
//! explicitly to every component that needs it.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the working directory
//! 4. Application defaults (where applicable)

use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use crate::Res;

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SCOPE: &str =
    "playlist-read-private playlist-read-collaborative user-library-read user-read-private";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";

/// Maximum number of tracks enriched per analysis.
pub const DEFAULT_ENRICH_LIMIT: usize = 30;
/// Minimum spacing between two track lookups.
pub const DEFAULT_ENRICH_DELAY_MS: u64 = 100;
pub const DEFAULT_ENRICH_WORKERS: usize = 1;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Loads environment variables from `.env` files.
///
/// Creates the `vibecheck` folder in the platform-specific local data directory
/// if it doesn't exist and loads `vibecheck/.env` from there, followed by a
/// `.env` in the current working directory. Missing files are not an error;
/// values already present in the environment are never overwritten.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/vibecheck/.env`
/// - macOS: `~/Library/Application Support/vibecheck/.env`
/// - Windows: `%LOCALAPPDATA%/vibecheck/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub async fn load_env() -> Res<()> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("vibecheck/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    dotenv::from_path(&path).ok();
    dotenv::dotenv().ok();
    Ok(())
}

/// Process-wide configuration, loaded once and treated as immutable.
#[derive(Debug, Clone)]
pub struct Config {
    /// `SPOTIFY_API_AUTH_CLIENT_ID`
    pub client_id: String,
    /// `SPOTIFY_API_AUTH_CLIENT_SECRET`, sent on token exchange when present.
    pub client_secret: Option<String>,
    /// `SPOTIFY_API_REDIRECT_URI`
    pub redirect_uri: String,
    /// `SPOTIFY_API_AUTH_SCOPE`
    pub scope: String,
    /// `SPOTIFY_API_AUTH_URL`
    pub auth_url: String,
    /// `SPOTIFY_API_TOKEN_URL`
    pub token_url: String,
    /// `SPOTIFY_API_URL`
    pub api_url: String,
    /// `SERVER_ADDRESS`
    pub server_address: String,
    /// `VIBECHECK_ENRICH_LIMIT`
    pub enrich_limit: usize,
    /// `VIBECHECK_ENRICH_DELAY_MS`
    pub enrich_delay_ms: u64,
    /// `VIBECHECK_ENRICH_WORKERS`
    pub enrich_workers: usize,
    /// `VIBECHECK_REQUEST_TIMEOUT_SECS`
    pub request_timeout_secs: u64,
    /// `VIBECHECK_PAGE_SIZE`
    pub page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: None,
            redirect_uri: format!("http://{}/callback", DEFAULT_SERVER_ADDRESS),
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            enrich_limit: DEFAULT_ENRICH_LIMIT,
            enrich_delay_ms: DEFAULT_ENRICH_DELAY_MS,
            enrich_workers: DEFAULT_ENRICH_WORKERS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails if a numeric setting cannot be parsed. OAuth settings are checked
    /// separately by [`Config::ensure_oauth`].
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            client_id: lookup("SPOTIFY_API_AUTH_CLIENT_ID").unwrap_or(defaults.client_id),
            client_secret: lookup("SPOTIFY_API_AUTH_CLIENT_SECRET").filter(|v| !v.is_empty()),
            redirect_uri: lookup("SPOTIFY_API_REDIRECT_URI").unwrap_or(defaults.redirect_uri),
            scope: lookup("SPOTIFY_API_AUTH_SCOPE").unwrap_or(defaults.scope),
            auth_url: lookup("SPOTIFY_API_AUTH_URL").unwrap_or(defaults.auth_url),
            token_url: lookup("SPOTIFY_API_TOKEN_URL").unwrap_or(defaults.token_url),
            api_url: lookup("SPOTIFY_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            server_address: lookup("SERVER_ADDRESS").unwrap_or(defaults.server_address),
            enrich_limit: parse_or(&lookup, "VIBECHECK_ENRICH_LIMIT", defaults.enrich_limit)?,
            enrich_delay_ms: parse_or(
                &lookup,
                "VIBECHECK_ENRICH_DELAY_MS",
                defaults.enrich_delay_ms,
            )?,
            enrich_workers: parse_or(&lookup, "VIBECHECK_ENRICH_WORKERS", defaults.enrich_workers)?
                .max(1),
            request_timeout_secs: parse_or(
                &lookup,
                "VIBECHECK_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            page_size: parse_or(&lookup, "VIBECHECK_PAGE_SIZE", defaults.page_size)?.clamp(1, 50),
        })
    }

    /// Checks that the settings needed for the browser login are present.
    pub fn ensure_oauth(&self) -> Res<()> {
        if self.client_id.trim().is_empty() {
            return Err("SPOTIFY_API_AUTH_CLIENT_ID must be set".into());
        }
        if self.redirect_uri.trim().is_empty() {
            return Err("SPOTIFY_API_REDIRECT_URI must be set".into());
        }
        Ok(())
    }

    pub fn enrich_delay(&self) -> Duration {
        Duration::from_millis(self.enrich_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Res<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| format!("{} has an invalid value '{}': {}", key, raw, e).into()),
        _ => Ok(default),
    }
}
