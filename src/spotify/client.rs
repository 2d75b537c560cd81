use std::{sync::Arc, time::Duration};

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    config::Config,
    error::CatalogError,
    spotify::Catalog,
    types::{ArtistDetail, Credential, Page, TrackDetail},
    warning,
};

/// Longest `Retry-After` we are willing to wait out inside a request.
const MAX_RETRY_AFTER_SECS: u64 = 5;

/// HTTP client for the Spotify Web API.
///
/// Cheap to clone: the underlying connection pool and the configuration are
/// shared.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    config: Arc<Config>,
}

impl SpotifyClient {
    /// Creates a client whose every request is bounded by the configured
    /// timeout.
    pub fn new(config: Arc<Config>) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Issues an authenticated GET and decodes the JSON body.
    ///
    /// # Retry Logic
    ///
    /// A 429 carrying a `Retry-After` of at most five seconds is waited out and
    /// retried once. A second 429, or one asking for a longer pause, is
    /// returned as [`CatalogError::Status`].
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        credential: &Credential,
    ) -> Result<T, CatalogError> {
        let mut retried = false;

        loop {
            let response = self
                .http
                .get(url)
                .bearer_auth(credential.as_str())
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS && !retried {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok());

                if let Some(secs) = retry_after.filter(|s| *s <= MAX_RETRY_AFTER_SECS) {
                    sleep(Duration::from_secs(secs)).await;
                    retried = true;
                    continue; // retry
                }

                warning!("Rate limited by Spotify on {}", url);
            }

            if status == StatusCode::UNAUTHORIZED {
                return Err(CatalogError::Unauthorized);
            }
            if !status.is_success() {
                return Err(CatalogError::Status(status));
            }

            return Ok(response.json::<T>().await?);
        }
    }
}

impl Catalog for SpotifyClient {
    fn api_url(&self) -> &str {
        &self.config.api_url
    }

    fn page_size(&self) -> u32 {
        self.config.page_size
    }

    async fn current_user(&self, credential: &Credential) -> Result<(), CatalogError> {
        let url = format!("{uri}/me", uri = self.api_url());
        self.get_json::<serde_json::Value>(&url, credential)
            .await
            .map(|_| ())
    }

    async fn page(&self, url: &str, credential: &Credential) -> Result<Page, CatalogError> {
        self.get_json::<Page>(url, credential).await
    }

    async fn track(&self, id: &str, credential: &Credential) -> Result<TrackDetail, CatalogError> {
        let url = format!("{uri}/tracks/{id}", uri = self.api_url(), id = id);
        self.get_json::<TrackDetail>(&url, credential).await
    }

    async fn artist(
        &self,
        id: &str,
        credential: &Credential,
    ) -> Result<ArtistDetail, CatalogError> {
        let url = format!("{uri}/artists/{id}", uri = self.api_url(), id = id);
        self.get_json::<ArtistDetail>(&url, credential).await
    }
}
