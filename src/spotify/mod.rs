//! # Spotify Integration Module
//!
//! This module is the only place that talks to the Spotify Web API. It covers
//! the OAuth authorization-code exchange, paginated retrieval of playlists,
//! playlist tracks and liked songs, and single track/artist lookups used by
//! the enrichment step.
//!
//! ## Architecture
//!
//! ```text
//! Analysis pipeline / HTTP handlers / CLI
//!          ↓
//! Catalog trait (page, track, artist, current user)
//!          ↓
//! SpotifyClient (reqwest, JSON, bearer auth)
//!          ↓
//! Spotify Web API
//! ```
//!
//! The [`Catalog`] trait is the seam between the pipeline and the network.
//! Everything above it is generic over the trait so that tests can substitute
//! an in-memory catalog.
//!
//! ## API Coverage
//!
//! - `GET /me` - credential validation
//! - `GET /me/playlists` - the user's playlists, paginated
//! - `GET /playlists/{id}/tracks` - playlist items, paginated
//! - `GET /me/tracks` - liked songs, paginated
//! - `GET /tracks/{id}` - track detail
//! - `GET /artists/{id}` - artist detail (genres)
//! - `POST /api/token` - authorization code exchange
//!
//! ## Error Handling
//!
//! Calls return [`CatalogError`]. A 401 is reported as
//! [`CatalogError::Unauthorized`] so callers can ask for re-authentication; a
//! 429 with a short `Retry-After` is retried once, everything else is handed
//! back and the caller decides whether it is a per-page or per-item failure.

use std::future::Future;

pub mod auth;
mod client;
pub mod playlists;

pub use crate::error::CatalogError;
pub use client::SpotifyClient;

use crate::types::{ArtistDetail, Credential, Page, TrackDetail};

/// Read access to the Spotify catalog on behalf of one credential.
pub trait Catalog {
    /// Base URL that page URLs are built from.
    fn api_url(&self) -> &str;

    /// Number of items requested per page.
    fn page_size(&self) -> u32;

    /// `GET /me`; succeeds when the credential is accepted.
    fn current_user(
        &self,
        credential: &Credential,
    ) -> impl Future<Output = Result<(), CatalogError>> + Send;

    /// Fetches one page of a paginated collection by absolute URL.
    fn page(
        &self,
        url: &str,
        credential: &Credential,
    ) -> impl Future<Output = Result<Page, CatalogError>> + Send;

    fn track(
        &self,
        id: &str,
        credential: &Credential,
    ) -> impl Future<Output = Result<TrackDetail, CatalogError>> + Send;

    fn artist(
        &self,
        id: &str,
        credential: &Credential,
    ) -> impl Future<Output = Result<ArtistDetail, CatalogError>> + Send;
}
