//! # Analysis Pipeline
//!
//! Turns a list of raw track IDs into statistics and a vibe label:
//!
//! ```text
//! raw IDs ──validate──▶ track IDs ──enrich──▶ EnrichedTrack[] ──summarize──▶ AnalysisSummary
//!                                                                   │
//!                                                                   └──classify──▶ VibeLabel
//! ```
//!
//! - [`enrich`] bounds and resolves track IDs against the catalog, tolerating
//!   per-item failures.
//! - [`summary`] reduces enriched tracks into averages and a genre histogram.
//! - [`vibe`] maps the statistics onto a fixed label set with an ordered rule
//!   list.
//!
//! The credential is an explicit argument; nothing in here stores it.

pub mod enrich;
pub mod summary;
pub mod vibe;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use enrich::{EnrichOptions, TrackLimiter, enrich, track_limiter};
pub use summary::{AnalysisSummary, summarize};
pub use vibe::{VibeLabel, classify, classify_summary};

use crate::{
    error::{AnalysisError, CatalogError},
    spotify::{Catalog, playlists},
    types::Credential,
    utils,
};

/// Outcome of a successful analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub summary: AnalysisSummary,
    pub vibe: VibeLabel,
}

/// Analyses a list of raw track IDs on behalf of `credential`.
///
/// Checks run cheapest first: a missing credential, an empty list and a list
/// without any well-formed ID are rejected before Spotify is contacted. The
/// credential is then validated against `GET /me` before enrichment.
///
/// # Errors
///
/// - [`AnalysisError::MissingCredential`] / [`AnalysisError::InvalidCredential`]
/// - [`AnalysisError::EmptyInput`] / [`AnalysisError::NoValidTrackIds`]
/// - [`AnalysisError::NoEnrichableTracks`] when every lookup failed
/// - [`AnalysisError::UpstreamUnavailable`] when the credential check could
///   not reach Spotify
pub async fn analyze<C>(
    catalog: &C,
    credential: Option<&Credential>,
    raw_ids: &[Value],
    options: &EnrichOptions,
) -> Result<Analysis, AnalysisError>
where
    C: Catalog + Clone + Send + Sync + 'static,
{
    let credential = credential.ok_or(AnalysisError::MissingCredential)?;
    if raw_ids.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let track_ids = utils::filter_track_ids(raw_ids);
    if track_ids.is_empty() {
        return Err(AnalysisError::NoValidTrackIds);
    }

    check_credential(catalog, credential).await?;
    run(catalog, credential, &track_ids, options).await
}

/// Collects the tracks of the selected playlists and analyses them.
///
/// See [`playlists::collect_track_ids`] for how the selection is resolved.
pub async fn analyze_playlists<C>(
    catalog: &C,
    credential: Option<&Credential>,
    playlist_ids: &[String],
    options: &EnrichOptions,
) -> Result<Analysis, AnalysisError>
where
    C: Catalog + Clone + Send + Sync + 'static,
{
    let credential = credential.ok_or(AnalysisError::MissingCredential)?;
    if playlist_ids.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    check_credential(catalog, credential).await?;

    let collected = playlists::collect_track_ids(catalog, playlist_ids, credential).await;
    if collected.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let track_ids: Vec<String> = collected
        .into_iter()
        .filter(|id| utils::is_valid_track_id(id))
        .collect();
    if track_ids.is_empty() {
        return Err(AnalysisError::NoValidTrackIds);
    }

    run(catalog, credential, &track_ids, options).await
}

/// Enrich, summarize, classify. Inputs are already validated.
async fn run<C>(
    catalog: &C,
    credential: &Credential,
    track_ids: &[String],
    options: &EnrichOptions,
) -> Result<Analysis, AnalysisError>
where
    C: Catalog + Clone + Send + Sync + 'static,
{
    let tracks = enrich(catalog, credential, track_ids, options).await;
    if tracks.is_empty() {
        return Err(AnalysisError::NoEnrichableTracks);
    }

    let summary = summarize(&tracks)?;
    let vibe = classify_summary(&summary);
    Ok(Analysis { summary, vibe })
}

/// Maps the outcome of `GET /me` onto the analysis error taxonomy.
pub async fn check_credential<C: Catalog>(
    catalog: &C,
    credential: &Credential,
) -> Result<(), AnalysisError> {
    if credential.is_expired() {
        return Err(AnalysisError::InvalidCredential);
    }

    match catalog.current_user(credential).await {
        Ok(()) => Ok(()),
        Err(CatalogError::Unauthorized) => Err(AnalysisError::InvalidCredential),
        Err(e) => Err(AnalysisError::UpstreamUnavailable(e.to_string())),
    }
}

/// Wire shape of an analysis, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub vibe: VibeLabel,
    pub analysis: AnalysisStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub avg_popularity: f64,
    pub avg_duration_minutes: f64,
    /// Percentage, `0.0..=100.0`.
    pub explicit_ratio: f64,
    pub avg_release_year: i64,
    pub tracks_analyzed: usize,
    pub top_genres: Vec<(String, usize)>,
}

impl From<&Analysis> for AnalysisResponse {
    fn from(analysis: &Analysis) -> Self {
        let summary = &analysis.summary;
        Self {
            vibe: analysis.vibe,
            analysis: AnalysisStats {
                avg_popularity: utils::round_to_tenth(summary.avg_popularity),
                avg_duration_minutes: utils::round_to_tenth(summary.avg_duration_minutes),
                explicit_ratio: utils::round_to_tenth(summary.explicit_ratio * 100.0),
                avg_release_year: summary.avg_release_year.round() as i64,
                tracks_analyzed: summary.tracks_analyzed,
                top_genres: summary.top_genres.clone(),
            },
        }
    }
}
