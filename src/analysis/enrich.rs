use std::{num::NonZeroU32, sync::Arc, time::Duration};

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    config::Config,
    spotify::Catalog,
    types::{Credential, EnrichedTrack, TrackDetail},
    utils, warning,
};

/// Limiter shared by every worker of one enrichment run.
pub type TrackLimiter = DefaultDirectRateLimiter;

/// Builds a limiter that lets one track lookup through per `delay`.
///
/// Returns `None` for a zero delay, meaning lookups are not throttled.
pub fn track_limiter(delay: Duration) -> Option<Arc<TrackLimiter>> {
    let quota = Quota::with_period(delay)?.allow_burst(NonZeroU32::MIN);
    Some(Arc::new(RateLimiter::direct(quota)))
}

async fn wait_for_slot(limiter: Option<&TrackLimiter>) {
    if let Some(limiter) = limiter {
        limiter.until_ready().await;
    }
}

/// Tuning for [`enrich`].
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// Only the first `limit` IDs are looked up.
    pub limit: usize,
    /// Minimum spacing between two track lookups across all workers.
    pub delay: Duration,
    /// Number of concurrent lookups; 1 means strictly sequential.
    pub workers: usize,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for EnrichOptions {
    fn from(config: &Config) -> Self {
        Self {
            limit: config.enrich_limit,
            delay: config.enrich_delay(),
            workers: config.enrich_workers.max(1),
        }
    }
}

/// Resolves track IDs into [`EnrichedTrack`]s.
///
/// Only the first `options.limit` IDs are considered. For each ID the track is
/// fetched; if that fails the ID is dropped. Otherwise the primary artist is
/// fetched for its genres; if that fails the track is kept with no genres.
///
/// The output preserves input order restricted to the surviving tracks, also
/// when lookups run on several workers. An empty result is not an error.
pub async fn enrich<C>(
    catalog: &C,
    credential: &Credential,
    track_ids: &[String],
    options: &EnrichOptions,
) -> Vec<EnrichedTrack>
where
    C: Catalog + Clone + Send + Sync + 'static,
{
    let ids: Vec<String> = track_ids.iter().take(options.limit).cloned().collect();
    let limiter = track_limiter(options.delay);

    if options.workers <= 1 {
        let mut tracks = Vec::with_capacity(ids.len());
        for id in &ids {
            wait_for_slot(limiter.as_deref()).await;
            if let Some(track) = enrich_one(catalog, credential, id).await {
                tracks.push(track);
            }
        }
        return tracks;
    }

    let permits = Arc::new(Semaphore::new(options.workers));
    let mut set = JoinSet::new();

    for (index, id) in ids.iter().cloned().enumerate() {
        let catalog = catalog.clone();
        let credential = credential.clone();
        let limiter = limiter.clone();
        let permits = Arc::clone(&permits);

        set.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return (index, None);
            };
            wait_for_slot(limiter.as_deref()).await;
            (index, enrich_one(&catalog, &credential, &id).await)
        });
    }

    let mut slots: Vec<Option<EnrichedTrack>> = vec![None; ids.len()];
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, track)) => slots[index] = track,
            Err(e) => warning!("Enrichment worker failed: {}", e),
        }
    }

    slots.into_iter().flatten().collect()
}

async fn enrich_one<C: Catalog>(
    catalog: &C,
    credential: &Credential,
    id: &str,
) -> Option<EnrichedTrack> {
    let track = match catalog.track(id, credential).await {
        Ok(track) => track,
        Err(e) => {
            warning!("Skipping track {}: {}", id, e);
            return None;
        }
    };

    let genres = match track.primary_artist_id() {
        Some(artist_id) => match catalog.artist(artist_id, credential).await {
            Ok(artist) => artist.genres,
            Err(e) => {
                warning!("No genres for track {} (artist {}): {}", id, artist_id, e);
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    Some(to_enriched(&track, genres))
}

fn to_enriched(track: &TrackDetail, genres: Vec<String>) -> EnrichedTrack {
    EnrichedTrack {
        popularity: track.popularity.min(100),
        duration_ms: track.duration_ms,
        explicit: track.explicit,
        release_year: track.release_date().and_then(utils::parse_release_year),
        genres,
    }
}
