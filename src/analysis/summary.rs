use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{error::AnalysisError, types::EnrichedTrack};

/// Used as average release year when no track has a parseable release date.
pub const FALLBACK_RELEASE_YEAR: f64 = 2020.0;
pub const TOP_GENRE_COUNT: usize = 5;

/// Aggregate statistics over a set of enriched tracks, kept at full precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub avg_popularity: f64,
    pub avg_duration_minutes: f64,
    /// Fraction of explicit tracks, `0.0..=1.0`.
    pub explicit_ratio: f64,
    pub avg_release_year: f64,
    /// At most five `(genre, count)` pairs, most frequent first.
    pub top_genres: Vec<(String, usize)>,
    pub tracks_analyzed: usize,
}

/// Reduces enriched tracks into an [`AnalysisSummary`].
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyInputError`] for an empty slice.
pub fn summarize(tracks: &[EnrichedTrack]) -> Result<AnalysisSummary, AnalysisError> {
    if tracks.is_empty() {
        return Err(AnalysisError::EmptyInputError);
    }

    let count = tracks.len() as f64;
    let avg_popularity = tracks.iter().map(|t| t.popularity as f64).sum::<f64>() / count;
    let avg_duration_minutes =
        tracks.iter().map(|t| t.duration_ms as f64).sum::<f64>() / count / 60_000.0;
    let explicit_ratio = tracks.iter().filter(|t| t.explicit).count() as f64 / count;

    let years: Vec<i32> = tracks.iter().filter_map(|t| t.release_year).collect();
    let avg_release_year = if years.is_empty() {
        FALLBACK_RELEASE_YEAR
    } else {
        years.iter().map(|y| *y as f64).sum::<f64>() / years.len() as f64
    };

    Ok(AnalysisSummary {
        avg_popularity,
        avg_duration_minutes,
        explicit_ratio,
        avg_release_year,
        top_genres: top_genres(tracks, TOP_GENRE_COUNT),
        tracks_analyzed: tracks.len(),
    })
}

/// Counts genres over all tracks and returns the `n` most frequent.
///
/// Ties keep the order in which the genres were first seen.
pub fn top_genres(tracks: &[EnrichedTrack], n: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for track in tracks {
        for (i, genre) in track.genres.iter().enumerate() {
            // a track contributes each of its genres once
            if track.genres[..i].contains(genre) {
                continue;
            }
            match positions.get(genre.as_str()) {
                Some(&pos) => counts[pos].1 += 1,
                None => {
                    positions.insert(genre, counts.len());
                    counts.push((genre.clone(), 1));
                }
            }
        }
    }

    // stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}
