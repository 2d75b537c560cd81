use std::sync::Arc;

use tabled::Table;

use crate::{
    analysis::{self, AnalysisResponse, EnrichOptions},
    config::Config,
    error, info,
    spotify::{SpotifyClient, playlists::LIKED_SONGS_ID},
    success,
    types::StatTableRow,
};

pub async fn analyze(
    config: Arc<Config>,
    token: Option<String>,
    playlist_ids: Vec<String>,
    liked: bool,
) {
    let credential = super::resolve_credential(token);
    let options = EnrichOptions::from(config.as_ref());
    let client = match SpotifyClient::new(config) {
        Ok(client) => client,
        Err(e) => error!("Cannot create Spotify client: {}", e),
    };

    let mut selection = playlist_ids;
    if liked && !selection.iter().any(|id| id == LIKED_SONGS_ID) {
        selection.push(LIKED_SONGS_ID.to_string());
    }
    if selection.is_empty() {
        error!("Select at least one playlist with --playlist or --liked.");
    }

    info!(
        "Analysing up to {} tracks from {} playlists",
        options.limit,
        selection.len()
    );

    let pb = super::spinner("Collecting and enriching tracks...");
    let result =
        analysis::analyze_playlists(&client, Some(&credential), &selection, &options).await;
    pb.finish_and_clear();

    let analysis = match result {
        Ok(analysis) => analysis,
        Err(e) => error!("{}", e.message()),
    };

    let response = AnalysisResponse::from(&analysis);
    let stats = &response.analysis;
    let mut rows = vec![
        StatTableRow {
            metric: "Average popularity".into(),
            value: format!("{}/100", stats.avg_popularity),
        },
        StatTableRow {
            metric: "Average duration".into(),
            value: format!("{} minutes", stats.avg_duration_minutes),
        },
        StatTableRow {
            metric: "Explicit content".into(),
            value: format!("{}%", stats.explicit_ratio),
        },
        StatTableRow {
            metric: "Average release year".into(),
            value: stats.avg_release_year.to_string(),
        },
        StatTableRow {
            metric: "Tracks analysed".into(),
            value: stats.tracks_analyzed.to_string(),
        },
    ];
    rows.extend(stats.top_genres.iter().map(|(genre, count)| StatTableRow {
        metric: format!("Genre: {}", genre),
        value: format!("{} songs", count),
    }));

    success!("Your vibe: {}", response.vibe);
    println!("{}", Table::new(rows));
}
