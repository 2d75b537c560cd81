use std::sync::Arc;

use tabled::Table;

use crate::{
    analysis,
    config::Config,
    error,
    spotify::{SpotifyClient, playlists},
    success,
    types::PlaylistTableRow,
};

pub async fn list_playlists(config: Arc<Config>, token: Option<String>) {
    let credential = super::resolve_credential(token);
    let client = match SpotifyClient::new(config) {
        Ok(client) => client,
        Err(e) => error!("Cannot create Spotify client: {}", e),
    };

    if let Err(e) = analysis::check_credential(&client, &credential).await {
        error!("{}", e.message());
    }

    let pb = super::spinner("Fetching playlists...");
    let list = playlists::list_playlists(&client, &credential, false).await;
    pb.finish_and_clear();

    let rows: Vec<PlaylistTableRow> = list
        .into_iter()
        .map(|p| PlaylistTableRow {
            name: p.name,
            tracks: p.track_count,
            id: p.id,
        })
        .collect();

    success!("Found {} playlists", rows.len());
    println!("{}", Table::new(rows));
}
