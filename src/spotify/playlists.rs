use std::collections::HashSet;

use serde_json::Value;

use crate::{
    spotify::Catalog,
    types::{Credential, PlaylistSummary, SimplifiedPlaylist},
    warning,
};

/// Pseudo playlist ID that selects the user's liked songs.
pub const LIKED_SONGS_ID: &str = "liked-songs";
pub const LIKED_SONGS_NAME: &str = "Liked Songs ❤️";
pub const LIKED_SONGS_IMAGE: &str = "https://misc.scdn.co/liked-songs/liked-songs-300.png";

/// Walks a paginated collection starting at `first_url`, handing every raw
/// item to `visit`.
///
/// Follows the `next` pointer until it is absent or points at a page already
/// seen. A failed page ends the walk; whatever was visited before it is kept.
async fn paginate<C, F>(catalog: &C, credential: &Credential, first_url: String, mut visit: F)
where
    C: Catalog,
    F: FnMut(&Value),
{
    let mut seen = HashSet::new();
    let mut next = Some(first_url);

    while let Some(url) = next.take() {
        if !seen.insert(url.clone()) {
            warning!("Stopped paging at {}: cursor loops back", url);
            break;
        }

        match catalog.page(&url, credential).await {
            Ok(page) => {
                page.items.iter().for_each(&mut visit);
                next = page.next;
            }
            Err(e) => {
                warning!("Stopped paging at {}: {}", url, e);
                break;
            }
        }
    }
}

/// Extracts `track.id` from a playlist or library item, if there is one.
fn item_track_id(item: &Value) -> Option<String> {
    item.get("track")?
        .get("id")?
        .as_str()
        .map(str::to_string)
}

async fn fetch_track_ids<C: Catalog>(
    catalog: &C,
    credential: &Credential,
    first_url: String,
) -> Vec<String> {
    let mut ids = Vec::new();
    paginate(catalog, credential, first_url, |item| {
        if let Some(id) = item_track_id(item) {
            ids.push(id);
        }
    })
    .await;
    ids
}

/// Retrieves the track IDs of a playlist in API order.
///
/// Items without a track object or without an ID (local files, removed
/// tracks) are skipped individually. A failing page ends pagination early and
/// the IDs gathered so far are returned.
pub async fn fetch_playlist_track_ids<C: Catalog>(
    catalog: &C,
    playlist_id: &str,
    credential: &Credential,
) -> Vec<String> {
    let first_url = format!(
        "{uri}/playlists/{id}/tracks?limit={limit}",
        uri = catalog.api_url(),
        id = playlist_id,
        limit = catalog.page_size()
    );
    fetch_track_ids(catalog, credential, first_url).await
}

/// Retrieves the track IDs of the user's liked songs, same rules as
/// [`fetch_playlist_track_ids`].
pub async fn fetch_liked_track_ids<C: Catalog>(catalog: &C, credential: &Credential) -> Vec<String> {
    let first_url = format!(
        "{uri}/me/tracks?limit={limit}",
        uri = catalog.api_url(),
        limit = catalog.page_size()
    );
    fetch_track_ids(catalog, credential, first_url).await
}

/// Resolves a selection of playlist IDs into one flat list of track IDs.
///
/// [`LIKED_SONGS_ID`] selects the liked songs. Selection order is kept and
/// tracks appearing in several playlists are kept as many times.
pub async fn collect_track_ids<C: Catalog>(
    catalog: &C,
    playlist_ids: &[String],
    credential: &Credential,
) -> Vec<String> {
    let mut all_tracks = Vec::new();

    for playlist_id in playlist_ids {
        let ids = if playlist_id == LIKED_SONGS_ID {
            fetch_liked_track_ids(catalog, credential).await
        } else {
            fetch_playlist_track_ids(catalog, playlist_id, credential).await
        };
        all_tracks.extend(ids);
    }

    all_tracks
}

/// Lists the user's playlists followed by a synthetic "Liked Songs" entry.
///
/// Malformed playlist entries are skipped and a failing page ends the listing
/// early. With `with_track_ids` set, each summary's `track_ids` is filled in;
/// otherwise it is left empty.
pub async fn list_playlists<C: Catalog>(
    catalog: &C,
    credential: &Credential,
    with_track_ids: bool,
) -> Vec<PlaylistSummary> {
    let first_url = format!(
        "{uri}/me/playlists?limit={limit}",
        uri = catalog.api_url(),
        limit = catalog.page_size()
    );

    let mut playlists = Vec::new();
    paginate(catalog, credential, first_url, |item| {
        match serde_json::from_value::<SimplifiedPlaylist>(item.clone()) {
            Ok(p) => playlists.push(PlaylistSummary {
                image_url: p
                    .images
                    .as_ref()
                    .and_then(|images| images.first())
                    .map(|image| image.url.clone()),
                track_count: p.tracks.as_ref().map_or(0, |t| t.total),
                id: p.id,
                name: p.name,
                track_ids: Vec::new(),
            }),
            Err(e) => warning!("Skipping malformed playlist entry: {}", e),
        }
    })
    .await;

    playlists.push(PlaylistSummary {
        id: LIKED_SONGS_ID.to_string(),
        name: LIKED_SONGS_NAME.to_string(),
        image_url: Some(LIKED_SONGS_IMAGE.to_string()),
        track_count: liked_songs_total(catalog, credential).await,
        track_ids: Vec::new(),
    });

    if with_track_ids {
        for playlist in playlists.iter_mut() {
            playlist.track_ids = if playlist.id == LIKED_SONGS_ID {
                fetch_liked_track_ids(catalog, credential).await
            } else {
                fetch_playlist_track_ids(catalog, &playlist.id, credential).await
            };
        }
    }

    playlists
}

async fn liked_songs_total<C: Catalog>(catalog: &C, credential: &Credential) -> u64 {
    let url = format!("{uri}/me/tracks?limit=1", uri = catalog.api_url());
    match catalog.page(&url, credential).await {
        Ok(page) => page.total.unwrap_or(0),
        Err(e) => {
            warning!("Could not count liked songs: {}", e);
            0
        }
    }
}
