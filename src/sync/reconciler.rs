use std::collections::{HashMap, HashSet};

use crate::{
    debug,
    error::SyncError,
    spotify::{Authenticator, Catalog},
    sync::Session,
    types::PlaylistPage,
    utils::rounded_ceil,
};

/// Entries requested per playlist page.
pub const PAGE_SIZE: usize = 100;

/// Most track ids the provider accepts in one add request.
pub const BATCH_SIZE: usize = 100;

/// Snapshot of a playlist's tracks, keyed by track id.
#[derive(Debug, Default, Clone)]
pub struct PlaylistIndex {
    tracks: HashMap<String, String>,
}

impl PlaylistIndex {
    pub fn merge(&mut self, page: PlaylistPage) {
        for entry in page.entries {
            self.tracks.insert(entry.id, entry.name);
        }
    }

    pub fn contains(&self, track_id: &str) -> bool {
        self.tracks.contains_key(track_id)
    }

    /// Display name of an indexed track.
    pub fn name(&self, track_id: &str) -> Option<&str> {
        self.tracks.get(track_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl FromIterator<(String, String)> for PlaylistIndex {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            tracks: iter.into_iter().collect(),
        }
    }
}

/// Pages needed to read a playlist of `total` tracks, the first one included.
pub fn page_count(total: usize, page_size: usize) -> usize {
    rounded_ceil(total, page_size)
}

/// Splits `items` into consecutive batches of at most `cap` entries.
pub fn partition<T>(items: &[T], cap: usize) -> Vec<&[T]> {
    (0..rounded_ceil(items.len(), cap))
        .map(|i| {
            let start = i * cap;
            let end = (start + cap).min(items.len());
            &items[start..end]
        })
        .collect()
}

/// Candidates not yet in the playlist, in candidate order, each at most once.
pub fn missing_tracks(candidates: &[String], index: &PlaylistIndex) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut missing = Vec::new();

    for id in candidates {
        if !seen.insert(id.as_str()) {
            continue;
        }

        match index.name(id) {
            Some(name) => debug!("track \"{}\" already in the playlist", name),
            None => missing.push(id.clone()),
        }
    }

    missing
}

async fn fetch_page<C: Catalog>(
    client: &C,
    playlist_id: &str,
    offset: usize,
) -> Result<PlaylistPage, SyncError> {
    client
        .playlist_page(playlist_id, offset, PAGE_SIZE)
        .await
        .map_err(|source| SyncError::Fetch { offset, source })
}

/// Reads the whole playlist, page after page, into an index.
///
/// # Errors
///
/// [`SyncError::Fetch`] for the first page that could not be read; no
/// partial index is returned.
pub async fn build_index<C: Catalog>(
    client: &C,
    playlist_id: &str,
) -> Result<PlaylistIndex, SyncError> {
    let first = fetch_page(client, playlist_id, 0).await?;
    let pages = page_count(first.total, PAGE_SIZE);
    debug!(
        "playlist {} declares {} tracks in {} pages",
        playlist_id, first.total, pages
    );

    let mut index = PlaylistIndex::default();
    index.merge(first);

    for page in 1..pages {
        let next = fetch_page(client, playlist_id, page * PAGE_SIZE).await?;
        index.merge(next);
    }

    Ok(index)
}

/// Adds the candidates that are not in the playlist yet.
///
/// Returns how many tracks were queued for addition. Batches are submitted
/// in order; when one fails the remaining ones are not sent and the batches
/// already accepted stay in the playlist.
///
/// # Errors
///
/// - [`SyncError::NotReady`] if the session is not authenticated
/// - [`SyncError::Fetch`] if the playlist could not be read completely
/// - [`SyncError::Add`] for the first rejected batch
pub async fn reconcile<A: Authenticator>(
    session: &Session<A>,
    playlist_id: &str,
    candidates: &[String],
) -> Result<usize, SyncError> {
    let client = session.client()?;

    if candidates.is_empty() {
        fetch_page(client, playlist_id, 0).await?;
        return Ok(0);
    }

    let index = build_index(client, playlist_id).await?;
    let missing = missing_tracks(candidates, &index);

    for (batch, ids) in partition(&missing, BATCH_SIZE).into_iter().enumerate() {
        debug!("adding batch {} with {} tracks", batch, ids.len());
        client
            .add_tracks(playlist_id, ids)
            .await
            .map_err(|source| SyncError::Add { batch, source })?;
    }

    Ok(missing.len())
}
