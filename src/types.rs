use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<TrackPage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPage {
    pub items: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksResponse {
    pub total: usize,
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// `null` for tracks that were removed from the catalog.
    pub track: Option<Track>,
}

/// One page of a playlist's contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistPage {
    /// Declared size of the whole playlist.
    pub total: usize,
    pub entries: Vec<PlaylistEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub id: String,
    pub name: String,
}

impl From<PlaylistTracksResponse> for PlaylistPage {
    fn from(res: PlaylistTracksResponse) -> Self {
        let entries = res
            .items
            .into_iter()
            .filter_map(|item| item.track)
            .filter_map(|track| {
                track.id.map(|id| PlaylistEntry {
                    id,
                    name: track.name,
                })
            })
            .collect();

        PlaylistPage {
            total: res.total,
            entries,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingData {
    pub children: Vec<ListingChild>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingChild {
    pub data: Post,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
}
