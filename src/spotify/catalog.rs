use reqwest::Client;

use crate::{
    error::ApiError,
    spotify::{Catalog, ensure_success},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, CurrentUser, PlaylistPage, PlaylistTracksResponse, SearchResponse,
    },
};

const PLAYLIST_FIELDS: &str = "total,items(track(name,id))";

/// Web API client bound to one access token.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    access_token: String,
}

impl SpotifyClient {
    pub fn new(http: Client, api_url: &str, access_token: String) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }
}

impl Catalog for SpotifyClient {
    async fn current_user_id(&self) -> Result<String, ApiError> {
        let response = self
            .http
            .get(format!("{uri}/me", uri = self.api_url))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let user = ensure_success(response).await?.json::<CurrentUser>().await?;
        Ok(user.id)
    }

    async fn search_track(&self, query: &str) -> Result<Option<String>, ApiError> {
        let response = self
            .http
            .get(format!("{uri}/search", uri = self.api_url))
            .bearer_auth(&self.access_token)
            .query(&[("q", query), ("type", "track"), ("limit", "1"), ("offset", "0")])
            .send()
            .await?;

        let res = ensure_success(response)
            .await?
            .json::<SearchResponse>()
            .await?;

        Ok(res
            .tracks
            .and_then(|page| page.items.into_iter().next())
            .and_then(|track| track.id))
    }

    async fn playlist_page(
        &self,
        playlist_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<PlaylistPage, ApiError> {
        let api_url = format!(
            "{uri}/playlists/{id}/tracks?offset={offset}&limit={limit}",
            uri = self.api_url,
            id = playlist_id,
        );

        let response = self
            .http
            .get(&api_url)
            .bearer_auth(&self.access_token)
            .query(&[("fields", PLAYLIST_FIELDS)])
            .send()
            .await?;

        let res = ensure_success(response)
            .await?
            .json::<PlaylistTracksResponse>()
            .await?;

        Ok(res.into())
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<(), ApiError> {
        let body = AddTrackToPlaylistRequest {
            uris: track_ids
                .iter()
                .map(|id| format!("spotify:track:{id}"))
                .collect(),
        };

        let response = self
            .http
            .post(format!(
                "{uri}/playlists/{id}/tracks",
                uri = self.api_url,
                id = playlist_id
            ))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        ensure_success(response)
            .await?
            .json::<AddTrackToPlaylistResponse>()
            .await?;
        Ok(())
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<String, ApiError> {
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: true,
        };

        let response = self
            .http
            .post(format!(
                "{uri}/users/{user_id}/playlists",
                uri = self.api_url,
            ))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let playlist = ensure_success(response)
            .await?
            .json::<CreatePlaylistResponse>()
            .await?;
        Ok(playlist.id)
    }
}
