//! # Spotify Integration Module
//!
//! The provider side of the sync, expressed as two capability traits so the
//! core workflow in [`crate::sync`] never depends on HTTP details:
//!
//! - [`Authenticator`] turns an authorization code or a refresh token into an
//!   authenticated client.
//! - [`Catalog`] is what an authenticated client can do: look up the current
//!   user, search tracks, read playlist pages, add tracks, create playlists.
//!
//! [`SpotifyAuth`] and [`SpotifyClient`] implement them against the real
//! accounts service and Web API with `reqwest`.
//!
//! ## API Coverage
//!
//! - `GET /authorize` - authorization URL handed to the user
//! - `POST /api/token` - code and refresh-token exchange
//! - `GET /me` - identity of the authenticated user
//! - `GET /search` - single best track for a query
//! - `GET /playlists/{playlist_id}/tracks` - paged playlist contents
//! - `POST /playlists/{playlist_id}/tracks` - add up to 100 tracks
//! - `POST /users/{user_id}/playlists` - create a playlist

use std::future::Future;

use reqwest::Response;

use crate::{error::ApiError, types::PlaylistPage};

pub mod auth;
pub mod catalog;

pub use auth::SpotifyAuth;
pub use catalog::SpotifyClient;

/// Operations available once a user has authorized the application.
pub trait Catalog: Send + Sync {
    /// Returns the id of the authenticated user.
    fn current_user_id(&self) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// Returns the id of the best matching track, if the search found any.
    fn search_track(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Option<String>, ApiError>> + Send;

    /// Reads `limit` playlist entries starting at `offset` together with the
    /// declared playlist size.
    fn playlist_page(
        &self,
        playlist_id: &str,
        offset: usize,
        limit: usize,
    ) -> impl Future<Output = Result<PlaylistPage, ApiError>> + Send;

    /// Appends tracks to a playlist in one request; at most 100 ids.
    fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Creates a public playlist and returns its id.
    fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;
}

/// The OAuth2 side of the provider.
pub trait Authenticator: Send + Sync + 'static {
    type Client: Catalog + 'static;

    /// URL the user visits to grant access; `state` is echoed back to the
    /// redirect URI.
    fn authorize_url(&self, state: &str) -> String;

    /// Exchanges the code delivered to the redirect URI for a client.
    fn exchange_code(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<Self::Client, ApiError>> + Send;

    /// Exchanges a previously issued refresh token for a client.
    fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<Self::Client, ApiError>> + Send;
}

/// Passes 2xx responses through and turns anything else into
/// [`ApiError::Rejected`] carrying the response body.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}
