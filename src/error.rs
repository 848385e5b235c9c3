use std::time::Duration;

use thiserror::Error;

/// A failed request against the Spotify accounts service or Web API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider responded with {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// Errors surfaced by the sync workflow.
///
/// Every stage stops at the first error and hands it up unchanged; nothing
/// that was already written to the remote playlist is rolled back.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unable to get token from Spotify: {0}")]
    AuthExchange(#[source] ApiError),

    #[error("client is not ready, make sure user has authenticated the app")]
    NotReady,

    #[error("session has already been started")]
    SessionConsumed,

    #[error("unable to get authorised by Spotify within {0:?}")]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("unable to decode payload: {0}")]
    Decode(String),

    #[error("search for \"{query}\" failed: {source}")]
    Search { query: String, source: ApiError },

    #[error("unable to fetch playlist tracks at offset {offset}: {source}")]
    Fetch { offset: usize, source: ApiError },

    #[error("unable to add batch {batch} to playlist: {source}")]
    Add { batch: usize, source: ApiError },

    #[error("spotify request failed: {0}")]
    Provider(#[source] ApiError),
}
