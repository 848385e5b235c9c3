#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use redditsync::{
    ApiError,
    spotify::{Authenticator, Catalog},
    sync::Session,
    types::{PlaylistEntry, PlaylistPage},
};

#[derive(Debug, Default)]
pub struct Calls {
    pub searches: Vec<String>,
    pub page_offsets: Vec<usize>,
    pub batches: Vec<Vec<String>>,
    pub created: Vec<(String, String)>,
}

// In-memory stand-in for the Web API. Clones share the remote playlist and
// the call log.
#[derive(Clone, Default)]
pub struct FakeCatalog {
    pub label: String,
    pub search_results: HashMap<String, String>,
    pub failing_query: Option<String>,
    pub failing_offset: Option<usize>,
    pub failing_batch: Option<usize>,
    pub playlist: Arc<Mutex<Vec<PlaylistEntry>>>,
    pub calls: Arc<Mutex<Calls>>,
}

fn rejected(message: &str) -> ApiError {
    ApiError::Rejected {
        status: 500,
        message: message.to_string(),
    }
}

impl FakeCatalog {
    pub fn with_tracks(count: usize) -> Self {
        let catalog = Self::default();
        catalog.seed((0..count).map(|i| format!("existing{i}")));
        catalog
    }

    pub fn seed(&self, ids: impl IntoIterator<Item = String>) {
        let mut playlist = self.playlist.lock().unwrap();
        for id in ids {
            playlist.push(PlaylistEntry {
                name: format!("name of {id}"),
                id,
            });
        }
    }

    pub fn with_search(mut self, query: &str, id: &str) -> Self {
        self.search_results
            .insert(query.to_string(), id.to_string());
        self
    }

    pub fn playlist_ids(&self) -> Vec<String> {
        self.playlist
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn total_calls(&self) -> usize {
        let calls = self.calls.lock().unwrap();
        calls.searches.len() + calls.page_offsets.len() + calls.batches.len() + calls.created.len()
    }
}

impl Catalog for FakeCatalog {
    async fn current_user_id(&self) -> Result<String, ApiError> {
        Ok("tester".to_string())
    }

    async fn search_track(&self, query: &str) -> Result<Option<String>, ApiError> {
        self.calls.lock().unwrap().searches.push(query.to_string());
        if self.failing_query.as_deref() == Some(query) {
            return Err(rejected("search unavailable"));
        }
        Ok(self.search_results.get(query).cloned())
    }

    async fn playlist_page(
        &self,
        _playlist_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<PlaylistPage, ApiError> {
        self.calls.lock().unwrap().page_offsets.push(offset);
        if self.failing_offset == Some(offset) {
            return Err(rejected("page unavailable"));
        }

        let playlist = self.playlist.lock().unwrap();
        let start = offset.min(playlist.len());
        let end = (offset + limit).min(playlist.len());
        Ok(PlaylistPage {
            total: playlist.len(),
            entries: playlist[start..end].to_vec(),
        })
    }

    async fn add_tracks(&self, _playlist_id: &str, track_ids: &[String]) -> Result<(), ApiError> {
        let batch = {
            let mut calls = self.calls.lock().unwrap();
            calls.batches.push(track_ids.to_vec());
            calls.batches.len() - 1
        };
        if self.failing_batch == Some(batch) {
            return Err(rejected("add rejected"));
        }

        self.seed(track_ids.iter().cloned());
        Ok(())
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        _description: &str,
    ) -> Result<String, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .created
            .push((user_id.to_string(), name.to_string()));
        Ok("new-playlist".to_string())
    }
}

// Hands out clones of `catalog`, labelled with the code or token that was
// exchanged for them.
#[derive(Default)]
pub struct FakeAuth {
    pub catalog: FakeCatalog,
    pub exchanges: Arc<AtomicUsize>,
}

pub const BAD_CODE: &str = "bad-code";
pub const EXPIRED_TOKEN: &str = "expired";

impl FakeAuth {
    pub fn new(catalog: FakeCatalog) -> Self {
        Self {
            catalog,
            exchanges: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn issue(&self, label: &str) -> FakeCatalog {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        FakeCatalog {
            label: label.to_string(),
            ..self.catalog.clone()
        }
    }
}

impl Authenticator for FakeAuth {
    type Client = FakeCatalog;

    fn authorize_url(&self, state: &str) -> String {
        format!("https://accounts.example/authorize?state={state}")
    }

    async fn exchange_code(&self, code: &str) -> Result<FakeCatalog, ApiError> {
        if code == BAD_CODE {
            self.exchanges.fetch_add(1, Ordering::SeqCst);
            return Err(ApiError::Rejected {
                status: 400,
                message: "invalid_grant".to_string(),
            });
        }
        Ok(self.issue(code))
    }

    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<FakeCatalog, ApiError> {
        if refresh_token == EXPIRED_TOKEN {
            return Err(ApiError::Rejected {
                status: 400,
                message: "invalid_grant".to_string(),
            });
        }
        Ok(self.issue("refresh"))
    }
}

pub async fn ready_session(catalog: FakeCatalog) -> Session<FakeAuth> {
    Session::begin_with_refresh_token(FakeAuth::new(catalog), "refresh-token")
        .await
        .expect("refresh token exchange succeeds")
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
