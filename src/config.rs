//! Configuration management for the Reddit playlist sync.
//!
//! Values come from process environment variables and an optional `.env`
//! file. They are read exactly once, by [`Config::from_env`], into an explicit
//! [`Config`] that is then passed to the components that need it. Nothing
//! below the binary reads the environment on its own.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use axum::http::Uri;
use reqwest::Url;

use crate::error::SyncError;

pub const CLIENT_ID_VAR: &str = "SPOTIFY_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIFY_SECRET";
pub const DEBUG_VAR: &str = "DEBUG_SYNC";

pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file is looked up in the platform-specific local data directory under
/// `redditsync/.env`:
/// - Linux: `~/.local/share/redditsync/.env`
/// - macOS: `~/Library/Application Support/redditsync/.env`
/// - Windows: `%LOCALAPPDATA%/redditsync/.env`
///
/// A missing file is fine, the process environment is used as-is then.
///
/// # Errors
///
/// Fails with [`SyncError::Configuration`] if the directory cannot be
/// created or the file exists but cannot be parsed.
pub async fn load_env() -> Result<(), SyncError> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("redditsync/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| SyncError::Configuration(e.to_string()))?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map_err(|e| SyncError::Configuration(format!("{}: {}", path.display(), e)))
}

/// Spotify application credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Explicit runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub debug: bool,
    /// Base URL of the accounts service (`/authorize`, `/api/token`).
    pub accounts_url: String,
    /// Base URL of the Web API.
    pub api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            debug: false,
            accounts_url: DEFAULT_ACCOUNTS_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// - `SPOTIFY_ID` / `SPOTIFY_SECRET` - application credentials
    /// - `DEBUG_SYNC` - any non-empty value enables debug output
    /// - `SPOTIFY_ACCOUNTS_URL` / `SPOTIFY_API_URL` - endpoint overrides
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            client_id: non_empty_var(CLIENT_ID_VAR),
            client_secret: non_empty_var(CLIENT_SECRET_VAR),
            debug: non_empty_var(DEBUG_VAR).is_some(),
            accounts_url: non_empty_var("SPOTIFY_ACCOUNTS_URL").unwrap_or(defaults.accounts_url),
            api_url: non_empty_var("SPOTIFY_API_URL").unwrap_or(defaults.api_url),
        }
    }

    /// Returns the application credentials.
    ///
    /// # Errors
    ///
    /// [`SyncError::Configuration`] when either the client id or the client
    /// secret is missing.
    pub fn credentials(&self) -> Result<Credentials, SyncError> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) if !id.trim().is_empty() && !secret.trim().is_empty() => {
                Ok(Credentials {
                    client_id: id.clone(),
                    client_secret: secret.clone(),
                })
            }
            _ => Err(SyncError::Configuration(format!(
                "client key and secret must be set in {} and {}",
                CLIENT_ID_VAR, CLIENT_SECRET_VAR
            ))),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// The OAuth redirect URI and the local listener derived from it.
#[derive(Debug, Clone)]
pub struct RedirectTarget {
    url: Url,
    port: Option<u16>,
}

impl RedirectTarget {
    /// Parses a redirect URI such as `http://localhost:8080/callback`.
    ///
    /// # Errors
    ///
    /// [`SyncError::Configuration`] if the value is not an absolute URI with a
    /// scheme.
    pub fn parse(uri: &str) -> Result<Self, SyncError> {
        let url = Url::parse(uri.trim())
            .map_err(|e| SyncError::Configuration(format!("invalid redirect uri {uri:?}: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(SyncError::Configuration(format!(
                "redirect uri {uri:?} must be a hierarchical http(s) uri"
            )));
        }
        // `Url` drops a port equal to the scheme default, so read the written one.
        let port = uri.trim().parse::<Uri>().ok().and_then(|u| u.port_u16());
        Ok(Self { url, port })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Path the callback handler is mounted on.
    pub fn route(&self) -> String {
        let path = self.url.path();
        if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        }
    }

    /// Port of the local listener, 80 when the URI does not name one.
    ///
    /// An explicit port is kept even when it is the scheme default, so
    /// `https://localhost:443/callback` listens on 443.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(80)
    }
}
