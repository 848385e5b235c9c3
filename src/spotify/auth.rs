use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, Url};

use crate::{
    config::{Config, Credentials, RedirectTarget},
    debug,
    error::{ApiError, SyncError},
    spotify::{Authenticator, SpotifyClient, ensure_success},
    types::Token,
};

pub const SCOPES: &str = "playlist-modify-public user-read-private";

/// Authorization code and refresh-token flows against the accounts service.
pub struct SpotifyAuth {
    credentials: Credentials,
    authorize_endpoint: Url,
    token_endpoint: Url,
    api_url: String,
    redirect_uri: Option<String>,
    http: Client,
}

impl SpotifyAuth {
    /// Builds the authenticator from the configuration.
    ///
    /// `redirect` is only needed for the interactive flow; the refresh-token
    /// flow passes `None`.
    ///
    /// # Errors
    ///
    /// [`SyncError::Configuration`] when the credentials are missing or the
    /// accounts URL is not a valid base URL.
    pub fn new(config: &Config, redirect: Option<&RedirectTarget>) -> Result<Self, SyncError> {
        let credentials = config.credentials()?;
        let base = config.accounts_url.trim_end_matches('/');
        let endpoint = |path: &str| {
            Url::parse(&format!("{base}{path}")).map_err(|e| {
                SyncError::Configuration(format!("invalid accounts url {base:?}: {e}"))
            })
        };

        Ok(Self {
            credentials,
            authorize_endpoint: endpoint("/authorize")?,
            token_endpoint: endpoint("/api/token")?,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            redirect_uri: redirect.map(|r| r.as_str().to_string()),
            http: Client::new(),
        })
    }

    fn basic_auth_header(&self) -> String {
        let credentials = format!(
            "{}:{}",
            self.credentials.client_id, self.credentials.client_secret
        );
        format!("Basic {}", STANDARD.encode(credentials))
    }

    async fn token_request(
        &self,
        http: &Client,
        params: &[(&str, &str)],
    ) -> Result<Token, ApiError> {
        let response = http
            .post(self.token_endpoint.clone())
            .header(reqwest::header::AUTHORIZATION, self.basic_auth_header())
            .form(params)
            .send()
            .await?;

        let token = ensure_success(response).await?.json::<Token>().await?;
        debug!(
            "obtained {} token, expires in {}s, scope: {}",
            token.token_type,
            token.expires_in,
            token.scope.as_deref().unwrap_or("-")
        );
        Ok(token)
    }

    fn client_for(&self, token: Token) -> SpotifyClient {
        SpotifyClient::new(self.http.clone(), &self.api_url, token.access_token)
    }
}

impl Authenticator for SpotifyAuth {
    type Client = SpotifyClient;

    fn authorize_url(&self, state: &str) -> String {
        let mut url = self.authorize_endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &self.credentials.client_id)
                .append_pair("response_type", "code")
                .append_pair("scope", SCOPES)
                .append_pair("state", state);
            if let Some(redirect_uri) = &self.redirect_uri {
                query.append_pair("redirect_uri", redirect_uri);
            }
        }
        url.into()
    }

    async fn exchange_code(&self, code: &str) -> Result<SpotifyClient, ApiError> {
        let redirect_uri = self.redirect_uri.as_deref().unwrap_or_default();
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        let token = self.token_request(&self.http, &params).await?;
        Ok(self.client_for(token))
    }

    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<SpotifyClient, ApiError> {
        // The token endpoint breaks the handshake when HTTP/2 gets negotiated
        // for this grant, so this exchange runs on an HTTP/1.1-only client.
        let http = Client::builder().http1_only().build()?;
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        let token = self.token_request(&http, &params).await?;
        Ok(self.client_for(token))
    }
}
