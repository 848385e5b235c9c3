use std::{sync::Arc, time::Duration};

use tokio::sync::{Mutex, oneshot};

use crate::{
    debug,
    error::SyncError,
    spotify::{Authenticator, Catalog},
    warning,
};

/// How long the interactive flow waits for the user to finish logging in.
pub const AUTHORIZATION_DEADLINE: Duration = Duration::from_secs(60);

/// Observable state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unauthenticated,
    AwaitingCallback,
    Authenticated,
}

enum SessionState<C> {
    Unauthenticated,
    AwaitingCallback(oneshot::Receiver<C>),
    Authenticated(C),
}

/// A single-use handle to the provider.
///
/// Starts unauthenticated and becomes authenticated exactly once, either
/// directly through a refresh token or through the interactive redirect
/// handshake completed by a [`CallbackHandler`]. It never goes back.
pub struct Session<A: Authenticator> {
    authenticator: Arc<A>,
    state: SessionState<A::Client>,
}

impl<A: Authenticator> Session<A> {
    pub fn new(authenticator: A) -> Self {
        Self {
            authenticator: Arc::new(authenticator),
            state: SessionState::Unauthenticated,
        }
    }

    /// Creates an authenticated session by exchanging a refresh token.
    ///
    /// # Errors
    ///
    /// [`SyncError::AuthExchange`] if the token endpoint could not be reached
    /// or rejected the token.
    pub async fn begin_with_refresh_token(
        authenticator: A,
        refresh_token: &str,
    ) -> Result<Self, SyncError> {
        debug!("requesting new access token with provided refresh token");
        let client = authenticator
            .exchange_refresh_token(refresh_token)
            .await
            .map_err(SyncError::AuthExchange)?;

        Ok(Self {
            authenticator: Arc::new(authenticator),
            state: SessionState::Authenticated(client),
        })
    }

    /// Starts the interactive handshake.
    ///
    /// Returns the authorization URL to show the user, with
    /// `correlation_token` embedded as the `state` parameter, and the handler
    /// that completes the handshake when the provider redirects back.
    ///
    /// # Errors
    ///
    /// [`SyncError::SessionConsumed`] if the session already left the
    /// unauthenticated state.
    pub fn begin_interactive(
        &mut self,
        correlation_token: impl Into<String>,
    ) -> Result<(String, CallbackHandler<A>), SyncError> {
        if !matches!(self.state, SessionState::Unauthenticated) {
            return Err(SyncError::SessionConsumed);
        }

        let correlation_token = correlation_token.into();
        let (tx, rx) = oneshot::channel();
        self.state = SessionState::AwaitingCallback(rx);

        let url = self.authenticator.authorize_url(&correlation_token);
        let handler = CallbackHandler {
            authenticator: Arc::clone(&self.authenticator),
            correlation_token,
            completion: Mutex::new(Some(tx)),
        };

        Ok((url, handler))
    }

    /// Blocks until the callback handler completed the handshake, at most
    /// for `deadline`.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Timeout`] when no valid callback arrived in time
    /// - [`SyncError::NotReady`] when the session never started the
    ///   handshake or the handler went away without completing it
    pub async fn wait_authenticated(&mut self, deadline: Duration) -> Result<(), SyncError> {
        let completion = match &mut self.state {
            SessionState::Authenticated(_) => return Ok(()),
            SessionState::Unauthenticated => return Err(SyncError::NotReady),
            SessionState::AwaitingCallback(rx) => rx,
        };

        match tokio::time::timeout(deadline, completion).await {
            Ok(Ok(client)) => {
                self.state = SessionState::Authenticated(client);
                Ok(())
            }
            Ok(Err(_)) => Err(SyncError::NotReady),
            Err(_) => Err(SyncError::Timeout(deadline)),
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            SessionState::Unauthenticated => Phase::Unauthenticated,
            SessionState::AwaitingCallback(_) => Phase::AwaitingCallback,
            SessionState::Authenticated(_) => Phase::Authenticated,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.phase() == Phase::Authenticated
    }

    /// The authenticated client; every catalog operation goes through here.
    pub fn client(&self) -> Result<&A::Client, SyncError> {
        match &self.state {
            SessionState::Authenticated(client) => Ok(client),
            _ => Err(SyncError::NotReady),
        }
    }

    pub async fn current_user_id(&self) -> Result<String, SyncError> {
        self.client()?
            .current_user_id()
            .await
            .map_err(SyncError::Provider)
    }

    /// Creates a public playlist owned by the authenticated user.
    pub async fn create_playlist(&self, name: &str, description: &str) -> Result<String, SyncError> {
        let user_id = self.current_user_id().await?;
        self.client()?
            .create_playlist(&user_id, name, description)
            .await
            .map_err(SyncError::Provider)
    }
}

/// How a callback request was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Token obtained, state verified, waiter signalled.
    Completed,
    /// The authorization code was missing or the provider refused it.
    ExchangeFailed,
    /// The `state` parameter does not match the correlation token.
    StateMismatch,
    /// Another callback already completed the handshake, or nobody waits
    /// for it anymore.
    AlreadyCompleted,
}

/// Completes the interactive handshake of one [`Session`].
///
/// The completion sender is taken out of its slot by the first verified
/// callback, so the waiting session can be signalled at most once no matter
/// how many requests hit the redirect URI.
pub struct CallbackHandler<A: Authenticator> {
    authenticator: Arc<A>,
    correlation_token: String,
    completion: Mutex<Option<oneshot::Sender<A::Client>>>,
}

impl<A: Authenticator> CallbackHandler<A> {
    pub async fn handle(&self, code: Option<&str>, state: Option<&str>) -> CallbackOutcome {
        debug!(
            "callback invoked with code: {} and state: {}",
            code.unwrap_or_default(),
            state.unwrap_or_default()
        );

        let Some(code) = code.filter(|c| !c.is_empty()) else {
            warning!("Callback request carries no authorization code");
            return CallbackOutcome::ExchangeFailed;
        };

        let client = match self.authenticator.exchange_code(code).await {
            Ok(client) => client,
            Err(e) => {
                warning!("Unable to get token from Spotify: {}", e);
                return CallbackOutcome::ExchangeFailed;
            }
        };

        if state != Some(self.correlation_token.as_str()) {
            debug!(
                "state value mismatched ({} != {})",
                state.unwrap_or_default(),
                self.correlation_token
            );
            return CallbackOutcome::StateMismatch;
        }

        let Some(tx) = self.completion.lock().await.take() else {
            return CallbackOutcome::AlreadyCompleted;
        };

        debug!("creating client with token");
        match tx.send(client) {
            Ok(()) => CallbackOutcome::Completed,
            Err(_) => CallbackOutcome::AlreadyCompleted,
        }
    }

    /// Whether the handshake can still be completed by this handler.
    pub async fn is_pending(&self) -> bool {
        self.completion
            .lock()
            .await
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }
}
