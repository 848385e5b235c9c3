use std::{net::SocketAddr, sync::Arc};

use axum::{Router, routing::get};
use tokio::{net::TcpListener, task::JoinHandle};

use crate::{
    api, config::RedirectTarget, error::SyncError, spotify::Authenticator, sync::CallbackHandler,
    warning,
};

/// Routes `route` to the callback handler and `/` to the index page.
pub fn build_router<A: Authenticator>(route: &str, handler: Arc<CallbackHandler<A>>) -> Router {
    let app = Router::new().route(route, get(api::callback::<A>));
    let app = if route == "/" {
        app
    } else {
        app.route("/", get(api::index))
    };

    app.with_state(handler)
}

/// Binds the callback listener on the redirect URI's port and serves it on
/// its own task.
///
/// # Errors
///
/// [`SyncError::Configuration`] if the port cannot be bound.
pub async fn start_callback_server<A: Authenticator>(
    target: &RedirectTarget,
    handler: Arc<CallbackHandler<A>>,
) -> Result<JoinHandle<()>, SyncError> {
    let app = build_router(&target.route(), handler);
    let addr = SocketAddr::from(([0, 0, 0, 0], target.port()));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| SyncError::Configuration(format!("cannot listen on {addr}: {e}")))?;

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warning!("Callback server stopped: {}", e);
        }
    }))
}
