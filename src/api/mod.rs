//! # API Module
//!
//! HTTP handlers served by the local listener during the interactive
//! authorization handshake.
//!
//! - [`callback`] - mounted on the redirect URI path; hands the query
//!   parameters to the session's [`CallbackHandler`](crate::sync::CallbackHandler)
//!   and maps its outcome to a status code: `200` when the login completed,
//!   `403` when the code exchange failed, `404` on a state mismatch and `409`
//!   when the handshake was already completed. A repeated callback carries a
//!   matching state, so it is a conflict with the finished handshake rather
//!   than an unknown request.
//! - [`index`] - mounted on `/`; explains what the listener is for.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use redditsync::api::{callback, index};
//!
//! let app = Router::new()
//!     .route("/", get(index))
//!     .route("/callback", get(callback::<SpotifyAuth>))
//!     .with_state(handler);
//! ```

mod callback;
mod index;

pub use callback::callback;
pub use index::index;
