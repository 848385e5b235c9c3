//! # Sync Core
//!
//! The stateful part of the tool:
//!
//! - [`Session`] carries a client from unauthenticated to authenticated,
//!   either through a refresh token or through the interactive redirect
//!   handshake finished by a [`CallbackHandler`].
//! - [`resolve`] turns post titles into catalog track ids.
//! - [`reconcile`] indexes a playlist and adds the ids it does not hold yet,
//!   in batches of at most [`BATCH_SIZE`].
//!
//! Every catalog operation requires an authenticated session and fails with
//! [`SyncError::NotReady`](crate::SyncError::NotReady) otherwise.

mod reconciler;
mod resolver;
mod session;

pub use reconciler::{
    BATCH_SIZE, PAGE_SIZE, PlaylistIndex, build_index, missing_tracks, page_count, partition,
    reconcile,
};
pub use resolver::{resolve, sanitize_title};
pub use session::{AUTHORIZATION_DEADLINE, CallbackHandler, CallbackOutcome, Phase, Session};
