//! # CLI Module
//!
//! User-facing commands. [`sync`] runs the complete workflow:
//!
//! ```text
//! authenticate (refresh token, or browser login within one minute)
//!     ↓
//! fetch post titles from every subreddit
//!     ↓
//! resolve titles to Spotify tracks
//!     ↓
//! create the playlist if no id was given
//!     ↓
//! add the tracks the playlist does not contain yet
//! ```
//!
//! Any error ends the run with one message and exit status 1.

mod sync;

pub use sync::{SyncArgs, SyncReport, run, sync};
