//! Reddit to Spotify playlist sync library
//!
//! This library collects track titles posted to subreddits, resolves them to
//! Spotify catalog tracks and adds the ones that are missing to a playlist.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback server
//! - `cli` - Command-line workflow implementations
//! - `config` - Configuration loading from environment variables and `.env`
//! - `error` - Error types shared by every stage
//! - `logging` - Debug output toggle used by the [`debug!`] macro
//! - `reddit` - Subreddit feed client used to harvest post titles
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify accounts and Web API client implementation
//! - `sync` - Session state machine, title resolution and playlist reconciliation
//! - `types` - Wire types for the Spotify and Reddit payloads
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```ignore
//! use redditsync::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> redditsync::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env();
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod reddit;
pub mod server;
pub mod spotify;
pub mod sync;
pub mod types;
pub mod utils;

pub use error::{ApiError, SyncError};

/// A convenient Result type alias for operations that may fail.
///
/// Every stage of the sync workflow surfaces the first error it hits as a
/// [`SyncError`], so the binary only has to print one message and exit.
pub type Res<T> = std::result::Result<T, SyncError>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```ignore
/// info!("Fetching /r/{}...", subreddit);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```ignore
/// success!("Authentication completed successfully");
/// success!("Resolved {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates the program with exit code 1 right after printing. Only the
/// binary should reach for this; library code returns a [`SyncError`].
///
/// # Example
///
/// ```ignore
/// error!("Cannot load environment. Err: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a dimmed diagnostic line when debug output is enabled.
///
/// Debug output is off unless [`logging::set_debug`] was called with `true`,
/// which the binary does for `--debug` or a non-empty `DEBUG_SYNC`.
///
/// # Example
///
/// ```ignore
/// debug!("searching for {}", query);
/// ```
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ({
    if $crate::logging::debug_enabled() {
      use colored::Colorize;
      eprintln!("[{}] {}", "d".dimmed(), std::format_args!($($arg)*));
    }
  })
}
