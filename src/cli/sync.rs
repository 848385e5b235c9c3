use std::{future::Future, sync::Arc, time::Duration};

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Res,
    config::{Config, RedirectTarget},
    error, info,
    reddit::RedditFeed,
    server::start_callback_server,
    spotify::SpotifyAuth,
    success,
    sync::{AUTHORIZATION_DEADLINE, Session, reconcile, resolve},
    utils, warning,
};

/// Options of one sync run.
#[derive(Debug, Clone)]
pub struct SyncArgs {
    pub subreddits: Vec<String>,
    pub pages: usize,
    pub redirect_url: String,
    pub playlist_id: Option<String>,
    pub refresh_token: Option<String>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub playlist_id: String,
    pub resolved: usize,
    pub added: usize,
}

/// Runs the whole sync and exits with status 1 on the first error.
pub async fn sync(config: &Config, args: SyncArgs) {
    match run(config, args).await {
        Ok(report) => success!(
            "Added ({}/{}) tracks in the playlist {}.",
            report.added,
            report.resolved,
            report.playlist_id
        ),
        Err(e) => error!("{}", e),
    }
}

pub async fn run(config: &Config, args: SyncArgs) -> Res<SyncReport> {
    let session = authenticate(config, &args).await?;

    let mut titles = Vec::new();
    for subreddit in &args.subreddits {
        let feed = RedditFeed::new(subreddit.as_str(), args.pages)?;
        let list = with_spinner(format!("Fetching /r/{}...", subreddit), feed.fetch()).await?;
        info!("Collected {} posts from /r/{}", list.len(), subreddit);
        titles.extend(list);
    }

    let ids = with_spinner(
        format!("Searching Spotify for {} titles...", titles.len()),
        resolve(&session, &titles),
    )
    .await?;
    info!("Resolved {} of {} titles", ids.len(), titles.len());

    let playlist_id = match args.playlist_id {
        Some(id) => id,
        None => {
            let name = utils::playlist_name(&args.subreddits);
            let description = format!(
                "Tracks posted to reddit, synced on {}",
                Utc::now().format("%Y-%m-%d")
            );
            let id = session.create_playlist(&name, &description).await?;
            success!("Created playlist \"{}\" ({})", name.trim_end(), id);
            id
        }
    };

    let added = with_spinner(
        "Updating playlist...".to_string(),
        reconcile(&session, &playlist_id, &ids),
    )
    .await?;

    Ok(SyncReport {
        playlist_id,
        resolved: ids.len(),
        added,
    })
}

async fn authenticate(config: &Config, args: &SyncArgs) -> Res<Session<SpotifyAuth>> {
    if let Some(refresh_token) = &args.refresh_token {
        let auth = SpotifyAuth::new(config, None)?;
        let session = Session::begin_with_refresh_token(auth, refresh_token).await?;
        success!("Authenticated with refresh token");
        return Ok(session);
    }

    let target = RedirectTarget::parse(&args.redirect_url)?;
    let auth = SpotifyAuth::new(config, Some(&target))?;
    let mut session = Session::new(auth);

    let (auth_url, handler) = session.begin_interactive(utils::generate_correlation_token())?;
    let server = start_callback_server(&target, Arc::new(handler)).await?;

    info!(
        "Please log in to Spotify by visiting the following page in your browser: {}",
        auth_url
    );
    if webbrowser::open(&auth_url).is_err() {
        warning!("Failed to open browser. Please navigate to the URL above manually.");
    }

    let result = session.wait_authenticated(AUTHORIZATION_DEADLINE).await;
    server.abort();
    result?;

    success!("Authentication successful!");
    Ok(session)
}

async fn with_spinner<T>(message: String, task: impl Future<Output = Res<T>>) -> Res<T> {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let result = task.await;
    pb.finish_and_clear();
    result
}
