//! Subreddit feed client.
//!
//! Walks the public JSON listing of a subreddit page by page, following the
//! `after` cursor, and collects the post titles.

use reqwest::Client;

use crate::{debug, error::SyncError, types::Listing};

pub const REDDIT_URL: &str = "https://www.reddit.com";

// The listing endpoint throttles or blocks non-browser agents.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/41.0.2228.0 Safari/537.36";

/// Post titles of one listing page and the id of its last post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub titles: Vec<String>,
    pub last_id: Option<String>,
}

/// Decodes one listing payload.
///
/// # Errors
///
/// [`SyncError::Decode`] if the body is not a subreddit listing.
pub fn parse_listing(body: &str) -> Result<ListingPage, SyncError> {
    let listing: Listing =
        serde_json::from_str(body).map_err(|e| SyncError::Decode(e.to_string()))?;

    let last_id = listing.data.children.last().map(|c| c.data.id.clone());
    let titles = listing
        .data
        .children
        .into_iter()
        .map(|c| c.data.title)
        .collect();

    Ok(ListingPage { titles, last_id })
}

/// Reads up to `max_pages` pages of one subreddit.
pub struct RedditFeed {
    subreddit: String,
    max_pages: usize,
    base_url: String,
    http: Client,
}

impl RedditFeed {
    pub fn new(subreddit: impl Into<String>, max_pages: usize) -> Result<Self, SyncError> {
        Self::with_base_url(subreddit, max_pages, REDDIT_URL)
    }

    pub fn with_base_url(
        subreddit: impl Into<String>,
        max_pages: usize,
        base_url: &str,
    ) -> Result<Self, SyncError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(SyncError::Network)?;

        Ok(Self {
            subreddit: subreddit.into(),
            max_pages,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// URL of the listing page that follows the post `after`.
    pub fn page_url(&self, after: Option<&str>) -> String {
        match after {
            Some(id) => format!(
                "{uri}/r/{sub}.json?after=t3_{id}",
                uri = self.base_url,
                sub = self.subreddit
            ),
            None => format!("{uri}/r/{sub}.json", uri = self.base_url, sub = self.subreddit),
        }
    }

    /// Collects the post titles of the first `max_pages` pages.
    ///
    /// Stops early when a page comes back empty.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Network`] on transport failures and non-2xx responses
    /// - [`SyncError::Decode`] if a page is not a subreddit listing
    pub async fn fetch(&self) -> Result<Vec<String>, SyncError> {
        let mut titles = Vec::new();
        let mut after: Option<String> = None;

        for cursor in 0..self.max_pages {
            debug!(
                "fetching subreddit:{} ({}/{})",
                self.subreddit, cursor, self.max_pages
            );
            let url = self.page_url(after.as_deref());
            debug!("making a new request at URL: {}", url);

            let body = self
                .http
                .get(&url)
                .send()
                .await
                .and_then(|res| res.error_for_status())
                .map_err(SyncError::Network)?
                .text()
                .await
                .map_err(SyncError::Network)?;

            let page = parse_listing(&body)?;
            debug!("nodes appended to list ({}): {}", titles.len(), page.titles.len());
            titles.extend(page.titles);

            match page.last_id {
                Some(id) => after = Some(id),
                None => break,
            }
        }

        Ok(titles)
    }
}
