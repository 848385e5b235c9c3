use std::sync::LazyLock;

use regex::Regex;

use crate::{
    debug,
    error::SyncError,
    spotify::{Authenticator, Catalog},
    sync::Session,
};

// Posters annotate genre, remix or year in brackets: "Song (Radio Edit) [2019]".
static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[(].*[\])]").expect("annotation pattern is valid"));

/// Reduces a post title to a search query.
///
/// Drops everything from the first opening bracket to the last closing one,
/// collapses the `--` that this tends to leave behind and trims whitespace.
///
/// # Example
///
/// ```ignore
/// use redditsync::sync::sanitize_title;
///
/// assert_eq!(sanitize_title("Song (Radio Edit)"), "Song");
/// assert_eq!(sanitize_title("A--B (x)"), "A-B");
/// ```
pub fn sanitize_title(title: &str) -> String {
    ANNOTATION
        .replace_all(title, "")
        .replace("--", "-")
        .trim()
        .to_string()
}

/// Maps post titles to catalog track ids, one search per title, in order.
///
/// Titles without a search hit are skipped. The first failing search aborts
/// the whole call and nothing resolved so far is returned.
///
/// # Errors
///
/// - [`SyncError::NotReady`] if the session is not authenticated
/// - [`SyncError::Search`] on the first failed search request
pub async fn resolve<A: Authenticator>(
    session: &Session<A>,
    titles: &[String],
) -> Result<Vec<String>, SyncError> {
    let client = session.client()?;

    let mut ids = Vec::new();
    for title in titles {
        let query = sanitize_title(title);
        debug!("searching for {}", query);

        let hit = client
            .search_track(&query)
            .await
            .map_err(|source| SyncError::Search {
                query: query.clone(),
                source,
            })?;

        match hit {
            Some(id) => {
                debug!("found track for {}, picking first track", query);
                ids.push(id);
            }
            None => debug!("no track found for {}", query),
        }
    }

    debug!("found {} tracks for {} queries", ids.len(), titles.len());
    Ok(ids)
}
