use rand::{Rng, distr::Alphanumeric};

/// Random value round-tripped through the authorization redirect as `state`.
pub fn generate_correlation_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Number of chunks of size `limit` needed to hold `len` items.
///
/// The float quotient is ceiled and then nudged by half a unit towards its
/// sign before truncation, so the count never lands one below an exact
/// integer. Page fetches and add batches are both counted with this rule.
pub fn rounded_ceil(len: usize, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }

    let f = (len as f64 / limit as f64).ceil();
    (f + 0.5_f64.copysign(f)) as usize
}

/// Splits the comma separated `--subreddit` value, dropping empty entries.
pub fn parse_subreddits(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().trim_start_matches("r/").trim_start_matches("/r/"))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Name for a playlist created for the given subreddits.
pub fn playlist_name(subreddits: &[String]) -> String {
    let mut name = String::from("Reddit Sync - ");
    for sub in subreddits {
        name.push_str(&format!("/r/{} ", sub));
    }
    name
}
