//! Connection settings for a MediaWiki installation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// English Wikipedia's action API.
pub const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

/// Identifies the client per <https://meta.wikimedia.org/wiki/User-Agent_policy>.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "wikirace/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/tysontate/wikirace)"
);

/// Main articles, categories and portals. Talk, user and project pages are
/// never followed.
pub const DEFAULT_NAMESPACES: &str = "0|14|100";

/// The API accepts at most this many titles per query for regular clients.
pub const MAX_TITLES_PER_QUERY: usize = 50;

const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Where and how to query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaWikiConfig {
    /// `api.php` URL.
    pub endpoint: String,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Pipe-separated namespace ids passed as `plnamespace`/`lhnamespace`.
    pub namespaces: String,
    /// Titles per request, clamped to `1..=MAX_TITLES_PER_QUERY`.
    pub batch_size: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for MediaWikiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            namespaces: DEFAULT_NAMESPACES.to_string(),
            batch_size: MAX_TITLES_PER_QUERY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl MediaWikiConfig {
    /// Config pointing at another `api.php`, other fields default.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Batch size actually used.
    #[must_use]
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.clamp(1, MAX_TITLES_PER_QUERY)
    }

    /// Request timeout actually used (at least one second).
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}
