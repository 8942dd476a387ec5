//! The link-fetching collaborator seen from the search engine.
//!
//! A [`LinkSource`] turns a batch of titles into a lazy [`LinkStream`] of partial
//! mappings. Pagination is the source's business; the engine only consumes pages
//! until the stream ends. Filtering (self-loops, denylist) and deduplication are the
//! engine's business, so sources report links exactly as they find them.

mod memory;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::LinkSourceError;

pub use memory::MemoryLinkSource;

/// Which links of the queried pages to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkDirection {
    /// Links on the queried page, pointing elsewhere.
    Outgoing,
    /// Links on other pages, pointing at the queried page.
    Incoming,
}

impl LinkDirection {
    /// Short label for logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Outgoing => "outgoing",
            Self::Incoming => "incoming",
        }
    }
}

impl fmt::Display for LinkDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of results: queried title -> titles linked from it (outgoing) or
/// linking to it (incoming). Several pages may mention the same queried title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkMap {
    links: BTreeMap<String, Vec<String>>,
}

impl LinkMap {
    /// Empty page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `linked` under `queried`.
    pub fn add(&mut self, queried: impl Into<String>, linked: impl Into<String>) {
        self.links
            .entry(queried.into())
            .or_default()
            .push(linked.into());
    }

    /// Linked titles reported for `queried` in this page.
    #[must_use]
    pub fn get(&self, queried: &str) -> Option<&[String]> {
        self.links.get(queried).map(Vec::as_slice)
    }

    /// Iterate `(queried, linked titles)` pairs in title order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.links
            .iter()
            .map(|(queried, linked)| (queried.as_str(), linked.as_slice()))
    }

    /// Number of queried titles present in this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True when the page carries no titles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Total number of `(queried, linked)` pairs.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.links.values().map(Vec::len).sum()
    }
}

impl<K, V> FromIterator<(K, Vec<V>)> for LinkMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, Vec<V>)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (queried, linked) in iter {
            let queried = queried.into();
            for title in linked {
                map.add(queried.clone(), title);
            }
        }
        map
    }
}

/// Lazy, finite, non-restartable sequence of link pages. Ending is the completion
/// signal; an `Err` item aborts the generation that requested it.
pub type LinkStream = BoxStream<'static, Result<LinkMap, LinkSourceError>>;

/// Producer of link pages for batches of titles.
#[async_trait]
pub trait LinkSource: Send + Sync {
    /// Every `direction` link of `titles`, paginated into partial maps.
    fn fetch_links(&self, titles: Vec<String>, direction: LinkDirection) -> LinkStream;

    /// Canonical title for `title` (redirects followed), or `None` when no such
    /// page exists.
    ///
    /// # Errors
    /// Returns an error when the source cannot be queried.
    async fn resolve_title(&self, title: &str) -> Result<Option<String>, LinkSourceError> {
        Ok(Some(title.to_string()))
    }
}
