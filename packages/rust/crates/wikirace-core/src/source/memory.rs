//! In-memory link source over a fixed directed graph.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;

use super::{LinkDirection, LinkMap, LinkSource, LinkStream};
use crate::error::LinkSourceError;

/// [`LinkSource`] backed by an explicit edge list.
///
/// Results are split into pages of at most `page_size` links so callers see the
/// same multi-page shape a remote API produces. Fetches are counted per direction,
/// titles can be marked as failing, and every page can be delayed.
#[derive(Debug)]
pub struct MemoryLinkSource {
    outgoing: BTreeMap<String, Vec<String>>,
    redirects: HashMap<String, String>,
    failing: BTreeSet<String>,
    page_size: usize,
    page_delay: Option<Duration>,
    outgoing_fetches: AtomicUsize,
    incoming_fetches: AtomicUsize,
    pages_served: Arc<AtomicUsize>,
}

impl Default for MemoryLinkSource {
    fn default() -> Self {
        Self {
            outgoing: BTreeMap::new(),
            redirects: HashMap::new(),
            failing: BTreeSet::new(),
            page_size: usize::MAX,
            page_delay: None,
            outgoing_fetches: AtomicUsize::new(0),
            incoming_fetches: AtomicUsize::new(0),
            pages_served: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MemoryLinkSource {
    /// Empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph holding the given `(from, to)` edges.
    #[must_use]
    pub fn with_edges<'a>(edges: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut source = Self::new();
        for (from, to) in edges {
            source.add_edge(from, to);
        }
        source
    }

    /// Add one directed edge. Duplicates and self-loops are kept as given.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.outgoing
            .entry(from.to_string())
            .or_default()
            .push(to.to_string());
    }

    /// Split results into pages of at most `page_size` links (minimum 1).
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sleep this long before yielding each page.
    #[must_use]
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = Some(delay);
        self
    }

    /// Any fetch that includes `title` ends with an error after the pages gathered
    /// before it.
    #[must_use]
    pub fn with_failure(mut self, title: &str) -> Self {
        self.failing.insert(title.to_string());
        self
    }

    /// Make `resolve_title(from)` answer `to`.
    #[must_use]
    pub fn with_redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    /// Number of `fetch_links` calls made in `direction`.
    #[must_use]
    pub fn fetch_count(&self, direction: LinkDirection) -> usize {
        match direction {
            LinkDirection::Outgoing => self.outgoing_fetches.load(Ordering::SeqCst),
            LinkDirection::Incoming => self.incoming_fetches.load(Ordering::SeqCst),
        }
    }

    /// Number of pages actually pulled from returned streams.
    #[must_use]
    pub fn pages_served(&self) -> usize {
        self.pages_served.load(Ordering::SeqCst)
    }

    fn knows(&self, title: &str) -> bool {
        self.outgoing.contains_key(title)
            || self
                .outgoing
                .values()
                .any(|targets| targets.iter().any(|target| target == title))
    }

    fn linked(&self, title: &str, direction: LinkDirection) -> Vec<String> {
        match direction {
            LinkDirection::Outgoing => self.outgoing.get(title).cloned().unwrap_or_default(),
            LinkDirection::Incoming => self
                .outgoing
                .iter()
                .flat_map(|(from, targets)| {
                    targets
                        .iter()
                        .filter(|target| *target == title)
                        .map(move |_| from.clone())
                })
                .collect(),
        }
    }

    fn paginate(
        &self,
        titles: &[String],
        direction: LinkDirection,
    ) -> Vec<Result<LinkMap, LinkSourceError>> {
        let mut pages = Vec::new();
        let mut current = LinkMap::new();
        for title in titles {
            if self.failing.contains(title) {
                if !current.is_empty() {
                    pages.push(Ok(std::mem::take(&mut current)));
                }
                pages.push(Err(LinkSourceError::Request(format!(
                    "fetching {direction} links for {title:?} failed"
                ))));
                return pages;
            }
            for linked in self.linked(title, direction) {
                current.add(title.clone(), linked);
                if current.edge_count() >= self.page_size {
                    pages.push(Ok(std::mem::take(&mut current)));
                }
            }
        }
        if !current.is_empty() || pages.is_empty() {
            pages.push(Ok(current));
        }
        pages
    }
}

#[async_trait]
impl LinkSource for MemoryLinkSource {
    fn fetch_links(&self, titles: Vec<String>, direction: LinkDirection) -> LinkStream {
        match direction {
            LinkDirection::Outgoing => self.outgoing_fetches.fetch_add(1, Ordering::SeqCst),
            LinkDirection::Incoming => self.incoming_fetches.fetch_add(1, Ordering::SeqCst),
        };
        let pages = self.paginate(&titles, direction);
        let delay = self.page_delay;
        let served = Arc::clone(&self.pages_served);
        futures::stream::iter(pages)
            .then(move |page| {
                let served = Arc::clone(&served);
                async move {
                    if let Some(delay) = delay {
                        tokio::time::sleep(delay).await;
                    }
                    served.fetch_add(1, Ordering::SeqCst);
                    page
                }
            })
            .boxed()
    }

    async fn resolve_title(&self, title: &str) -> Result<Option<String>, LinkSourceError> {
        if let Some(target) = self.redirects.get(title) {
            return Ok(Some(target.clone()));
        }
        Ok(self.knows(title).then(|| title.to_string()))
    }
}
