//! HTTP client for the MediaWiki action API.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use reqwest::{Client, Url};
use wikirace_core::{LinkDirection, LinkMap, LinkSource, LinkSourceError, LinkStream};

use crate::config::MediaWikiConfig;
use crate::query::{LinkProp, batch, build_query_url, build_resolve_url};
use crate::response::{Continuation, LinksPage, parse_links_response, parse_resolved_title};

/// [`LinkSource`] backed by a MediaWiki `api.php` endpoint.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct MediaWikiClient {
    http: Client,
    config: Arc<MediaWikiConfig>,
}

impl MediaWikiClient {
    /// Build a client with `config`'s user agent and request timeout.
    ///
    /// # Errors
    /// Returns [`LinkSourceError::Request`] when the HTTP client cannot be built.
    pub fn new(config: MediaWikiConfig) -> Result<Self, LinkSourceError> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(|error| LinkSourceError::Request(error.to_string()))?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// Settings in use.
    #[must_use]
    pub fn config(&self) -> &MediaWikiConfig {
        &self.config
    }

    /// One request for `prop` links of at most one batch of `titles`.
    ///
    /// # Errors
    /// Transport failures, non-success statuses, API error objects and
    /// undecodable bodies.
    pub async fn query_links(
        &self,
        prop: LinkProp,
        titles: &[String],
        continuation: Option<&Continuation>,
    ) -> Result<LinksPage, LinkSourceError> {
        let url = build_query_url(
            &self.config.endpoint,
            prop,
            &self.config.namespaces,
            titles,
            continuation,
        )?;
        let started = Instant::now();
        let body = self.get(url).await?;
        let page = parse_links_response(&body, prop)?;
        tracing::debug!(
            event = "mediawiki.query.page",
            prop = prop.prop,
            titles = titles.len(),
            edges = page.links.edge_count(),
            has_more = page.continuation.is_some(),
            elapsed_ms = started.elapsed().as_millis(),
            "link page decoded"
        );
        Ok(page)
    }

    async fn get(&self, url: Url) -> Result<String, LinkSourceError> {
        let response = match self.http.get(url.clone()).send().await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(
                    event = "mediawiki.query.request_failed",
                    url = %url,
                    error = %error,
                    "mediawiki request failed"
                );
                return Err(LinkSourceError::Request(error.to_string()));
            }
        };
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                event = "mediawiki.query.non_success_status",
                url = %url,
                status = %status,
                "mediawiki returned non-success status"
            );
            return Err(LinkSourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        response
            .text()
            .await
            .map_err(|error| LinkSourceError::Request(error.to_string()))
    }
}

/// Walks the batches of one `fetch_links` call, following continuations.
struct Pager {
    client: MediaWikiClient,
    prop: LinkProp,
    batches: VecDeque<Vec<String>>,
    pending: Option<(Vec<String>, Continuation)>,
}

async fn next_page(mut pager: Pager) -> Result<Option<(LinkMap, Pager)>, LinkSourceError> {
    let (titles, continuation) = match pager.pending.take() {
        Some((titles, continuation)) => (titles, Some(continuation)),
        None => match pager.batches.pop_front() {
            Some(titles) => (titles, None),
            None => return Ok(None),
        },
    };

    let page = pager
        .client
        .query_links(pager.prop, &titles, continuation.as_ref())
        .await?;

    if let Some(next) = page.continuation {
        if continuation.as_ref() == Some(&next) {
            return Err(LinkSourceError::Malformed(format!(
                "continuation {:?} did not advance",
                next.token(pager.prop).unwrap_or_default()
            )));
        }
        pager.pending = Some((titles, next));
    }
    Ok(Some((page.links, pager)))
}

#[async_trait]
impl LinkSource for MediaWikiClient {
    fn fetch_links(&self, titles: Vec<String>, direction: LinkDirection) -> LinkStream {
        let pager = Pager {
            client: self.clone(),
            prop: LinkProp::for_direction(direction),
            batches: batch(&titles, self.config.effective_batch_size()).into(),
            pending: None,
        };
        stream::try_unfold(pager, next_page).boxed()
    }

    async fn resolve_title(&self, title: &str) -> Result<Option<String>, LinkSourceError> {
        let url = build_resolve_url(&self.config.endpoint, title)?;
        let body = self.get(url).await?;
        let resolved = parse_resolved_title(&body, title)?;
        tracing::debug!(
            event = "mediawiki.resolve.completed",
            requested = title,
            resolved = resolved.as_deref().unwrap_or_default(),
            "title resolved"
        );
        Ok(resolved)
    }
}
