//! MediaWiki link source for wikirace.
//!
//! Answers outgoing links with `prop=links` and incoming links with
//! `prop=linkshere`, 50 titles per request, following `continue` tokens until
//! every page of every batch has been yielded.

mod client;
mod config;
mod query;
mod response;

pub use client::MediaWikiClient;
pub use config::{
    DEFAULT_ENDPOINT, DEFAULT_NAMESPACES, DEFAULT_USER_AGENT, MAX_TITLES_PER_QUERY,
    MediaWikiConfig,
};
pub use query::{LinkProp, batch, build_query_url, build_resolve_url};
pub use response::{Continuation, LinksPage, parse_links_response, parse_resolved_title};
