//! Wikirace search engine.
//!
//! Treats pages as nodes of an implicit directed graph whose edges are discovered
//! lazily through a [`LinkSource`], and finds a short chain of links between two
//! titles with a concurrent bidirectional breadth-first search.
//!
//! ```no_run
//! use std::sync::Arc;
//! use wikirace_core::{BidirectionalSearch, MemoryLinkSource};
//!
//! # async fn demo() -> wikirace_core::Result<()> {
//! let source = Arc::new(MemoryLinkSource::with_edges([("Apple", "Fruit"), ("Fruit", "Banana")]));
//! let path = BidirectionalSearch::new(source).search("Apple", "Banana").await?;
//! assert_eq!(path, ["Apple", "Fruit", "Banana"]);
//! # Ok(())
//! # }
//! ```

mod error;
mod filter;
mod frontier;
mod path;
mod search;
mod source;
mod title;

pub use error::{LinkSourceError, Result, SearchError};
pub use filter::{DEFAULT_DENYLIST, Denylist};
pub use frontier::Frontier;
pub use path::build_path;
pub use search::{BidirectionalSearch, ExplorationStats, SearchOptions, SearchReport};
pub use source::{LinkDirection, LinkMap, LinkSource, LinkStream, MemoryLinkSource};
pub use title::normalize_title;
