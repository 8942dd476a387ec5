//! Bidirectional breadth-first search between two titles.
//!
//! Two explorations run as separate tasks: one forward from the start over outgoing
//! links, one backward from the end over incoming links. Each drains its frontier
//! one generation at a time, fetches that generation's links to completion, and
//! checks every newly reached node against the opposite frontier. The first side to
//! see a shared node wins; a cancellation token then stops the other side before
//! it issues further fetches.

mod explore;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, SearchError};
use crate::filter::Denylist;
use crate::frontier::Frontier;
use crate::path::build_path;
use crate::source::{LinkDirection, LinkSource};
use crate::title::normalize_title;

use explore::{Exploration, ExplorationOutcome, ExplorationReport};

/// Knobs for one search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Titles whose edges are ignored in both directions.
    pub denylist: Denylist,
    /// Give up with [`SearchError::DeadlineExceeded`] after this long.
    pub deadline: Option<Duration>,
}

/// Work done by one side of the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExplorationStats {
    /// Generations drained and fetched.
    pub generations: usize,
    /// Link pages consumed.
    pub pages: usize,
    /// Nodes newly recorded (roots excluded).
    pub recorded: usize,
}

/// A found path plus how the search got there.
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Titles from start to end inclusive.
    pub path: Vec<String>,
    /// Node where the two frontiers met.
    pub midpoint: String,
    /// Forward (start side) statistics.
    pub forward: ExplorationStats,
    /// Backward (end side) statistics.
    pub backward: ExplorationStats,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

impl SearchReport {
    /// Number of links followed.
    #[must_use]
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Path finder over a [`LinkSource`].
pub struct BidirectionalSearch<S: ?Sized> {
    source: Arc<S>,
    options: SearchOptions,
}

impl<S> BidirectionalSearch<S>
where
    S: LinkSource + ?Sized + 'static,
{
    /// Search with default options (built-in denylist, no deadline).
    #[must_use]
    pub fn new(source: Arc<S>) -> Self {
        Self::with_options(source, SearchOptions::default())
    }

    /// Search with explicit options.
    #[must_use]
    pub fn with_options(source: Arc<S>, options: SearchOptions) -> Self {
        Self { source, options }
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Find a short chain of links from `start` to `end`.
    ///
    /// # Errors
    /// [`SearchError::InvalidInput`] for blank titles, [`SearchError::NoPathFound`]
    /// when one side runs out of nodes, [`SearchError::SourceUnavailable`] when the
    /// link source fails, [`SearchError::DeadlineExceeded`] when the deadline hits.
    pub async fn search(&self, start: &str, end: &str) -> Result<Vec<String>> {
        Ok(self.search_with_report(start, end).await?.path)
    }

    /// Like [`Self::search`], returning statistics alongside the path.
    ///
    /// # Errors
    /// Same as [`Self::search`].
    pub async fn search_with_report(&self, start: &str, end: &str) -> Result<SearchReport> {
        let from = normalize_title(start);
        if from.is_empty() {
            return Err(SearchError::InvalidInput("start title is empty".to_string()));
        }
        let to = normalize_title(end);
        if to.is_empty() {
            return Err(SearchError::InvalidInput("end title is empty".to_string()));
        }

        let started = Instant::now();
        tracing::info!(
            event = "search.started",
            from = from.as_str(),
            to = to.as_str(),
            "searching for a path"
        );

        if from == to {
            return Ok(SearchReport {
                path: vec![from.clone()],
                midpoint: from,
                forward: ExplorationStats::default(),
                backward: ExplorationStats::default(),
                elapsed: started.elapsed(),
            });
        }

        let report = match self.options.deadline {
            Some(limit) => tokio::time::timeout(limit, self.race(&from, &to, started))
                .await
                .unwrap_or(Err(SearchError::DeadlineExceeded(limit))),
            None => self.race(&from, &to, started).await,
        };

        match &report {
            Ok(found) => tracing::info!(
                event = "search.completed",
                hops = found.hops(),
                midpoint = found.midpoint.as_str(),
                elapsed_ms = found.elapsed.as_millis(),
                "path found"
            ),
            Err(error) => tracing::info!(
                event = "search.failed",
                error = %error,
                elapsed_ms = started.elapsed().as_millis(),
                "search ended without a path"
            ),
        }
        report
    }

    async fn race(&self, from: &str, to: &str, started: Instant) -> Result<SearchReport> {
        let forward = Arc::new(Frontier::with_root(from));
        let backward = Arc::new(Frontier::with_root(to));
        let denylist = Arc::new(self.options.denylist.clone());
        let cancel = CancellationToken::new();
        // Dropping this future (deadline, caller gave up) stops both sides too.
        let _cancel_on_drop = cancel.clone().drop_guard();

        let mut explorations = JoinSet::new();
        for direction in [LinkDirection::Outgoing, LinkDirection::Incoming] {
            let (own, other) = match direction {
                LinkDirection::Outgoing => (Arc::clone(&forward), Arc::clone(&backward)),
                LinkDirection::Incoming => (Arc::clone(&backward), Arc::clone(&forward)),
            };
            let exploration =
                Exploration::new(direction, own, other, Arc::clone(&denylist), cancel.clone());
            explorations.spawn(exploration.run(Arc::clone(&self.source)));
        }

        let mut forward_stats = ExplorationStats::default();
        let mut backward_stats = ExplorationStats::default();
        let mut decided: Option<Result<String>> = None;

        while let Some(joined) = explorations.join_next().await {
            let report: ExplorationReport = match joined {
                Ok(Ok(report)) => report,
                Ok(Err(error)) => {
                    if decided.is_none() {
                        cancel.cancel();
                        decided = Some(Err(SearchError::SourceUnavailable(error)));
                    }
                    continue;
                }
                Err(join_error) => {
                    if decided.is_none() {
                        cancel.cancel();
                        decided = Some(Err(SearchError::Internal(join_error.to_string())));
                    }
                    continue;
                }
            };

            match report.direction {
                LinkDirection::Outgoing => forward_stats = report.stats,
                LinkDirection::Incoming => backward_stats = report.stats,
            }
            if decided.is_some() {
                continue;
            }
            match report.outcome {
                ExplorationOutcome::Met(midpoint) => {
                    cancel.cancel();
                    decided = Some(Ok(midpoint));
                }
                ExplorationOutcome::Exhausted => {
                    // An exhausted side has recorded everything reachable from its root
                    // and checked each node against the other side, so no meeting
                    // point can appear later.
                    cancel.cancel();
                    let side = match report.direction {
                        LinkDirection::Outgoing => "forward",
                        LinkDirection::Incoming => "backward",
                    };
                    decided = Some(Err(SearchError::NoPathFound {
                        from: from.to_string(),
                        to: to.to_string(),
                        reason: format!(
                            "{side} search exhausted after {} generation(s) and {} \
                             discovered page(s)",
                            report.stats.generations, report.stats.recorded
                        ),
                    }));
                }
                ExplorationOutcome::Cancelled => {}
            }
        }

        let midpoint = match decided {
            Some(outcome) => outcome?,
            None => {
                return Err(SearchError::Internal(
                    "both explorations stopped without an outcome".to_string(),
                ));
            }
        };

        let path = build_path(&midpoint, &forward, &backward);
        Ok(SearchReport {
            path,
            midpoint,
            forward: forward_stats,
            backward: backward_stats,
            elapsed: started.elapsed(),
        })
    }
}
