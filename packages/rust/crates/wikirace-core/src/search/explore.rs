//! One side of the bidirectional search.

use std::ops::ControlFlow;
use std::sync::Arc;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use super::ExplorationStats;
use crate::error::LinkSourceError;
use crate::filter::Denylist;
use crate::frontier::Frontier;
use crate::source::{LinkDirection, LinkMap, LinkSource};

/// How an exploration stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExplorationOutcome {
    /// A node recorded on this side is also recorded on the other side.
    Met(String),
    /// The queue drained empty: every node reachable on this side was expanded.
    Exhausted,
    /// The shared token was cancelled, usually because the other side finished first.
    Cancelled,
}

#[derive(Debug)]
pub(crate) struct ExplorationReport {
    pub(crate) direction: LinkDirection,
    pub(crate) outcome: ExplorationOutcome,
    pub(crate) stats: ExplorationStats,
}

/// Level-synchronous breadth-first expansion of `own`, watching `other` for a
/// meeting point.
///
/// `Outgoing` expands forward from the start: an edge `queried -> linked` records
/// `linked` with `queried` as predecessor. `Incoming` expands backward from the end:
/// an edge `linked -> queried` records `linked` with `queried` as predecessor, so
/// predecessors always point toward this side's root.
pub(crate) struct Exploration {
    direction: LinkDirection,
    own: Arc<Frontier>,
    other: Arc<Frontier>,
    denylist: Arc<Denylist>,
    cancel: CancellationToken,
    stats: ExplorationStats,
}

impl Exploration {
    pub(crate) fn new(
        direction: LinkDirection,
        own: Arc<Frontier>,
        other: Arc<Frontier>,
        denylist: Arc<Denylist>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            direction,
            own,
            other,
            denylist,
            cancel,
            stats: ExplorationStats::default(),
        }
    }

    pub(crate) async fn run<S>(
        mut self,
        source: Arc<S>,
    ) -> Result<ExplorationReport, LinkSourceError>
    where
        S: LinkSource + ?Sized,
    {
        let outcome = loop {
            if self.cancel.is_cancelled() {
                break ExplorationOutcome::Cancelled;
            }
            let generation = self.own.drain_queue();
            if generation.is_empty() {
                tracing::debug!(
                    event = "search.exploration.exhausted",
                    direction = %self.direction,
                    generations = self.stats.generations,
                    recorded = self.stats.recorded,
                    "queue is empty; nothing left to expand"
                );
                break ExplorationOutcome::Exhausted;
            }
            self.stats.generations += 1;
            tracing::debug!(
                event = "search.exploration.generation",
                direction = %self.direction,
                generation = self.stats.generations,
                size = generation.len(),
                "expanding generation: {generation:?}"
            );

            let mut pages = source.fetch_links(generation, self.direction);
            let finished = loop {
                let next = tokio::select! {
                    biased;
                    () = self.cancel.cancelled() => {
                        break ControlFlow::Break(ExplorationOutcome::Cancelled);
                    }
                    next = pages.next() => next,
                };
                let Some(page) = next else {
                    break ControlFlow::Continue(());
                };
                self.stats.pages += 1;
                if let ControlFlow::Break(outcome) = self.absorb(&page?) {
                    break ControlFlow::Break(outcome);
                }
            };
            if let ControlFlow::Break(outcome) = finished {
                break outcome;
            }
        };

        Ok(ExplorationReport {
            direction: self.direction,
            outcome,
            stats: self.stats,
        })
    }

    /// Record every admissible edge of one page, stopping at the first meeting point.
    fn absorb(&mut self, page: &LinkMap) -> ControlFlow<ExplorationOutcome> {
        for (queried, linked) in page.iter() {
            if !self.own.contains(queried) {
                tracing::warn!(
                    event = "search.exploration.unexpected_title",
                    direction = %self.direction,
                    title = queried,
                    "link source answered for a title that was never queued; skipping"
                );
                continue;
            }
            for title in linked {
                if self.cancel.is_cancelled() {
                    return ControlFlow::Break(ExplorationOutcome::Cancelled);
                }
                let (from, to) = match self.direction {
                    LinkDirection::Outgoing => (queried, title.as_str()),
                    LinkDirection::Incoming => (title.as_str(), queried),
                };
                if !self.denylist.admits(from, to) {
                    continue;
                }
                if self.own.try_record(title, queried) {
                    self.stats.recorded += 1;
                    tracing::debug!(
                        event = "search.exploration.edge",
                        direction = %self.direction,
                        from,
                        to,
                        "recorded {from:?} -> {to:?}"
                    );
                    self.own.enqueue(title.clone());
                }
                if self.other.contains(title) {
                    tracing::debug!(
                        event = "search.exploration.met",
                        direction = %self.direction,
                        midpoint = title.as_str(),
                        "frontiers meet"
                    );
                    return ControlFlow::Break(ExplorationOutcome::Met(title.clone()));
                }
            }
        }
        ControlFlow::Continue(())
    }
}
