//! Per-direction search bookkeeping: who discovered whom, and what to expand next.

use std::sync::{Mutex, PoisonError};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Discovered nodes with their predecessor, plus the pending breadth-first queue.
///
/// Every operation is individually atomic, so one exploration can write while the
/// opposite exploration reads. A root maps to `None`; every other node maps to the
/// node it was first reached from, which is never overwritten.
#[derive(Debug, Default)]
pub struct Frontier {
    predecessors: DashMap<String, Option<String>>,
    queue: Mutex<Vec<String>>,
}

impl Frontier {
    /// Empty frontier with no root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frontier with `root` recorded (no predecessor) and queued for expansion.
    #[must_use]
    pub fn with_root(root: &str) -> Self {
        let frontier = Self::new();
        if frontier.record_root(root) {
            frontier.enqueue(root.to_string());
        }
        frontier
    }

    /// Record `root` with no predecessor. Returns false if it was already recorded.
    pub fn record_root(&self, root: &str) -> bool {
        self.insert_if_vacant(root, None)
    }

    /// Record `predecessor` for `node` unless `node` already has an entry.
    ///
    /// Returns whether this call performed the recording; the caller enqueues the
    /// node only in that case.
    pub fn try_record(&self, node: &str, predecessor: &str) -> bool {
        self.insert_if_vacant(node, Some(predecessor.to_string()))
    }

    fn insert_if_vacant(&self, node: &str, predecessor: Option<String>) -> bool {
        match self.predecessors.entry(node.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(predecessor);
                true
            }
        }
    }

    /// Whether `node` has been recorded in this direction.
    #[must_use]
    pub fn contains(&self, node: &str) -> bool {
        self.predecessors.contains_key(node)
    }

    /// Predecessor of `node`; `None` for a root or an unrecorded node.
    #[must_use]
    pub fn predecessor_of(&self, node: &str) -> Option<String> {
        self.predecessors
            .get(node)
            .and_then(|entry| entry.value().clone())
    }

    /// Queue `node` for the next generation.
    pub fn enqueue(&self, node: String) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(node);
    }

    /// Take the whole queue, leaving it empty. Nodes enqueued afterwards show up in
    /// the next drain.
    pub fn drain_queue(&self) -> Vec<String> {
        std::mem::take(&mut *self.queue.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of nodes waiting for the next drain.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of recorded nodes, roots included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.predecessors.len()
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predecessors.is_empty()
    }
}
