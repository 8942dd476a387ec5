//! Path reconstruction from the two predecessor chains.

use crate::frontier::Frontier;

/// Materialize the start-to-end path through `midpoint`.
///
/// The forward chain is walked from `midpoint` back to the start root and reversed;
/// the backward chain is walked from `midpoint` on to the end root. `midpoint`
/// appears exactly once.
#[must_use]
pub fn build_path(midpoint: &str, forward: &Frontier, backward: &Frontier) -> Vec<String> {
    let mut path = walk(midpoint, forward);
    path.reverse();
    path.extend(walk(midpoint, backward).into_iter().skip(1));
    path
}

/// `node`, its predecessor, that one's predecessor, and so on up to the root.
fn walk(node: &str, frontier: &Frontier) -> Vec<String> {
    let mut chain = vec![node.to_string()];
    let mut cursor = frontier.predecessor_of(node);
    while let Some(next) = cursor {
        // Each node is recorded once, so a chain can never be longer than the frontier.
        if chain.len() > frontier.len() {
            break;
        }
        cursor = frontier.predecessor_of(&next);
        chain.push(next);
    }
    chain
}
