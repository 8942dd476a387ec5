#![allow(missing_docs)]

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wikirace_core::{
    BidirectionalSearch, Denylist, LinkDirection, LinkMap, LinkSource, LinkSourceError, LinkStream,
    MemoryLinkSource, SearchError, SearchOptions,
};

fn search_over(source: MemoryLinkSource) -> BidirectionalSearch<MemoryLinkSource> {
    BidirectionalSearch::new(Arc::new(source))
}

#[tokio::test]
async fn direct_link_is_found() {
    let search = search_over(MemoryLinkSource::with_edges([
        ("Apple", "Fruit"),
        ("Apple", "Banana"),
    ]));

    let path = search.search("Apple", "Banana").await.expect("path");
    assert_eq!(path, ["Apple", "Banana"]);
}

#[tokio::test]
async fn chain_through_both_sides_is_found() {
    let search = search_over(MemoryLinkSource::with_edges([
        ("A", "B"),
        ("B", "C"),
        ("C", "D"),
        ("D", "E"),
    ]));

    let report = search.search_with_report("A", "E").await.expect("path");
    assert_eq!(report.path, ["A", "B", "C", "D", "E"]);
    assert_eq!(report.hops(), 4);
    assert!(report.path.contains(&report.midpoint));
}

#[tokio::test]
async fn titles_are_normalized_before_searching() {
    let search = search_over(MemoryLinkSource::with_edges([("Mike Tyson", "Boxing")]));

    let path = search.search(" mike_Tyson", "boxing").await.expect("path");
    assert_eq!(path, ["Mike Tyson", "Boxing"]);
}

#[tokio::test]
async fn same_start_and_end_needs_no_fetch() {
    let source = Arc::new(MemoryLinkSource::new());
    let search = BidirectionalSearch::new(Arc::clone(&source));

    let path = search.search("Apple", "apple").await.expect("path");
    assert_eq!(path, ["Apple"]);
    assert_eq!(source.fetch_count(LinkDirection::Outgoing), 0);
    assert_eq!(source.fetch_count(LinkDirection::Incoming), 0);
}

#[tokio::test]
async fn blank_titles_are_rejected_before_fetching() {
    let source = Arc::new(MemoryLinkSource::with_edges([("A", "B")]));
    let search = BidirectionalSearch::new(Arc::clone(&source));

    let start = search.search("  ", "B").await.expect_err("blank start");
    assert!(matches!(start, SearchError::InvalidInput(_)), "{start}");
    let end = search.search("A", "_").await.expect_err("blank end");
    assert!(matches!(end, SearchError::InvalidInput(_)), "{end}");
    assert_eq!(source.fetch_count(LinkDirection::Outgoing), 0);
}

#[tokio::test]
async fn disconnected_graph_reports_no_path() {
    let search = search_over(MemoryLinkSource::with_edges([
        ("A", "B"),
        ("B", "C"),
        ("X", "Y"),
        ("Y", "Z"),
    ]));

    let error = search.search("A", "Z").await.expect_err("no path");
    match error {
        SearchError::NoPathFound { from, to, reason } => {
            assert_eq!(from, "A");
            assert_eq!(to, "Z");
            assert!(reason.contains("exhausted"), "{reason}");
        }
        other => panic!("expected NoPathFound, got {other}"),
    }
}

#[tokio::test]
async fn isolated_start_reports_no_path() {
    let search = search_over(MemoryLinkSource::new());

    let error = search.search("Nowhere", "Elsewhere").await.expect_err("no path");
    assert!(matches!(error, SearchError::NoPathFound { .. }), "{error}");
}

#[tokio::test]
async fn edges_against_link_direction_do_not_count() {
    // B links to A, but nothing links from A toward B.
    let search = search_over(MemoryLinkSource::with_edges([("B", "A")]));

    let error = search.search("A", "B").await.expect_err("no path");
    assert!(matches!(error, SearchError::NoPathFound { .. }), "{error}");
}

#[tokio::test]
async fn self_loops_and_denylisted_pages_are_never_used() {
    let search = search_over(MemoryLinkSource::with_edges([
        ("A", "A"),
        ("A", "MusicBrainz"),
        ("MusicBrainz", "B"),
        ("B", "B"),
    ]));

    let error = search.search("A", "B").await.expect_err("only route is denylisted");
    assert!(matches!(error, SearchError::NoPathFound { .. }), "{error}");
}

#[tokio::test]
async fn denylist_steers_around_boring_pages() {
    let edges = [
        ("Apple", "Digital object identifier"),
        ("Digital object identifier", "Banana"),
        ("Apple", "Orchard"),
        ("Orchard", "Tree"),
        ("Tree", "Banana"),
    ];

    let default = search_over(MemoryLinkSource::with_edges(edges));
    let path = default.search("Apple", "Banana").await.expect("path");
    assert_eq!(path, ["Apple", "Orchard", "Tree", "Banana"]);

    let unfiltered = BidirectionalSearch::with_options(
        Arc::new(MemoryLinkSource::with_edges(edges)),
        SearchOptions {
            denylist: Denylist::empty(),
            deadline: None,
        },
    );
    let path = unfiltered.search("Apple", "Banana").await.expect("path");
    assert_eq!(path, ["Apple", "Digital object identifier", "Banana"]);
}

#[tokio::test]
async fn custom_denylist_applies_to_both_directions() {
    let edges = [("A", "Hub"), ("Hub", "Z"), ("A", "M"), ("M", "N"), ("N", "Z")];
    let search = BidirectionalSearch::with_options(
        Arc::new(MemoryLinkSource::with_edges(edges)),
        SearchOptions {
            denylist: Denylist::from_titles(["Hub"]),
            deadline: None,
        },
    );

    let path = search.search("A", "Z").await.expect("path");
    assert_eq!(path, ["A", "M", "N", "Z"]);
}

#[tokio::test]
async fn every_page_of_a_generation_is_consumed() {
    let source = Arc::new(
        MemoryLinkSource::with_edges([
            ("A", "B1"),
            ("A", "B2"),
            ("A", "B3"),
            ("B3", "C"),
            ("C", "D"),
        ])
        .with_page_size(1),
    );
    let search = BidirectionalSearch::new(Arc::clone(&source));

    let report = search.search_with_report("A", "D").await.expect("path");
    assert_eq!(report.path, ["A", "B3", "C", "D"]);
    assert!(source.pages_served() >= 3);
}

#[tokio::test]
async fn source_failure_is_propagated() {
    let search = search_over(
        MemoryLinkSource::with_edges([("A", "B"), ("B", "Z")])
            .with_failure("A")
            .with_failure("Z"),
    );

    let error = search.search("A", "Z").await.expect_err("source failure");
    assert!(matches!(error, SearchError::SourceUnavailable(_)), "{error}");
}

#[tokio::test]
async fn deadline_stops_a_slow_search() {
    let source = MemoryLinkSource::with_edges([("A", "B"), ("B", "C"), ("C", "D")])
        .with_page_delay(Duration::from_millis(500));
    let search = BidirectionalSearch::with_options(
        Arc::new(source),
        SearchOptions {
            deadline: Some(Duration::from_millis(50)),
            ..SearchOptions::default()
        },
    );

    let error = search.search("A", "D").await.expect_err("deadline");
    assert!(matches!(error, SearchError::DeadlineExceeded(_)), "{error}");
}

/// Outgoing links come from a small fixed map; incoming links are an endless chain
/// of fresh titles, so the backward side can never finish on its own.
struct EndlessBackward {
    incoming_fetches: Arc<AtomicUsize>,
}

#[async_trait]
impl LinkSource for EndlessBackward {
    fn fetch_links(&self, titles: Vec<String>, direction: LinkDirection) -> LinkStream {
        match direction {
            LinkDirection::Outgoing => {
                let mut page = LinkMap::new();
                for title in &titles {
                    if title == "Start" {
                        page.add("Start", "Middle");
                    }
                    if title == "Middle" {
                        page.add("Middle", "End");
                    }
                }
                futures::stream::once(async move { Ok::<_, LinkSourceError>(page) }).boxed()
            }
            LinkDirection::Incoming => {
                self.incoming_fetches.fetch_add(1, Ordering::SeqCst);
                futures::stream::iter(titles)
                    .then(|title| async move {
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        let mut page = LinkMap::new();
                        page.add(title.clone(), format!("{title}'"));
                        Ok::<_, LinkSourceError>(page)
                    })
                    .boxed()
            }
        }
    }
}

#[tokio::test]
async fn winner_cancels_the_other_side() {
    let incoming_fetches = Arc::new(AtomicUsize::new(0));
    let search = BidirectionalSearch::new(Arc::new(EndlessBackward {
        incoming_fetches: Arc::clone(&incoming_fetches),
    }));

    let path = tokio::time::timeout(Duration::from_secs(5), search.search("Start", "End"))
        .await
        .expect("search must not wait for the endless side")
        .expect("path");
    assert_eq!(path, ["Start", "Middle", "End"]);

    let fetches_at_finish = incoming_fetches.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(
        incoming_fetches.load(Ordering::SeqCst),
        fetches_at_finish,
        "backward side kept fetching after the search returned"
    );
}

#[tokio::test]
async fn random_graphs_yield_valid_paths() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let boring = "MusicBrainz";

    for _ in 0..200 {
        let nodes: Vec<String> = (0..12).map(|i| format!("N{i}")).collect();
        let mut edges: Vec<(String, String)> = Vec::new();
        for _ in 0..30 {
            let from = &nodes[rng.gen_range(0..nodes.len())];
            let to = if rng.gen_bool(0.1) {
                boring.to_string()
            } else {
                nodes[rng.gen_range(0..nodes.len())].clone()
            };
            edges.push((from.clone(), to.clone()));
            if to == boring {
                edges.push((boring.to_string(), nodes[rng.gen_range(0..nodes.len())].clone()));
            }
        }
        let edge_set: HashSet<(String, String)> = edges.iter().cloned().collect();
        let source = MemoryLinkSource::with_edges(
            edges.iter().map(|(from, to)| (from.as_str(), to.as_str())),
        )
        .with_page_size(rng.gen_range(1..5));
        let search = search_over(source);

        let reachable = reaches(&edges, &Denylist::default(), "N0", "N11");
        match search.search("N0", "N11").await {
            Ok(path) => {
                assert!(reachable, "path {path:?} found where none exists");
                assert_eq!(path.first().map(String::as_str), Some("N0"));
                assert_eq!(path.last().map(String::as_str), Some("N11"));
                let unique: HashSet<&String> = path.iter().collect();
                assert_eq!(unique.len(), path.len(), "duplicate node in {path:?}");
                assert!(!path.iter().any(|title| title == boring), "{path:?}");
                for pair in path.windows(2) {
                    assert!(
                        edge_set.contains(&(pair[0].clone(), pair[1].clone())),
                        "{} -> {} is not an edge of the graph",
                        pair[0],
                        pair[1]
                    );
                }
            }
            Err(SearchError::NoPathFound { reason, .. }) => {
                assert!(!reachable, "N11 is reachable from N0, yet: {reason}");
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}

/// Plain breadth-first reachability over the edges the denylist admits.
fn reaches(edges: &[(String, String)], denylist: &Denylist, start: &str, end: &str) -> bool {
    let mut seen: HashSet<&str> = HashSet::from([start]);
    let mut queue: VecDeque<&str> = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        if node == end {
            return true;
        }
        for (from, to) in edges {
            if from == node && denylist.admits(from, to) && seen.insert(to.as_str()) {
                queue.push_back(to.as_str());
            }
        }
    }
    false
}
