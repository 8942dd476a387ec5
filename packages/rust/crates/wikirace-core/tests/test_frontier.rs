#![allow(missing_docs)]

use std::sync::Arc;

use rand::Rng;
use wikirace_core::Frontier;

#[test]
fn first_recording_wins() {
    let frontier = Frontier::with_root("A");
    assert!(frontier.try_record("B", "A"));
    assert!(!frontier.try_record("B", "Z"));
    assert_eq!(frontier.predecessor_of("B").as_deref(), Some("A"));
}

#[test]
fn root_cannot_be_given_a_predecessor() {
    let frontier = Frontier::with_root("A");
    assert!(!frontier.try_record("A", "B"));
    assert!(frontier.contains("A"));
    assert_eq!(frontier.predecessor_of("A"), None);
}

#[test]
fn unknown_node_has_no_predecessor() {
    let frontier = Frontier::with_root("A");
    assert!(!frontier.contains("Q"));
    assert_eq!(frontier.predecessor_of("Q"), None);
}

#[test]
fn with_root_queues_the_root() {
    let frontier = Frontier::with_root("A");
    assert_eq!(frontier.len(), 1);
    assert_eq!(frontier.queued(), 1);
    assert_eq!(frontier.drain_queue(), vec!["A"]);
}

#[test]
fn second_drain_is_empty() {
    let frontier = Frontier::new();
    frontier.enqueue("A".to_string());
    frontier.enqueue("B".to_string());
    assert_eq!(frontier.drain_queue(), vec!["A", "B"]);
    assert!(frontier.drain_queue().is_empty());
}

#[test]
fn enqueue_after_drain_lands_in_next_drain() {
    let frontier = Frontier::with_root("A");
    let first = frontier.drain_queue();
    frontier.enqueue("B".to_string());
    assert_eq!(first, vec!["A"]);
    assert_eq!(frontier.drain_queue(), vec!["B"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_recorders_store_exactly_one_predecessor() {
    let frontier = Arc::new(Frontier::with_root("root"));
    let mut handles = Vec::new();
    for worker in 0..8 {
        let frontier = Arc::clone(&frontier);
        handles.push(tokio::spawn(async move {
            let predecessor = format!("p{worker}");
            let mut won = 0usize;
            for node in 0..200 {
                if frontier.try_record(&format!("n{node}"), &predecessor) {
                    won += 1;
                }
                tokio::task::yield_now().await;
            }
            won
        }));
    }

    let mut total = 0;
    for handle in handles {
        total += handle.await.expect("recorder task");
    }
    assert_eq!(total, 200, "every node is recorded exactly once");
    assert_eq!(frontier.len(), 201);
    for node in 0..200 {
        let predecessor = frontier
            .predecessor_of(&format!("n{node}"))
            .expect("recorded node has a predecessor");
        assert!(predecessor.starts_with('p'));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_enqueue_and_drain_lose_nothing() {
    let frontier = Arc::new(Frontier::new());
    let producer = {
        let frontier = Arc::clone(&frontier);
        tokio::spawn(async move {
            for node in 0..1_000 {
                frontier.enqueue(format!("n{node}"));
                if node % 17 == 0 {
                    tokio::task::yield_now().await;
                }
            }
        })
    };

    let mut drained = Vec::new();
    while !producer.is_finished() {
        drained.extend(frontier.drain_queue());
        tokio::task::yield_now().await;
    }
    producer.await.expect("producer task");
    drained.extend(frontier.drain_queue());

    assert_eq!(drained.len(), 1_000);
    let expected: Vec<String> = (0..1_000).map(|node| format!("n{node}")).collect();
    assert_eq!(drained, expected, "drains preserve enqueue order");
}

/// Both sides record the same title and then look at the other side, under
/// randomized scheduling. Whenever a side announces a meeting point, both
/// frontiers must actually contain it, and at least one side must see it.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn meeting_point_is_always_in_both_frontiers() {
    let mut rng = rand::thread_rng();
    for round in 0..500 {
        let forward = Arc::new(Frontier::with_root("Start"));
        let backward = Arc::new(Frontier::with_root("End"));
        let shared = format!("Shared {round}");

        let mut sides = Vec::new();
        for (own, other, via) in [
            (Arc::clone(&forward), Arc::clone(&backward), "Start"),
            (Arc::clone(&backward), Arc::clone(&forward), "End"),
        ] {
            let yields: usize = rng.gen_range(0..4);
            let shared = shared.clone();
            sides.push(tokio::spawn(async move {
                for _ in 0..yields {
                    tokio::task::yield_now().await;
                }
                own.try_record(&shared, via);
                other.contains(&shared).then_some(shared)
            }));
        }

        let mut announced = 0;
        for side in sides {
            if let Some(midpoint) = side.await.expect("side task") {
                announced += 1;
                assert!(forward.contains(&midpoint));
                assert!(backward.contains(&midpoint));
            }
        }
        assert!(announced >= 1, "round {round}: meeting went unnoticed");
    }
}
