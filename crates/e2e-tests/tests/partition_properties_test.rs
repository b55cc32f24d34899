//! Property tests for the clustering pipeline over randomized conversations.
//!
//! E2E-01: Topics are pairwise disjoint for any input
//! E2E-02: Assigned ids never exceed the clusterable message count
//! E2E-03: Runs against fresh indexes are reproducible
//! E2E-04: Seed cap and seed order
//! E2E-05: A seed not claimed earlier leads its own topic

use std::collections::HashSet;

use flow_vector::index::VectorIndex;

use pretty_assertions::assert_eq;

use e2e_tests::{
    assert_disjoint, assigned_count, clusterable_count, memory_index, pipeline, pipeline_with,
    random_messages,
};
use flow_topics::{build_flows, FlowBuilder, SeedExtractor};
use flow_types::{ClusterConfig, Message, Role};

/// E2E-01 / E2E-02: disjointness and coverage bound across many inputs,
/// including neighbor counts smaller than the conversation.
#[test]
fn test_random_conversations_disjoint_and_bounded() {
    for neighbors in [1, 3, 50] {
        let pipeline = pipeline_with(ClusterConfig {
            neighbors,
            ..Default::default()
        });

        for seed in 0..25u64 {
            let messages = random_messages(seed, (seed as usize * 3) % 45);
            let mut index = memory_index();
            let topics = pipeline.cluster(&messages, &mut index).unwrap();

            assert_disjoint(&topics);
            assert!(assigned_count(&topics) <= clusterable_count(&messages));
        }
    }
}

/// With enough neighbors and at least one seed, every clusterable message
/// lands in exactly one topic.
#[test]
fn test_full_coverage_when_neighbors_exceed_messages() {
    let pipeline = pipeline();
    for seed in 100..110u64 {
        let mut messages = random_messages(seed, 30);
        messages.insert(0, Message::new("anchor", Role::User, "login session token"));

        let mut index = memory_index();
        let topics = pipeline.cluster(&messages, &mut index).unwrap();

        let assigned: HashSet<&str> = topics
            .iter()
            .flat_map(|t| t.ids.iter().map(String::as_str))
            .collect();
        let expected: HashSet<&str> = messages
            .iter()
            .filter(|m| m.is_clusterable())
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(assigned, expected);
    }
}

/// E2E-03: identical input, fresh index each time, identical output.
#[test]
fn test_determinism_across_fresh_indexes() {
    let pipeline = pipeline();
    let builder = FlowBuilder::sequential("flow");

    for seed in 0..10u64 {
        let messages = random_messages(seed, 40);

        let mut first_index = memory_index();
        let first = pipeline.run(&messages, &mut first_index, &builder).unwrap();
        let mut second_index = memory_index();
        let second = pipeline.run(&messages, &mut second_index, &builder).unwrap();

        assert_eq!(first.seeds, second.seeds);
        assert_eq!(first.topics, second.topics);
        assert_eq!(first.flows, second.flows);
    }
}

/// Equal similarity scores resolve by insertion order.
#[test]
fn test_identical_texts_resolve_by_insertion_order() {
    let messages = vec![
        Message::new("s", Role::User, "cache latency"),
        Message::new("x", Role::Assistant, "cache latency"),
        Message::new("y", Role::Assistant, "cache latency"),
        Message::new("z", Role::Assistant, "cache latency"),
    ];
    let pipeline = pipeline_with(ClusterConfig {
        neighbors: 3,
        ..Default::default()
    });

    let mut index = memory_index();
    let topics = pipeline.cluster(&messages, &mut index).unwrap();
    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].ids, vec!["s", "x", "y"]);
}

/// E2E-04: more than 12 qualifying user messages gives exactly 12 seeds,
/// in original order.
#[test]
fn test_seed_cap() {
    let mut messages = Vec::new();
    for i in 0..20 {
        messages.push(Message::new(
            format!("u{}", i),
            Role::User,
            &format!("question {} about deploy", i),
        ));
        messages.push(Message::new(format!("a{}", i), Role::Assistant, "answer"));
    }

    let seeds = SeedExtractor::default().extract(&messages);
    assert_eq!(seeds.len(), 12);
    let ids: Vec<&str> = seeds.iter().map(|s| s.id.as_str()).collect();
    let expected: Vec<String> = (0..12).map(|i| format!("u{}", i)).collect();
    assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());

    let mut index = memory_index();
    let topics = pipeline().cluster(&messages, &mut index).unwrap();
    assert_eq!(topics.len(), 12);
}

/// Blank user messages do not count toward the cap.
#[test]
fn test_blank_user_messages_not_seeds() {
    let messages = vec![
        Message::new("1", Role::User, "   "),
        Message::new("2", Role::User, "Deploy to staging"),
    ];
    let seeds = SeedExtractor::default().extract(&messages);
    assert_eq!(seeds.len(), 1);
    assert_eq!(seeds[0].id, "2");
}

#[test]
fn test_empty_input() {
    let mut index = memory_index();
    let topics = pipeline().cluster(&[], &mut index).unwrap();
    assert!(topics.is_empty());
    assert!(build_flows(&topics).is_empty());
    assert!(index.is_empty());
}

/// Only tool messages: nothing is indexed and no topic is formed.
#[test]
fn test_tool_only_input() {
    let messages = vec![
        Message::new("t1", Role::Tool, "stdout: ok"),
        Message::new("t2", Role::Tool, "stderr: none"),
    ];
    let mut index = memory_index();
    let topics = pipeline().cluster(&messages, &mut index).unwrap();
    assert!(topics.is_empty());
    assert!(index.is_empty());
}

/// E2E-05: a topic whose seed id was not claimed by an earlier topic starts
/// with that id.
#[test]
fn test_self_claim_priority() {
    let pipeline = pipeline_with(ClusterConfig {
        neighbors: 4,
        ..Default::default()
    });

    for seed in 0..25u64 {
        let messages = random_messages(seed, 35);
        let mut index = memory_index();
        let topics = pipeline.cluster(&messages, &mut index).unwrap();

        let mut claimed: HashSet<&str> = HashSet::new();
        for topic in &topics {
            if !claimed.contains(topic.seed_id.as_str()) {
                assert_eq!(topic.ids.first(), Some(&topic.seed_id));
            }
            claimed.extend(topic.ids.iter().map(String::as_str));
        }
    }
}
