//! End-to-end conversation scenarios.
//!
//! E2E-06: Login conversation splits into two ordered topics
//! E2E-07: Same conversation through two fresh indexes gives the same flows
//! E2E-08: Interleaved subjects separate into their own flows
//! E2E-09: File-backed index survives a reopen and is reused
//! E2E-10: Export file through the command library
//! E2E-11: A second conversation on a reused file index stays self-contained
//! E2E-12: A reused file index refuses vectors from a different embedder

use pretty_assertions::assert_eq;

use std::sync::Arc;

use e2e_tests::{
    assigned_count, clusterable_count, login_scenario, memory_index, mixed_conversation, pipeline,
    pipeline_with, TestHarness, TEST_DIMENSION,
};
use flow_cli::{cluster_messages, parse_export};
use flow_embeddings::{Embedding, EmbeddingModel, HashingEmbedder};
use flow_topics::{build_flows, ClusterPipeline, DeliverableKind, FlowBuilder};
use flow_types::{ClusterConfig, Message, MetricKind, Role};
use flow_vector::{metric_for, FileIndex, RecordMetadata, VectorError, VectorIndex};

/// E2E-06: two seeds ("1", "3"), two topics in that order, every message in
/// exactly one topic and "1" in the first.
#[test]
fn test_login_scenario() {
    let messages = login_scenario();
    let pipeline = pipeline();

    let seeds = pipeline.extract_seeds(&messages);
    assert_eq!(
        seeds.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
        vec!["1", "3"]
    );

    let mut index = memory_index();
    let topics = pipeline.cluster(&messages, &mut index).unwrap();
    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0].title, "Fix login bug");
    assert_eq!(topics[1].title, "Fix login bug again");
    assert_eq!(topics[0].ids[0], "1");

    for id in ["1", "2", "3"] {
        let owners = topics.iter().filter(|t| t.ids.iter().any(|i| i == id)).count();
        assert_eq!(owners, 1, "id {} should be in exactly one topic", id);
    }
}

/// E2E-07: ULID flow ids differ between runs; titles and membership do not.
#[test]
fn test_processed_twice_same_structure() {
    let messages = mixed_conversation();
    let pipeline = pipeline();

    let structure = |index: &mut dyn VectorIndex| {
        let topics = pipeline.cluster(&messages, index).unwrap();
        build_flows(&topics)
    };

    let mut first_index = memory_index();
    let first = structure(&mut first_index);
    let mut second_index = memory_index();
    let second = structure(&mut second_index);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_ne!(a.id, b.id);
        assert_eq!(a.title, b.title);
        assert_eq!(a.nodes, b.nodes);
        assert_eq!(a.metrics, b.metrics);
    }
}

/// E2E-08: with a tight neighbor budget each subject stays with its answer.
#[test]
fn test_mixed_conversation_separates_subjects() {
    let pipeline = pipeline_with(ClusterConfig {
        neighbors: 2,
        ..Default::default()
    });
    let mut index = memory_index();
    let report = pipeline
        .run(
            &mixed_conversation(),
            &mut index,
            &FlowBuilder::sequential("flow"),
        )
        .unwrap();

    assert_eq!(report.stats.seen, 6);
    assert_eq!(report.stats.skipped_tool, 1);

    let members: Vec<Vec<String>> = report.topics.iter().map(|t| t.ids.clone()).collect();
    assert_eq!(
        members,
        vec![
            vec!["u1".to_string(), "a1".to_string()],
            vec!["u2".to_string(), "a2".to_string()],
            vec!["u3".to_string(), "a3".to_string()],
        ]
    );

    let ids: Vec<&str> = report.flows.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["flow-1", "flow-2", "flow-3"]);
    assert!(report.flows.iter().all(|f| f.metrics.message_count == 2));
}

/// Downstream collaborators attach deliverables and quality after the fact.
#[test]
fn test_flows_accept_deliverables() {
    let mut index = memory_index();
    let mut report = pipeline()
        .run(&login_scenario(), &mut index, &FlowBuilder::default())
        .unwrap();

    let flow = &mut report.flows[0];
    flow.add_deliverable(DeliverableKind::Docs, "login.md", "# Login fix");
    flow.add_deliverable(DeliverableKind::Prompt, "prompt.txt", "Fix the login bug");
    flow.set_quality(0.75);

    let json = serde_json::to_value(&report.flows[0]).unwrap();
    assert_eq!(json["deliverables"][0]["kind"], "docs");
    assert_eq!(json["deliverables"][1]["name"], "prompt.txt");
    assert_eq!(json["metrics"]["quality"], 0.75);
}

/// Upserting an id twice keeps one record holding the second write.
#[test]
fn test_idempotent_upsert() {
    let embedder = HashingEmbedder::new(TEST_DIMENSION).unwrap();
    let v1 = embedder.embed("database migration").unwrap();
    let v2 = embedder.embed("button layout").unwrap();

    let harness = TestHarness::new();
    let mut mem = memory_index();
    let mut file = harness.file_index();

    let indexes: [&mut dyn VectorIndex; 2] = [&mut mem, &mut file];
    for index in indexes {
        index
            .upsert("x", v1.clone(), RecordMetadata::new(Role::User, "database migration"))
            .unwrap();
        index
            .upsert("x", v2.clone(), RecordMetadata::new(Role::Assistant, "button layout"))
            .unwrap();

        assert_eq!(index.len(), 1);
        let record = index.get("x").unwrap();
        assert_eq!(record.embedding, v2);
        assert_eq!(record.metadata.role, Role::Assistant);
        assert_eq!(record.metadata.text, "button layout");
    }
}

/// E2E-09: ingest, drop, reopen, and cluster again without re-embedding.
#[test]
fn test_file_index_reload() {
    let harness = TestHarness::new();
    let messages = mixed_conversation();
    let pipeline = pipeline();

    let first = {
        let mut index = harness.file_index();
        pipeline
            .run(&messages, &mut index, &FlowBuilder::sequential("flow"))
            .unwrap()
    };
    assert_eq!(first.stats.embedded, 6);

    let mut index = harness.file_index();
    assert_eq!(index.len(), 6);
    assert!(index.contains("u1"));
    assert!(!index.contains("t1"));

    let second = pipeline
        .run(&messages, &mut index, &FlowBuilder::sequential("flow"))
        .unwrap();
    assert_eq!(second.stats.embedded, 0);
    assert_eq!(second.stats.reused, 6);
    assert_eq!(first.topics, second.topics);
    assert_eq!(first.flows, second.flows);
}

/// An edited message is re-embedded in place; the rest are reused.
#[test]
fn test_file_index_reembeds_edited_message() {
    let harness = TestHarness::new();
    let pipeline = pipeline();
    let mut messages = login_scenario();

    {
        let mut index = harness.file_index();
        pipeline.ingest(&messages, &mut index).unwrap();
    }

    messages[1] = Message::new("2", Role::Assistant, "Patched the session check");
    let mut index = harness.file_index();
    let stats = pipeline.ingest(&messages, &mut index).unwrap();
    assert_eq!(stats.reused, 2);
    assert_eq!(stats.embedded, 1);

    let expected: Embedding = HashingEmbedder::new(TEST_DIMENSION)
        .unwrap()
        .embed("Patched the session check")
        .unwrap();
    assert_eq!(index.get("2").unwrap().embedding, expected);
}

/// E2E-11: export A, then export B against the same file index. B's topics
/// hold only B's messages even though A's records are still stored.
#[test]
fn test_second_export_on_reused_file_index() {
    let harness = TestHarness::new();
    let pipeline = pipeline();

    let export_a = vec![
        Message::new("old-1", Role::User, "Fix login bug"),
        Message::new("old-2", Role::Assistant, "login fix patch"),
    ];
    {
        let mut index = harness.file_index();
        pipeline.cluster(&export_a, &mut index).unwrap();
    }

    let export_b = vec![
        Message::new("new-1", Role::User, "Fix login bug again"),
        Message::new("new-2", Role::Assistant, "Cleared the stale session cookie"),
        Message::new("new-t", Role::Tool, "login ok"),
    ];
    let mut index = harness.file_index();
    let topics = pipeline.cluster(&export_b, &mut index).unwrap();

    assert_eq!(index.len(), 4);
    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].ids, vec!["new-1", "new-2"]);
    assert!(assigned_count(&topics) <= clusterable_count(&export_b));

    // Running A again still sees only A
    let topics = pipeline.cluster(&export_a, &mut index).unwrap();
    assert_eq!(topics[0].ids, vec!["old-1", "old-2"]);
}

/// E2E-12: switching off bigrams changes the model, so the old snapshot is
/// rejected instead of mixing vectors from both modes.
#[test]
fn test_reused_file_index_rejects_other_embedder() {
    let harness = TestHarness::new();
    {
        let mut index = harness.file_index();
        pipeline()
            .ingest(
                &[Message::new("1", Role::User, "parser error recovery")],
                &mut index,
            )
            .unwrap();
    }

    let unigrams = HashingEmbedder::new(TEST_DIMENSION)
        .unwrap()
        .with_bigrams(false);
    let result = FileIndex::open_or_create(
        &harness.index_path,
        unigrams.info(),
        metric_for(MetricKind::Cosine),
    );
    assert!(matches!(result, Err(VectorError::ModelMismatch { .. })));

    // The pipeline refuses the pairing too, even with a matching dimension
    let mut index = harness.file_index();
    let pipeline = ClusterPipeline::new(Arc::new(unigrams), &ClusterConfig::default()).unwrap();
    let result = pipeline.ingest(
        &[Message::new("1", Role::User, "parser error recovery")],
        &mut index,
    );
    assert!(result.is_err());
    assert_eq!(index.len(), 1);
}

/// E2E-10: heterogeneous export (content parts, missing ids, numeric ids).
#[tokio::test]
async fn test_export_through_command_library() {
    let harness = TestHarness::new();
    let export = r#"{"messages": [
        {"id": 1, "role": "user", "content": [{"text": "Fix login bug"}]},
        {"role": "assistant", "content": "Here's a fix"},
        {"id": "t", "role": "tool", "text": "ok"},
        {"id": 3, "role": "Human", "text": "Fix login bug again\r\nstill broken"}
    ]}"#;
    let messages = parse_export(export).unwrap();
    assert_eq!(messages[0].id, "1");
    assert_eq!(messages[1].id, "msg-1");
    assert_eq!(messages[3].role, Role::User);
    assert_eq!(messages[3].text, "Fix login bug again\nstill broken");

    let report = cluster_messages(
        &harness.file_settings(),
        messages,
        FlowBuilder::sequential("flow"),
    )
    .await
    .unwrap();

    assert_eq!(report.stats.seen, 3);
    assert_eq!(
        report.seeds.iter().map(|s| s.title.as_str()).collect::<Vec<_>>(),
        vec!["Fix login bug", "Fix login bug again"]
    );
    assert_eq!(report.flows.len(), 2);
    assert_eq!(report.flows[0].nodes[0].msg_ids[0], "1");
    assert!(harness.index_path.join("index.json").exists());
}
