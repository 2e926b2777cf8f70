//! Integration tests for peoplegraph-graph against a live Neo4j instance.
//!
//! These tests require a Neo4j server on bolt://localhost:7687.
//! Run with: cargo test --package peoplegraph-graph --test integration -- --ignored
//!
//! Skipped automatically if Neo4j is not available.

use std::sync::atomic::{AtomicUsize, Ordering};

use peoplegraph_core::{AdditionalData, AdjacencyMatrix, Person};
use peoplegraph_graph::{GraphClient, GraphConfig};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

async fn connect_or_skip() -> Option<GraphClient> {
    let config = GraphConfig::default();
    match GraphClient::connect(&config).await {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping integration test (Neo4j not available): {e}");
            None
        }
    }
}

/// Name prefix that keeps each test's persons apart from everything else.
fn unique_prefix() -> String {
    format!(
        "it{}x{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    )
}

async fn cleanup(client: &GraphClient, prefix: &str) {
    let q = neo4rs::query("MATCH (a:Person) WHERE a.node_id STARTS WITH $prefix DETACH DELETE a")
        .param("prefix", prefix.to_string());
    let _ = client.run(q).await;
}

fn person(prefix: &str, name: &str) -> Person {
    Person::new(format!("{prefix} {name}"), AdditionalData::new())
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_create_and_find_person() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let prefix = unique_prefix();
    cleanup(&client, &prefix).await;

    let mut alice = person(&prefix, "Alice");
    alice
        .additional_data
        .insert("team".to_string(), serde_json::json!("infra"));
    client.create_person(&alice).await.unwrap();

    let found = client.find_person(&alice.node_id).await.unwrap().unwrap();
    assert_eq!(found.name, alice.name);
    assert_eq!(found.additional_data["team"], "infra");
    assert!(found.created_at().is_some());

    assert!(client
        .find_person(&format!("{prefix}_nobody"))
        .await
        .unwrap()
        .is_none());

    cleanup(&client, &prefix).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_update_person_keeps_node_id() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let prefix = unique_prefix();
    cleanup(&client, &prefix).await;

    let alice = person(&prefix, "Alice");
    client.create_person(&alice).await.unwrap();

    let updated = client
        .update_person(&alice.node_id, "Alicia", &AdditionalData::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.node_id, alice.node_id);
    assert_eq!(updated.name, "Alicia");

    let missing = client
        .update_person(&format!("{prefix}_nobody"), "X", &AdditionalData::new())
        .await
        .unwrap();
    assert!(missing.is_none());

    cleanup(&client, &prefix).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_relationship_lifecycle() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let prefix = unique_prefix();
    cleanup(&client, &prefix).await;

    let alice = person(&prefix, "Alice");
    let bob = person(&prefix, "Bob");
    client.create_person(&alice).await.unwrap();
    client.create_person(&bob).await.unwrap();

    let rel = client
        .create_relationship(&alice.node_id, &bob.node_id, "friend of")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rel.relationship_id, format!("{}_{}", alice.node_id, bob.node_id));
    assert_eq!(rel.relationship_type, "friend of");
    assert!(client
        .relationship_exists(&alice.node_id, &bob.node_id)
        .await
        .unwrap());

    let outgoing = client.outgoing_relationships(&alice.node_id).await.unwrap();
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].end_node_name, bob.name);

    let retyped = client
        .retype_relationship(&rel.relationship_id, "mentor")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(retyped.relationship_type, "mentor");
    assert_eq!(
        client.outgoing_relationships(&alice.node_id).await.unwrap().len(),
        1
    );

    client.delete_relationship(&rel.relationship_id).await.unwrap();
    assert!(client
        .outgoing_relationships(&alice.node_id)
        .await
        .unwrap()
        .is_empty());

    cleanup(&client, &prefix).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_detach_keeps_person() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let prefix = unique_prefix();
    cleanup(&client, &prefix).await;

    let alice = person(&prefix, "Alice");
    let bob = person(&prefix, "Bob");
    client.create_person(&alice).await.unwrap();
    client.create_person(&bob).await.unwrap();
    client
        .create_relationship(&alice.node_id, &bob.node_id, "mentor")
        .await
        .unwrap();
    client
        .create_relationship(&bob.node_id, &alice.node_id, "peer")
        .await
        .unwrap();

    assert_eq!(client.detach_relationships(&alice.node_id).await.unwrap(), 2);
    assert!(client.find_person(&alice.node_id).await.unwrap().is_some());

    cleanup(&client, &prefix).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_import_matrix_is_idempotent() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let prefix = unique_prefix();
    cleanup(&client, &prefix).await;

    let csv = format!(
        "A/B,{p} Bob,{p} Carol\n{p} Alice,mentor,\n{p} Bob,X,friend of",
        p = prefix
    );
    let matrix = AdjacencyMatrix::parse(&csv).unwrap();

    let first = client.import_matrix(&matrix).await.unwrap();
    let second = client.import_matrix(&matrix).await.unwrap();
    assert_eq!(first, second);

    let ours = |node_id: &str| node_id.starts_with(&prefix);
    let persons = client.list_persons().await.unwrap();
    assert_eq!(persons.iter().filter(|p| ours(&p.node_id)).count(), 3);

    let relationships = client.list_relationships().await.unwrap();
    assert_eq!(
        relationships
            .iter()
            .filter(|r| ours(&r.start_node_id))
            .count(),
        2
    );

    cleanup(&client, &prefix).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_import_keeps_pairs_whose_ids_collide() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let prefix = unique_prefix();
    cleanup(&client, &prefix).await;

    // "{p} A B" -> "{p} C" and "{p} A" -> "B {p} C" join to the same
    // relationship id.
    let csv = format!("A/B,{p} C,B {p} C\n{p} A B,x,\n{p} A,,y", p = prefix);
    let matrix = AdjacencyMatrix::parse(&csv).unwrap();
    client.import_matrix(&matrix).await.unwrap();

    let mut types: Vec<String> = client
        .list_relationships()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.start_node_id.starts_with(&prefix))
        .map(|r| r.relationship_type)
        .collect();
    types.sort();
    assert_eq!(types, vec!["x", "y"]);

    let q = neo4rs::query("MATCH (a:Person {node_id: $node_id}) DETACH DELETE a")
        .param("node_id", format!("b_{prefix}_c"));
    let _ = client.run(q).await;
    cleanup(&client, &prefix).await;
}
