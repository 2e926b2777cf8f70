//! In-process person store.
//!
//! Mirrors the Neo4j semantics closely enough to serve the API without a
//! database: plain inserts for the create routes, merges for matrix import,
//! edges keyed by `(label, relationship_id)` just like the graph's MERGE.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;

use peoplegraph_core::{
    edge_label, relationship_id, AdditionalData, AdjacencyMatrix, EdgeTriple, ImportSummary,
    Person, Relationship,
};

use crate::client::GraphError;
use crate::mutations::IMPORT_LABEL;
use crate::store::PersonStore;

#[derive(Debug, Clone)]
struct StoredEdge {
    start: String,
    end: String,
    label: String,
    relationship_id: String,
    relationship_type: String,
}

#[derive(Debug, Default)]
struct MemoryGraph {
    persons: Vec<Person>,
    edges: Vec<StoredEdge>,
}

impl MemoryGraph {
    fn person(&self, node_id: &str) -> Option<&Person> {
        self.persons.iter().find(|p| p.node_id == node_id)
    }

    fn materialize(&self, edge: &StoredEdge) -> Option<Relationship> {
        let start = self.person(&edge.start)?;
        let end = self.person(&edge.end)?;
        Some(Relationship {
            start_node_id: start.node_id.clone(),
            start_node_name: start.name.clone(),
            relationship_id: edge.relationship_id.clone(),
            relationship_type: edge.relationship_type.clone(),
            end_node_id: end.node_id.clone(),
            end_node_name: end.name.clone(),
        })
    }
}

/// Person store held entirely in memory. Contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryGraph>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph labels of the relationships between `start` and `end`.
    pub fn labels_between(&self, start: &str, end: &str) -> Vec<String> {
        self.inner
            .read()
            .edges
            .iter()
            .filter(|e| e.start == start && e.end == end)
            .map(|e| e.label.clone())
            .collect()
    }
}

#[async_trait]
impl PersonStore for MemoryStore {
    async fn ensure_constraints(&self) -> Result<(), GraphError> {
        Ok(())
    }

    async fn find_person(&self, node_id: &str) -> Result<Option<Person>, GraphError> {
        Ok(self.inner.read().person(node_id).cloned())
    }

    async fn create_person(&self, person: &Person) -> Result<(), GraphError> {
        self.inner.write().persons.push(person.clone());
        Ok(())
    }

    async fn list_persons(&self) -> Result<Vec<Person>, GraphError> {
        Ok(self.inner.read().persons.clone())
    }

    async fn update_person(
        &self,
        node_id: &str,
        name: &str,
        additional_data: &AdditionalData,
    ) -> Result<Option<Person>, GraphError> {
        let mut graph = self.inner.write();
        Ok(graph
            .persons
            .iter_mut()
            .find(|p| p.node_id == node_id)
            .map(|p| {
                p.name = name.to_string();
                p.additional_data = additional_data.clone();
                p.clone()
            }))
    }

    async fn detach_relationships(&self, node_id: &str) -> Result<u64, GraphError> {
        let mut graph = self.inner.write();
        if graph.person(node_id).is_none() {
            return Ok(0);
        }
        let before = graph.edges.len();
        graph
            .edges
            .retain(|e| e.start != node_id && e.end != node_id);
        Ok((before - graph.edges.len()) as u64)
    }

    async fn relationship_exists(&self, start: &str, end: &str) -> Result<bool, GraphError> {
        let graph = self.inner.read();
        Ok(graph
            .edges
            .iter()
            .any(|e| e.start == start && e.end == end))
    }

    async fn create_relationship(
        &self,
        start: &str,
        end: &str,
        relationship_type: &str,
    ) -> Result<Option<Relationship>, GraphError> {
        let label =
            edge_label(relationship_type).map_err(|e| GraphError::Serialization(e.to_string()))?;
        let mut graph = self.inner.write();
        if graph.person(start).is_none() || graph.person(end).is_none() {
            return Ok(None);
        }

        let edge = StoredEdge {
            start: start.to_string(),
            end: end.to_string(),
            label,
            relationship_id: relationship_id(start, end),
            relationship_type: relationship_type.to_string(),
        };
        let created = graph.materialize(&edge);
        graph.edges.push(edge);
        Ok(created)
    }

    async fn outgoing_relationships(
        &self,
        node_id: &str,
    ) -> Result<Vec<Relationship>, GraphError> {
        let graph = self.inner.read();
        Ok(graph
            .edges
            .iter()
            .filter(|e| e.start == node_id)
            .filter_map(|e| graph.materialize(e))
            .collect())
    }

    async fn list_relationships(&self) -> Result<Vec<Relationship>, GraphError> {
        let graph = self.inner.read();
        Ok(graph
            .edges
            .iter()
            .filter_map(|e| graph.materialize(e))
            .collect())
    }

    async fn retype_relationship(
        &self,
        relationship_id: &str,
        relationship_type: &str,
    ) -> Result<Option<Relationship>, GraphError> {
        let label =
            edge_label(relationship_type).map_err(|e| GraphError::Serialization(e.to_string()))?;
        let mut graph = self.inner.write();
        let Some(pos) = graph
            .edges
            .iter()
            .position(|e| e.relationship_id == relationship_id)
        else {
            return Ok(None);
        };

        let previous = graph.edges.remove(pos);
        graph.edges.retain(|e| e.relationship_id != relationship_id);
        let edge = StoredEdge {
            label,
            relationship_type: relationship_type.to_string(),
            ..previous
        };
        let updated = graph.materialize(&edge);
        graph.edges.push(edge);
        Ok(updated)
    }

    async fn delete_relationship(&self, relationship_id: &str) -> Result<(), GraphError> {
        self.inner
            .write()
            .edges
            .retain(|e| e.relationship_id != relationship_id);
        Ok(())
    }

    async fn edge_triples(&self) -> Result<Vec<EdgeTriple>, GraphError> {
        Ok(self
            .list_relationships()
            .await?
            .into_iter()
            .map(EdgeTriple::from)
            .collect())
    }

    async fn import_matrix(&self, matrix: &AdjacencyMatrix) -> Result<ImportSummary, GraphError> {
        let persons = matrix.persons();
        let edges = matrix.keyed_edges();
        let mut graph = self.inner.write();

        let known: HashSet<String> = graph.persons.iter().map(|p| p.node_id.clone()).collect();
        for person in &persons {
            if !known.contains(&person.node_id) {
                graph.persons.push(person.clone());
            }
        }

        // Imported edges are keyed like the graph MERGE: label, endpoints and id.
        let imported: HashMap<(String, String, String), usize> = graph
            .edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.label == IMPORT_LABEL)
            .map(|(i, e)| ((e.start.clone(), e.end.clone(), e.relationship_id.clone()), i))
            .collect();

        for keyed in &edges {
            let key = (
                keyed.start_node_id.clone(),
                keyed.end_node_id.clone(),
                keyed.relationship_id.clone(),
            );
            match imported.get(&key) {
                Some(&i) => graph.edges[i].relationship_type = keyed.relationship_type.clone(),
                None => graph.edges.push(StoredEdge {
                    start: keyed.start_node_id.clone(),
                    end: keyed.end_node_id.clone(),
                    label: IMPORT_LABEL.to_string(),
                    relationship_id: keyed.relationship_id.clone(),
                    relationship_type: keyed.relationship_type.clone(),
                }),
            }
        }

        Ok(ImportSummary {
            persons: persons.len(),
            relationships: edges.len(),
        })
    }
}
