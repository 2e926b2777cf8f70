//! Write operations for the people graph.
//!
//! Person creation and relationship creation are plain CREATEs guarded by
//! existence checks in the API layer. Matrix import uses MERGE so that
//! re-importing the same matrix is a no-op.

use neo4rs::{query, Txn};

use peoplegraph_core::matrix::KeyedEdge;
use peoplegraph_core::{
    edge_label, relationship_id, AdditionalData, AdjacencyMatrix, ImportSummary, Person,
    Relationship,
};

use crate::client::{GraphClient, GraphError};
use crate::queries::{row_to_person, row_to_relationship, PERSON_COLUMNS, RELATIONSHIP_COLUMNS};

/// Fixed edge label for relationships created by matrix import.
pub const IMPORT_LABEL: &str = "RELATIONSHIP";

impl GraphClient {
    // ── Schema ───────────────────────────────────────────────────

    /// Create the uniqueness constraint on `Person.node_id`.
    pub async fn ensure_constraints(&self) -> Result<(), GraphError> {
        self.run(query(
            "CREATE CONSTRAINT person_node_id IF NOT EXISTS
             FOR (p:Person) REQUIRE p.node_id IS UNIQUE",
        ))
        .await
    }

    // ── Persons ──────────────────────────────────────────────────

    /// Insert a Person node.
    pub async fn create_person(&self, person: &Person) -> Result<(), GraphError> {
        let q = query(
            "CREATE (a:Person {node_id: $node_id, name: $name, additional_data: $additional_data})",
        )
        .param("node_id", person.node_id.clone())
        .param("name", person.name.clone())
        .param("additional_data", ser(&person.additional_data)?);

        self.run(q).await?;
        tracing::debug!(node_id = %person.node_id, "Person created");
        Ok(())
    }

    /// Overwrite a person's name and additional data.
    pub async fn update_person(
        &self,
        node_id: &str,
        name: &str,
        additional_data: &AdditionalData,
    ) -> Result<Option<Person>, GraphError> {
        let cypher = format!(
            "MATCH (a:Person {{node_id: $node_id}})
             SET a.name = $name, a.additional_data = $additional_data
             RETURN {PERSON_COLUMNS}"
        );
        let q = query(&cypher)
            .param("node_id", node_id.to_string())
            .param("name", name.to_string())
            .param("additional_data", ser(additional_data)?);

        self.query_one(q).await?.map(|row| row_to_person(&row)).transpose()
    }

    /// Delete every relationship touching a person. The node stays.
    pub async fn detach_relationships(&self, node_id: &str) -> Result<u64, GraphError> {
        let q = query(
            "MATCH (a:Person {node_id: $node_id})-[r]-()
             WITH DISTINCT r
             DELETE r
             RETURN count(r) AS cnt",
        )
        .param("node_id", node_id.to_string());

        match self.query_one(q).await? {
            Some(row) => Ok(row.get::<i64>("cnt").unwrap_or(0).max(0) as u64),
            None => Ok(0),
        }
    }

    // ── Relationships ────────────────────────────────────────────

    /// Create a typed relationship between two existing persons.
    ///
    /// The graph label is derived from the type and quoted, never
    /// interpolated raw.
    pub async fn create_relationship(
        &self,
        start: &str,
        end: &str,
        relationship_type: &str,
    ) -> Result<Option<Relationship>, GraphError> {
        let label = quoted_label(relationship_type)?;
        let cypher = format!(
            "MATCH (a:Person {{node_id: $start}})
             MATCH (b:Person {{node_id: $end}})
             CREATE (a)-[r:{label} {{relationship_id: $relationship_id, type: $type}}]->(b)
             RETURN {RELATIONSHIP_COLUMNS}"
        );
        let q = query(&cypher)
            .param("start", start.to_string())
            .param("end", end.to_string())
            .param("relationship_id", relationship_id(start, end))
            .param("type", relationship_type.to_string());

        Ok(self.query_one(q).await?.map(|row| row_to_relationship(&row)))
    }

    /// Swap a relationship for one carrying the new type and label.
    ///
    /// Runs as a single statement, so the delete and re-create are atomic.
    pub async fn retype_relationship(
        &self,
        relationship_id: &str,
        relationship_type: &str,
    ) -> Result<Option<Relationship>, GraphError> {
        let label = quoted_label(relationship_type)?;
        let cypher = format!(
            "MATCH (a:Person)-[old {{relationship_id: $relationship_id}}]->(b:Person)
             WITH a, b, collect(old) AS previous
             FOREACH (o IN previous | DELETE o)
             CREATE (a)-[r:{label} {{relationship_id: $relationship_id, type: $type}}]->(b)
             RETURN {RELATIONSHIP_COLUMNS}"
        );
        let q = query(&cypher)
            .param("relationship_id", relationship_id.to_string())
            .param("type", relationship_type.to_string());

        Ok(self.query_one(q).await?.map(|row| row_to_relationship(&row)))
    }

    /// Delete a relationship by id.
    pub async fn delete_relationship(&self, relationship_id: &str) -> Result<(), GraphError> {
        let q = query(
            "MATCH ()-[r {relationship_id: $relationship_id}]->()
             DELETE r",
        )
        .param("relationship_id", relationship_id.to_string());

        self.run(q).await
    }

    // ── Matrix Import ────────────────────────────────────────────

    /// Merge every person and relationship in the matrix in one transaction.
    ///
    /// Persons merge on `node_id`, relationships on `relationship_id` under
    /// the [`IMPORT_LABEL`] label. Nothing is committed if any statement
    /// fails.
    pub async fn import_matrix(&self, matrix: &AdjacencyMatrix) -> Result<ImportSummary, GraphError> {
        let persons = matrix.persons();
        let edges = matrix.keyed_edges();
        let mut txn = self.start_txn().await?;

        match self.merge_matrix(&mut txn, &persons, &edges).await {
            Ok(summary) => {
                self.bounded(txn.commit()).await?;
                tracing::info!(
                    persons = summary.persons,
                    relationships = summary.relationships,
                    "Matrix imported"
                );
                Ok(summary)
            }
            Err(e) => {
                if let Err(rollback) = self.bounded(txn.rollback()).await {
                    tracing::warn!(error = %rollback, "Failed to roll back matrix import");
                }
                Err(e)
            }
        }
    }

    async fn merge_matrix(
        &self,
        txn: &mut Txn,
        persons: &[Person],
        edges: &[KeyedEdge],
    ) -> Result<ImportSummary, GraphError> {
        for person in persons {
            let q = query(
                "MERGE (a:Person {node_id: $node_id})
                 ON CREATE SET a.name = $name, a.additional_data = $additional_data",
            )
            .param("node_id", person.node_id.clone())
            .param("name", person.name.clone())
            .param("additional_data", ser(&person.additional_data)?);

            self.bounded(txn.run(q)).await?;
        }

        // The endpoints are part of the MERGE pattern, so pairs sharing a
        // joined id stay separate edges.
        let cypher = format!(
            "MATCH (a:Person {{node_id: $start}})
             MATCH (b:Person {{node_id: $end}})
             MERGE (a)-[r:{IMPORT_LABEL} {{relationship_id: $relationship_id}}]->(b)
             SET r.type = $type"
        );
        for edge in edges {
            let q = query(&cypher)
                .param("start", edge.start_node_id.clone())
                .param("end", edge.end_node_id.clone())
                .param("relationship_id", edge.relationship_id.clone())
                .param("type", edge.relationship_type.clone());

            self.bounded(txn.run(q)).await?;
        }

        Ok(ImportSummary {
            persons: persons.len(),
            relationships: edges.len(),
        })
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Backtick-quoted Cypher label for a relationship type. Embedded backticks
/// are doubled, which is the Cypher escape for quoted identifiers.
pub(crate) fn quoted_label(relationship_type: &str) -> Result<String, GraphError> {
    let label = edge_label(relationship_type).map_err(|e| GraphError::Serialization(e.to_string()))?;
    Ok(format!("`{}`", label.replace('`', "``")))
}

fn ser(data: &AdditionalData) -> Result<String, GraphError> {
    serde_json::to_string(data).map_err(|e| GraphError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_label_wraps_and_escapes() {
        assert_eq!(quoted_label("friend of").unwrap(), "`friend_of`");
        assert_eq!(quoted_label("mentor").unwrap(), "`mentor`");
        assert_eq!(
            quoted_label("x`]->(m) DETACH DELETE m //").unwrap(),
            "`x``]->(m)_DETACH_DELETE_m_//`"
        );
    }

    #[test]
    fn quoted_label_rejects_blank_types() {
        assert!(quoted_label("  ").is_err());
    }

    #[test]
    fn additional_data_is_stored_as_json_text() {
        let mut data = AdditionalData::new();
        data.insert("team".to_string(), serde_json::json!("infra"));
        assert_eq!(ser(&data).unwrap(), r#"{"team":"infra"}"#);
    }
}
