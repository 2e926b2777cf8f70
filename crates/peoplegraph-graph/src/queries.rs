//! Read operations for the people graph.

use neo4rs::{query, Row};

use peoplegraph_core::{AdditionalData, EdgeTriple, Person, Relationship};

use crate::client::{GraphClient, GraphError};

/// Projection shared by every person read.
pub(crate) const PERSON_COLUMNS: &str =
    "a.node_id AS node_id, a.name AS name, a.additional_data AS additional_data";

/// Projection shared by every relationship read; binds `a`, `r`, `b`.
pub(crate) const RELATIONSHIP_COLUMNS: &str = "a.node_id AS start_node_id, a.name AS start_node_name,
     r.relationship_id AS relationship_id, r.type AS type,
     b.node_id AS end_node_id, b.name AS end_node_name";

impl GraphClient {
    // ── Persons ──────────────────────────────────────────────────

    /// Get a person by node id.
    pub async fn find_person(&self, node_id: &str) -> Result<Option<Person>, GraphError> {
        let cypher = format!(
            "MATCH (a:Person {{node_id: $node_id}})
             RETURN {PERSON_COLUMNS}
             LIMIT 1"
        );
        let q = query(&cypher).param("node_id", node_id.to_string());

        self.query_one(q).await?.map(|row| row_to_person(&row)).transpose()
    }

    /// List every person.
    pub async fn list_persons(&self) -> Result<Vec<Person>, GraphError> {
        let cypher = format!("MATCH (a:Person) RETURN {PERSON_COLUMNS}");
        let rows = self.query_rows(query(&cypher)).await?;
        rows.iter().map(row_to_person).collect()
    }

    // ── Relationships ────────────────────────────────────────────

    /// Whether any relationship runs from `start` to `end`.
    pub async fn relationship_exists(&self, start: &str, end: &str) -> Result<bool, GraphError> {
        let q = query(
            "MATCH (a:Person {node_id: $start})-[r]->(b:Person {node_id: $end})
             RETURN count(r) AS cnt",
        )
        .param("start", start.to_string())
        .param("end", end.to_string());

        match self.query_one(q).await? {
            Some(row) => Ok(row.get::<i64>("cnt").unwrap_or(0) > 0),
            None => Ok(false),
        }
    }

    /// Relationships leaving the given person.
    pub async fn outgoing_relationships(
        &self,
        node_id: &str,
    ) -> Result<Vec<Relationship>, GraphError> {
        let cypher = format!(
            "MATCH (a:Person {{node_id: $node_id}})-[r]->(b:Person)
             RETURN {RELATIONSHIP_COLUMNS}"
        );
        let q = query(&cypher).param("node_id", node_id.to_string());

        let rows = self.query_rows(q).await?;
        Ok(rows.iter().map(row_to_relationship).collect())
    }

    /// Every relationship between persons.
    pub async fn list_relationships(&self) -> Result<Vec<Relationship>, GraphError> {
        let cypher = format!(
            "MATCH (a:Person)-[r]->(b:Person)
             RETURN {RELATIONSHIP_COLUMNS}"
        );
        let rows = self.query_rows(query(&cypher)).await?;
        Ok(rows.iter().map(row_to_relationship).collect())
    }

    /// Every relationship in export form.
    pub async fn edge_triples(&self) -> Result<Vec<EdgeTriple>, GraphError> {
        Ok(self
            .list_relationships()
            .await?
            .into_iter()
            .map(EdgeTriple::from)
            .collect())
    }
}

/// Convert a row projected with [`PERSON_COLUMNS`] into a Person.
///
/// `additional_data` is stored as a JSON string; a missing or unreadable
/// value reads as an empty map.
pub(crate) fn row_to_person(row: &Row) -> Result<Person, GraphError> {
    let node_id: String = row
        .get("node_id")
        .map_err(|e| GraphError::Serialization(format!("Failed to read node_id: {e}")))?;
    let name: String = row.get("name").unwrap_or_default();
    let additional_data = row
        .get::<String>("additional_data")
        .ok()
        .and_then(|raw| serde_json::from_str::<AdditionalData>(&raw).ok())
        .unwrap_or_default();

    Ok(Person {
        node_id,
        name,
        additional_data,
    })
}

/// Convert a row projected with [`RELATIONSHIP_COLUMNS`] into a Relationship.
pub(crate) fn row_to_relationship(row: &Row) -> Relationship {
    Relationship {
        start_node_id: row.get("start_node_id").unwrap_or_default(),
        start_node_name: row.get("start_node_name").unwrap_or_default(),
        relationship_id: row.get("relationship_id").unwrap_or_default(),
        relationship_type: row.get("type").unwrap_or_default(),
        end_node_id: row.get("end_node_id").unwrap_or_default(),
        end_node_name: row.get("end_node_name").unwrap_or_default(),
    }
}
