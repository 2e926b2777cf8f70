//! Person store trait and its Neo4j-backed implementation.
//!
//! The HTTP layer talks to the graph only through [`PersonStore`], so the
//! same routes can be served from Neo4j or from the in-memory store.

use async_trait::async_trait;

use peoplegraph_core::{AdditionalData, AdjacencyMatrix, EdgeTriple, ImportSummary, Person, Relationship};

use crate::client::{GraphClient, GraphError};

/// Persistence operations behind the REST routes.
///
/// Each call is an independent unit of work; nothing spans two calls.
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// Create indexes/constraints the store relies on. Idempotent.
    async fn ensure_constraints(&self) -> Result<(), GraphError>;

    /// Look up a person by node id.
    async fn find_person(&self, node_id: &str) -> Result<Option<Person>, GraphError>;

    /// Insert a new person. The caller has already checked for duplicates.
    async fn create_person(&self, person: &Person) -> Result<(), GraphError>;

    async fn list_persons(&self) -> Result<Vec<Person>, GraphError>;

    /// Overwrite name and additional data. Returns `None` if absent.
    async fn update_person(
        &self,
        node_id: &str,
        name: &str,
        additional_data: &AdditionalData,
    ) -> Result<Option<Person>, GraphError>;

    /// Delete every relationship touching the person, in either direction.
    /// The person node itself is kept. Returns the number removed.
    async fn detach_relationships(&self, node_id: &str) -> Result<u64, GraphError>;

    /// Whether any relationship runs from `start` to `end`.
    async fn relationship_exists(&self, start: &str, end: &str) -> Result<bool, GraphError>;

    /// Create a typed relationship. Returns `None` if either endpoint is
    /// missing.
    async fn create_relationship(
        &self,
        start: &str,
        end: &str,
        relationship_type: &str,
    ) -> Result<Option<Relationship>, GraphError>;

    /// Relationships leaving the given person.
    async fn outgoing_relationships(&self, node_id: &str)
        -> Result<Vec<Relationship>, GraphError>;

    async fn list_relationships(&self) -> Result<Vec<Relationship>, GraphError>;

    /// Replace the relationship's type (and graph label). Returns `None` if
    /// no relationship has that id.
    async fn retype_relationship(
        &self,
        relationship_id: &str,
        relationship_type: &str,
    ) -> Result<Option<Relationship>, GraphError>;

    /// Delete by id. Deleting an unknown id is not an error.
    async fn delete_relationship(&self, relationship_id: &str) -> Result<(), GraphError>;

    /// All edges in export form.
    async fn edge_triples(&self) -> Result<Vec<EdgeTriple>, GraphError>;

    /// Merge every person and edge in the matrix, atomically.
    async fn import_matrix(&self, matrix: &AdjacencyMatrix) -> Result<ImportSummary, GraphError>;
}

#[async_trait]
impl PersonStore for GraphClient {
    async fn ensure_constraints(&self) -> Result<(), GraphError> {
        GraphClient::ensure_constraints(self).await
    }

    async fn find_person(&self, node_id: &str) -> Result<Option<Person>, GraphError> {
        GraphClient::find_person(self, node_id).await
    }

    async fn create_person(&self, person: &Person) -> Result<(), GraphError> {
        GraphClient::create_person(self, person).await
    }

    async fn list_persons(&self) -> Result<Vec<Person>, GraphError> {
        GraphClient::list_persons(self).await
    }

    async fn update_person(
        &self,
        node_id: &str,
        name: &str,
        additional_data: &AdditionalData,
    ) -> Result<Option<Person>, GraphError> {
        GraphClient::update_person(self, node_id, name, additional_data).await
    }

    async fn detach_relationships(&self, node_id: &str) -> Result<u64, GraphError> {
        GraphClient::detach_relationships(self, node_id).await
    }

    async fn relationship_exists(&self, start: &str, end: &str) -> Result<bool, GraphError> {
        GraphClient::relationship_exists(self, start, end).await
    }

    async fn create_relationship(
        &self,
        start: &str,
        end: &str,
        relationship_type: &str,
    ) -> Result<Option<Relationship>, GraphError> {
        GraphClient::create_relationship(self, start, end, relationship_type).await
    }

    async fn outgoing_relationships(
        &self,
        node_id: &str,
    ) -> Result<Vec<Relationship>, GraphError> {
        GraphClient::outgoing_relationships(self, node_id).await
    }

    async fn list_relationships(&self) -> Result<Vec<Relationship>, GraphError> {
        GraphClient::list_relationships(self).await
    }

    async fn retype_relationship(
        &self,
        relationship_id: &str,
        relationship_type: &str,
    ) -> Result<Option<Relationship>, GraphError> {
        GraphClient::retype_relationship(self, relationship_id, relationship_type).await
    }

    async fn delete_relationship(&self, relationship_id: &str) -> Result<(), GraphError> {
        GraphClient::delete_relationship(self, relationship_id).await
    }

    async fn edge_triples(&self) -> Result<Vec<EdgeTriple>, GraphError> {
        GraphClient::edge_triples(self).await
    }

    async fn import_matrix(&self, matrix: &AdjacencyMatrix) -> Result<ImportSummary, GraphError> {
        GraphClient::import_matrix(self, matrix).await
    }
}
