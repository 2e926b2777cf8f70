//! Neo4j connection management and shared graph client.

use std::future::Future;
use std::time::Duration;

use neo4rs::{ConfigBuilder, Graph, Query};
use serde::Deserialize;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Neo4j call timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Configuration for connecting to Neo4j.
///
/// Deserializable so it can sit directly under a `[neo4j]` config section;
/// every field falls back to its default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub fetch_size: usize,
    /// Upper bound on each individual store call.
    pub query_timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "password".to_string(),
            max_connections: 16,
            fetch_size: 256,
            query_timeout_secs: 10,
        }
    }
}

/// Thread-safe Neo4j graph client with connection pooling.
///
/// Every call checks a connection out of the pool for its own duration and
/// is bounded by the configured timeout. Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
    timeout: Duration,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self {
            graph,
            timeout: Duration::from_secs(config.query_timeout_secs.max(1)),
        })
    }

    /// Await a driver future, failing with [`GraphError::Timeout`] once the
    /// configured bound elapses.
    pub(crate) async fn bounded<T, F>(&self, fut: F) -> Result<T, GraphError>
    where
        F: Future<Output = Result<T, neo4rs::Error>>,
    {
        within(self.timeout, fut).await
    }

    /// Execute a write-only query (CREATE, MERGE, DELETE, SET).
    pub async fn run(&self, query: Query) -> Result<(), GraphError> {
        self.bounded(self.graph.run(query)).await
    }

    /// Execute a read query and collect all rows.
    pub async fn query_rows(&self, query: Query) -> Result<Vec<neo4rs::Row>, GraphError> {
        self.bounded(async {
            let mut stream = self.graph.execute(query).await?;
            let mut rows = Vec::new();
            while let Some(row) = stream.next().await? {
                rows.push(row);
            }
            Ok(rows)
        })
        .await
    }

    /// Execute a read query and return the first row, if any.
    pub async fn query_one(&self, query: Query) -> Result<Option<neo4rs::Row>, GraphError> {
        self.bounded(async {
            let mut stream = self.graph.execute(query).await?;
            stream.next().await
        })
        .await
    }

    /// Begin a transaction.
    pub async fn start_txn(&self) -> Result<neo4rs::Txn, GraphError> {
        self.bounded(self.graph.start_txn()).await
    }
}

/// Run a driver future under a deadline.
pub(crate) async fn within<T, F>(limit: Duration, fut: F) -> Result<T, GraphError>
where
    F: Future<Output = Result<T, neo4rs::Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(GraphError::Timeout {
            seconds: limit.as_secs(),
        }),
    }
}
