//! peoplegraph-graph: Neo4j client and person store.
//!
//! All graph reads and writes made by the API flow through [`PersonStore`].
//! [`GraphClient`] implements it against Neo4j; [`MemoryStore`] implements it
//! in process.

pub mod client;
pub mod memory;
pub mod mutations;
pub mod queries;
pub mod store;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use memory::MemoryStore;
pub use store::PersonStore;
