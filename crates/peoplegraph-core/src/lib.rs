//! peoplegraph-core: Shared types and pure transformations for the people graph.
//!
//! This crate provides the foundations used by the graph client and the HTTP API:
//! - Domain types (Person, Relationship, export triples)
//! - Identifier canonicalization for node and relationship ids
//! - The adjacency-matrix CSV codec
//! - Flat CSV / JSON export rendering
//! - Common error types

pub mod error;
pub mod export;
pub mod ident;
pub mod matrix;
pub mod types;

pub use error::CoreError;
pub use ident::{canonicalize, edge_label, relationship_id};
pub use matrix::AdjacencyMatrix;
pub use types::{AdditionalData, EdgeTriple, ImportSummary, Person, Relationship};
