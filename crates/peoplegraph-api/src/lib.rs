//! peoplegraph-api: REST façade over the people graph.
//!
//! Exposes person and relationship CRUD plus CSV / JSON export and
//! adjacency-matrix import. Handlers are thin: each one performs a single
//! [`PersonStore`] call (or an existence check followed by one).

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use actix_web::web;

use peoplegraph_graph::PersonStore;

pub use routes::{configure, configure_with_limit};

/// Wrap a store for registration as app data.
pub fn store_data(store: Arc<dyn PersonStore>) -> web::Data<dyn PersonStore> {
    web::Data::from(store)
}
