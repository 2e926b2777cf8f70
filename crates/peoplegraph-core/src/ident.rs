//! Identifier canonicalization.
//!
//! Node ids are derived from display names so that the same person typed by
//! different clients (or in different spreadsheet cells) resolves to the same
//! graph node.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CoreError;

static NON_WORD_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_]+").unwrap());

/// Derive a node id from a display name.
///
/// Trims, lowercases, then collapses every run of characters outside
/// `[A-Za-z0-9_]` into a single `_`. Empty and all-punctuation names yield
/// `""` or `"_"`; uniqueness is enforced by the caller, not here.
pub fn canonicalize(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    NON_WORD_RUN.replace_all(&lowered, "_").into_owned()
}

/// Relationship id for the ordered pair `start -> end`.
pub fn relationship_id(start_node_id: &str, end_node_id: &str) -> String {
    format!("{start_node_id}_{end_node_id}")
}

/// Graph edge label for a relationship type: spaces become underscores.
///
/// The label is not guaranteed to be a bare Cypher identifier; the graph
/// layer quotes it before interpolation.
pub fn edge_label(relationship_type: &str) -> Result<String, CoreError> {
    if relationship_type.trim().is_empty() {
        return Err(CoreError::InvalidArgument(
            "relationship_type must not be empty".to_string(),
        ));
    }
    Ok(relationship_type.replace(' ', "_"))
}
