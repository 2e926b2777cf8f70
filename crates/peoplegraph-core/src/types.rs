//! Core domain types for the people graph.
//!
//! A `Person` is a node keyed by a canonical `node_id`; a `Relationship` is a
//! directed, typed edge between two persons keyed by the ordered id pair.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::ident::canonicalize;

/// Open mapping of caller-supplied scalar values attached to a person.
pub type AdditionalData = serde_json::Map<String, serde_json::Value>;

/// Key under which the server stamps the creation time (epoch seconds).
pub const CREATED_AT: &str = "created_at";

// ── Person ────────────────────────────────────────────────────────

/// A person node in the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub node_id: String,
    pub name: String,
    #[serde(default)]
    pub additional_data: AdditionalData,
}

impl Person {
    /// Build a new person from a display name, deriving `node_id` and
    /// stamping `created_at` into `additional_data`.
    pub fn new(name: impl Into<String>, mut additional_data: AdditionalData) -> Self {
        let name = name.into();
        additional_data.insert(CREATED_AT.to_string(), serde_json::json!(epoch_seconds()));
        Self {
            node_id: canonicalize(&name),
            name,
            additional_data,
        }
    }

    /// Person materialized from a matrix label: only `created_at` is set.
    pub fn from_label(label: &str) -> Self {
        Self::new(label, AdditionalData::new())
    }

    /// Creation timestamp, if one was recorded.
    pub fn created_at(&self) -> Option<f64> {
        self.additional_data.get(CREATED_AT).and_then(|v| v.as_f64())
    }
}

/// Current wall-clock time as fractional seconds since the Unix epoch.
pub fn epoch_seconds() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

// ── Relationship ──────────────────────────────────────────────────

/// A directed relationship as returned by the read routes.
///
/// `relationship_type` carries the stored `type` property, which keeps the
/// caller's original spacing (the graph label uses underscores).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Relationship {
    pub start_node_id: String,
    pub start_node_name: String,
    pub relationship_id: String,
    #[serde(rename = "type")]
    pub relationship_type: String,
    pub end_node_id: String,
    pub end_node_name: String,
}

// ── Export ────────────────────────────────────────────────────────

/// One directed edge as consumed by the export renderers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdgeTriple {
    pub source: String,
    pub source_name: String,
    #[serde(rename = "type")]
    pub relationship_type: String,
    pub target: String,
    pub target_name: String,
}

impl From<Relationship> for EdgeTriple {
    fn from(r: Relationship) -> Self {
        Self {
            source: r.start_node_id,
            source_name: r.start_node_name,
            relationship_type: r.relationship_type,
            target: r.end_node_id,
            target_name: r.end_node_name,
        }
    }
}

/// Counts of entities merged by one matrix import.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub persons: usize,
    pub relationships: usize,
}
