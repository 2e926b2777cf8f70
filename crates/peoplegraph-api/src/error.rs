//! Error types for the peoplegraph-api crate and their HTTP mapping.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use peoplegraph_core::CoreError;
use peoplegraph_graph::GraphError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The entity already exists. Reported as 400, matching the public API.
    #[error("{message}")]
    Conflict {
        message: String,
        node_id: Option<String>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        Self::InvalidArgument(e.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Conflict { .. } | ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Graph(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = json!({ "message": self.to_string() });
        match self {
            ApiError::Conflict {
                node_id: Some(node_id),
                ..
            } => {
                body["node_id"] = json!(node_id);
            }
            ApiError::Graph(e) => {
                tracing::error!(error = %e, "Graph store call failed");
            }
            _ => {}
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
