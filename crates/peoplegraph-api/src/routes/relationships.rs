//! `/relationships` handlers.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use peoplegraph_core::edge_label;
use peoplegraph_graph::PersonStore;

use crate::error::{ApiError, Result};

#[derive(Debug, Deserialize)]
pub struct CreateRelationshipRequest {
    pub start_node_id: String,
    pub end_node_id: String,
    pub relationship_type: String,
}

#[derive(Debug, Deserialize)]
pub struct RetypeRequest {
    pub relationship_type: String,
}

/// POST /relationships
///
/// At most one relationship may run in each direction between two persons.
pub async fn create_relationship(
    store: web::Data<dyn PersonStore>,
    body: web::Json<CreateRelationshipRequest>,
) -> Result<HttpResponse> {
    let req = body.into_inner();
    edge_label(&req.relationship_type)?;

    if store
        .relationship_exists(&req.start_node_id, &req.end_node_id)
        .await?
    {
        tracing::info!(
            start = %req.start_node_id,
            end = %req.end_node_id,
            "Relationship already exists"
        );
        return Err(ApiError::Conflict {
            message: "Relationship already exists".to_string(),
            node_id: None,
        });
    }

    let rel = store
        .create_relationship(&req.start_node_id, &req.end_node_id, &req.relationship_type)
        .await?
        .ok_or_else(|| ApiError::NotFound("Node not found".to_string()))?;

    tracing::info!(relationship_id = %rel.relationship_id, "Relationship created");
    Ok(HttpResponse::Ok().json(json!({
        "relationship_id": rel.relationship_id,
        "type": rel.relationship_type,
        "end_node_id": rel.end_node_id,
        "end_node_name": rel.end_node_name,
    })))
}

/// GET /relationships/{node_id}
///
/// Store failures are reported as an empty listing with status 200, so a
/// client cannot tell an outage from a person without relationships.
pub async fn outgoing_relationships(
    store: web::Data<dyn PersonStore>,
    path: web::Path<String>,
) -> HttpResponse {
    let node_id = path.into_inner();
    match store.outgoing_relationships(&node_id).await {
        Ok(relationships) => HttpResponse::Ok().json(json!({ "relationships": relationships })),
        Err(e) => {
            tracing::warn!(node_id = %node_id, error = %e, "Relationship lookup failed, returning empty list");
            HttpResponse::Ok().json(json!({
                "message": "Node not found",
                "relationships": [],
            }))
        }
    }
}

/// GET /relationships
pub async fn list_relationships(store: web::Data<dyn PersonStore>) -> Result<HttpResponse> {
    let relationships = store.list_relationships().await?;
    Ok(HttpResponse::Ok().json(json!({ "relationships": relationships })))
}

/// PUT /relationships/{relationship_id}
///
/// Changes the type (and graph label) of an existing relationship.
pub async fn retype_relationship(
    store: web::Data<dyn PersonStore>,
    path: web::Path<String>,
    body: web::Json<RetypeRequest>,
) -> Result<HttpResponse> {
    let relationship_id = path.into_inner();
    let relationship_type = body.into_inner().relationship_type;
    edge_label(&relationship_type)?;

    let rel = store
        .retype_relationship(&relationship_id, &relationship_type)
        .await?
        .ok_or_else(|| ApiError::NotFound("Relationship not found".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Relationship updated",
        "relationship_id": rel.relationship_id,
        "type": rel.relationship_type,
        "start_node_id": rel.start_node_id,
        "end_node_id": rel.end_node_id,
        "end_node_name": rel.end_node_name,
    })))
}

/// DELETE /relationships/{relationship_id}
pub async fn delete_relationship(
    store: web::Data<dyn PersonStore>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let relationship_id = path.into_inner();
    store.delete_relationship(&relationship_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Relationship deleted",
        "relationship_id": relationship_id,
    })))
}
