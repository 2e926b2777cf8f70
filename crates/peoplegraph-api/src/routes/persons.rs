//! `/persons` handlers.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use peoplegraph_core::types::CREATED_AT;
use peoplegraph_core::{AdditionalData, Person};
use peoplegraph_graph::PersonStore;

use crate::error::{ApiError, Result};

#[derive(Debug, Deserialize)]
pub struct PersonRequest {
    pub name: String,
    #[serde(default)]
    pub additional_data: AdditionalData,
}

fn not_found() -> ApiError {
    ApiError::NotFound("Node not found".to_string())
}

/// POST /persons
pub async fn create_person(
    store: web::Data<dyn PersonStore>,
    body: web::Json<PersonRequest>,
) -> Result<HttpResponse> {
    let PersonRequest {
        name,
        additional_data,
    } = body.into_inner();
    let person = Person::new(name, additional_data);

    if store.find_person(&person.node_id).await?.is_some() {
        tracing::info!(node_id = %person.node_id, "Person already exists");
        return Err(ApiError::Conflict {
            message: "Node already exists".to_string(),
            node_id: Some(person.node_id),
        });
    }

    store.create_person(&person).await?;
    tracing::info!(node_id = %person.node_id, "Person created");
    Ok(HttpResponse::Created().json(person))
}

/// GET /persons
pub async fn list_persons(store: web::Data<dyn PersonStore>) -> Result<HttpResponse> {
    let persons = store.list_persons().await?;
    Ok(HttpResponse::Ok().json(json!({ "persons": persons })))
}

/// GET /persons/{node_id}
pub async fn get_person(
    store: web::Data<dyn PersonStore>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let node_id = path.into_inner();
    let person = store.find_person(&node_id).await?.ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(person))
}

/// PUT /persons/{node_id}
///
/// Replaces name and additional data. The node id is not re-derived from
/// the new name. `created_at` is carried over unless the body sets it.
pub async fn update_person(
    store: web::Data<dyn PersonStore>,
    path: web::Path<String>,
    body: web::Json<PersonRequest>,
) -> Result<HttpResponse> {
    let node_id = path.into_inner();
    let PersonRequest {
        name,
        mut additional_data,
    } = body.into_inner();

    let existing = store.find_person(&node_id).await?.ok_or_else(not_found)?;
    if let Some(created_at) = existing.additional_data.get(CREATED_AT) {
        additional_data
            .entry(CREATED_AT)
            .or_insert_with(|| created_at.clone());
    }

    let person = store
        .update_person(&node_id, &name, &additional_data)
        .await?
        .ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(person))
}

/// DELETE /persons/{node_id}
///
/// Removes the person's relationships only; the node itself is kept.
pub async fn delete_person(
    store: web::Data<dyn PersonStore>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let node_id = path.into_inner();
    let removed = store.detach_relationships(&node_id).await?;
    tracing::info!(node_id = %node_id, removed, "Person relationships deleted");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Node deleted",
        "node_id": node_id,
        "relationships_deleted": removed,
    })))
}
