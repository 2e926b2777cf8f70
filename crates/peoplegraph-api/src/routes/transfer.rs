//! Bulk export and import handlers.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use serde_json::json;

use peoplegraph_core::export::{render, ExportFormat, ImportFormat, Rendered};
use peoplegraph_core::AdjacencyMatrix;
use peoplegraph_graph::PersonStore;

use crate::error::{ApiError, Result};

/// GET /export/{format}, where format is `csv`, `csv-matrix` or `json`.
pub async fn export(
    store: web::Data<dyn PersonStore>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let format: ExportFormat = path
        .into_inner()
        .parse()
        .map_err(|_| ApiError::InvalidArgument("Invalid export type".to_string()))?;

    let triples = store.edge_triples().await?;
    tracing::info!(%format, edges = triples.len(), "Exporting relationships");

    Ok(match render(format, triples) {
        Rendered::Csv(csv) => HttpResponse::Ok()
            .content_type("text/csv")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename("export.csv".to_string())],
            })
            .body(csv),
        Rendered::Json(links) => HttpResponse::Ok().json(links),
    })
}

/// POST /import/{format}. Only `csv-matrix` is accepted; the CSV is the raw body.
pub async fn import(
    store: web::Data<dyn PersonStore>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let format: ImportFormat = path
        .into_inner()
        .parse()
        .map_err(|_| ApiError::InvalidArgument("Invalid import type".to_string()))?;

    let summary = match format {
        ImportFormat::CsvMatrix => {
            let text = std::str::from_utf8(&body).map_err(|e| {
                ApiError::InvalidArgument(format!("Import body is not valid UTF-8: {e}"))
            })?;
            let matrix = AdjacencyMatrix::parse(text)?;
            store.import_matrix(&matrix).await?
        }
    };

    Ok(HttpResponse::Ok().json(json!({
        "message": "Imported",
        "persons": summary.persons,
        "relationships": summary.relationships,
    })))
}
