//! Route table and shared extractor configuration.

use actix_web::web;

use crate::error::ApiError;

pub mod persons;
pub mod relationships;
pub mod transfer;

/// Body size limit used by [`configure`].
pub const DEFAULT_BODY_LIMIT: usize = 8 * 1024 * 1024;

/// Register every route with the default body limit.
pub fn configure(cfg: &mut web::ServiceConfig) {
    configure_with_limit(cfg, DEFAULT_BODY_LIMIT);
}

/// Register every route. Handlers expect a `web::Data<dyn PersonStore>` in
/// app data.
pub fn configure_with_limit(cfg: &mut web::ServiceConfig, max_body_bytes: usize) {
    let json = web::JsonConfig::default()
        .limit(max_body_bytes)
        .error_handler(|err, _req| ApiError::InvalidArgument(err.to_string()).into());

    cfg.app_data(json)
        .app_data(web::PayloadConfig::new(max_body_bytes))
        .service(
            web::resource("/persons")
                .route(web::post().to(persons::create_person))
                .route(web::get().to(persons::list_persons)),
        )
        .service(
            web::resource("/persons/{node_id}")
                .route(web::get().to(persons::get_person))
                .route(web::put().to(persons::update_person))
                .route(web::delete().to(persons::delete_person)),
        )
        .service(
            web::resource("/relationships")
                .route(web::post().to(relationships::create_relationship))
                .route(web::get().to(relationships::list_relationships)),
        )
        .service(
            // GET takes a node id; PUT and DELETE take a relationship id.
            web::resource("/relationships/{id}")
                .route(web::get().to(relationships::outgoing_relationships))
                .route(web::put().to(relationships::retype_relationship))
                .route(web::delete().to(relationships::delete_relationship)),
        )
        .route("/export/{format}", web::get().to(transfer::export))
        .route("/import/{format}", web::post().to(transfer::import));
}
