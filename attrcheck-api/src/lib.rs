//! attrcheck-api library - HTTP surface for the attribute reconciliation engine
//!
//! Exposes the reconciliation endpoint plus tabular-file upload endpoints
//! that feed it, with permissive CORS for browser-hosted callers.

use axum::Router;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod ingest;

/// Build application router
///
/// The service is stateless: every handler is a pure function over its
/// request, so the router carries no shared state.
pub fn build_router() -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/process-attributes/", post(api::process_attributes))
        .route("/upload-csv-json/", post(api::upload_csv_json))
        .route("/upload-xlsx-json/", post(api::upload_xlsx_json))
        .route("/build_info", get(api::get_build_info))
        .merge(api::health_routes())
        // Enable CORS for cross-origin workflow callers
        .layer(CorsLayer::permissive())
}
