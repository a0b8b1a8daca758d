//! Application router
//!
//! Builds the full route table with middleware. Split out of `main` so
//! integration tests can drive the router directly.

use crate::api;
use crate::config::Config;
use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Uploads are whole documents; axum's 2 MB default is far too small
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Build the application router with all routes configured
pub fn app(config: Arc<Config>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Page operations
        .route("/pdf/merge", post(api::pdf::merge))
        .route("/pdf/split", post(api::pdf::split))
        .route("/pdf/extract", post(api::pdf::extract))
        .route("/pdf/compress", post(api::pdf::compress))
        // Format conversion
        .route("/convert/word-to-pdf", post(api::convert::word_to_pdf))
        .route("/convert/excel-to-pdf", post(api::convert::excel_to_pdf))
        .route("/convert/ppt-to-pdf", post(api::convert::ppt_to_pdf))
        .route("/convert/pdf-to-word", post(api::convert::pdf_to_word))
        .route("/convert/pdf-to-excel", post(api::convert::pdf_to_excel))
        .route("/convert/pdf-to-ppt", post(api::convert::pdf_to_ppt))
        .route("/convert/pdf-to-jpg", post(api::convert::pdf_to_jpg))
        .route("/convert/jpg-to-pdf", post(api::convert::jpg_to_pdf))
        // Password protection
        .route("/security/protect", post(api::security::protect))
        .route("/security/unlock", post(api::security::unlock))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(config)
}
