//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// Every pipeline failure is represented by this enum. Each variant converts
/// to an HTTP response with a flat `{"detail": <message>}` body via
/// `IntoResponse`; only a selector that matches no pages maps to 400,
/// everything else is a 500.
#[derive(Error, Debug)]
pub enum AppError {
    /// Staging area could not be created or written
    #[error("Staging failed: {0}")]
    Resource(String),

    /// External tool invocation failed
    #[error(transparent)]
    Tool(#[from] crate::executor::ToolError),

    /// Page operation failed
    #[error(transparent)]
    Page(#[from] crate::pages::PageError),

    /// A job produced no output artifacts to package
    #[error("Packaging failed: {0}")]
    Packaging(String),

    /// Malformed request (bad multipart stream, missing required field)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Page(crate::pages::PageError::NoValidPages) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Resource(_)
            | AppError::Tool(_)
            | AppError::Page(_)
            | AppError::Packaging(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "detail": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::PageError;

    #[test]
    fn no_valid_pages_maps_to_400() {
        let response = AppError::Page(PageError::NoValidPages).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn tool_errors_map_to_500() {
        let err = AppError::Tool(crate::executor::ToolError::OutputMissing(
            "expected out.pdf".to_string(),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn packaging_error_maps_to_500() {
        let response = AppError::Packaging("no valid output produced".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
