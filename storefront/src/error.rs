//! HTTP error responses.

use axum::http::StatusCode;
use askama::Template;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;
use storefront_fx::FxError;
use thiserror::Error;
use tracing::error;

use crate::catalog::CatalogError;
use crate::views;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request input failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// Requested resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Unexpected server-side failure.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<FxError> for AppError {
    fn from(e: FxError) -> Self {
        match e {
            FxError::InvalidConversionRequest(_) => AppError::BadRequest(e.to_string()),
            _ => AppError::Internal(e.to_string()),
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Internal(format!("Failed to render page: {}", e))
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(_) => AppError::NotFound(e.to_string()),
            _ => AppError::Internal(e.to_string()),
        }
    }
}

/// An error rendered for a specific request, as JSON or as an HTML page.
#[derive(Debug)]
pub struct ErrorResponse {
    pub error: AppError,
    pub json: bool,
    pub request_id: String,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        error!(
            error = %self.error,
            code = self.error.error_code(),
            cid = %self.request_id,
            "Request error"
        );

        if self.json {
            return (
                status,
                Json(json!({
                    "error": self.error.error_code(),
                    "message": self.error.to_string(),
                    "cid": self.request_id,
                })),
            )
                .into_response();
        }

        let message = self.error.to_string();
        match views::ErrorPage::new(status, &message, &self.request_id).render() {
            Ok(page) => (status, Html(page)).into_response(),
            Err(e) => {
                error!(error = %e, "Failed to render error page");
                (status, message).into_response()
            }
        }
    }
}
