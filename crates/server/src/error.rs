//! Error types for the agreement server

use agreement::AgreementError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: &'static str,
}

impl ServerError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ServerError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ServerError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_ERROR"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        let message = match self {
            ServerError::NotFound(path) => format!("No route for '{}'", path),
            ServerError::InvalidRequest(msg)
            | ServerError::Render(msg)
            | ServerError::Internal(msg) => msg,
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code,
        };

        (status, Json(body)).into_response()
    }
}

impl From<AgreementError> for ServerError {
    fn from(err: AgreementError) -> Self {
        match err {
            AgreementError::Validation(_) | AgreementError::JsonError(_) => {
                ServerError::InvalidRequest(err.to_string())
            }
            AgreementError::PdfError(_) => ServerError::Render(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: ServerError =
            AgreementError::Validation("missing required field `duration`".into()).into();
        assert_eq!(err.status().0, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "Invalid request: Validation error: missing required field `duration`"
        );
    }

    #[test]
    fn test_pdf_error_maps_to_server_error() {
        let err: ServerError = AgreementError::PdfError(pdf_core::PdfError::NoPages).into();
        assert_eq!(err.status(), (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_ERROR"));
    }

    #[test]
    fn test_response_status() {
        let response = ServerError::NotFound("/nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
