use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Errors surfaced by the HTTP layer. Everything that is the caller's fault
/// maps to a 4xx; everything else is `Internal`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("No document has been processed yet. Please upload a PDF first.")]
    NoDocument,

    #[error("{0}")]
    NotFound(String),

    /// A request body axum could not extract; keeps the extractor's status.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("{context}: {error:#}")]
    Internal {
        context: &'static str,
        error: anyhow::Error,
    },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(context: &'static str, error: anyhow::Error) -> Self {
        Self::Internal { context, error }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::NoDocument => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        Self::Rejected {
            status: error.status(),
            message: format!("Invalid upload: {}", error.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();
        if status.is_server_error() {
            tracing::error!("{detail}");
        } else {
            tracing::debug!("Rejected request: {detail}");
        }
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NoDocument.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::NotFound("gone".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Rejected {
                status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
                message: "bad content type".into(),
            }
            .status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            ApiError::internal("boom", anyhow::anyhow!("x")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_message_includes_chain() {
        let err: anyhow::Result<()> = Err(anyhow::anyhow!("connection refused"));
        let err = err.context("Failed to call Ollama chat API").unwrap_err();
        let api = ApiError::internal("Error processing query", err);
        assert_eq!(
            api.to_string(),
            "Error processing query: Failed to call Ollama chat API: connection refused"
        );
    }

    #[test]
    fn test_no_document_message() {
        assert_eq!(
            ApiError::NoDocument.to_string(),
            "No document has been processed yet. Please upload a PDF first."
        );
    }
}
