use std::fmt;

use axum::{
    Json,
    extract::{multipart::MultipartRejection, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::models::QuoteStatus;

/// Stage of the quote pipeline that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    StoreRequest,
    StoreAnalysis,
    CompleteRequest,
    Notify,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStep::StoreRequest => "store_request",
            PipelineStep::StoreAnalysis => "store_analysis",
            PipelineStep::CompleteRequest => "complete_request",
            PipelineStep::Notify => "notify",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Request body the extractors refused, with the status they chose.
    #[error("Rejected request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: QuoteStatus, to: QuoteStatus },

    #[error("Pipeline error at {step}: {message}")]
    Pipeline { step: PipelineStep, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn pipeline(step: PipelineStep, source: AppError) -> Self {
        AppError::Pipeline {
            step,
            message: source.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Rejected { status, .. } => *status,
            AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::Pipeline { .. }
            | AppError::Database(_)
            | AppError::Notification(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to a visitor. Server-side failures are logged and
    /// replaced with `fallback`.
    pub fn public_message(&self, fallback: &str) -> String {
        match self {
            AppError::Validation(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Rejected { message, .. } => message.clone(),
            AppError::InvalidTransition { .. } => self.to_string(),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                fallback.to_string()
            }
            AppError::Pipeline { step, message } => {
                tracing::error!(step = %step, error = %message, "Pipeline error");
                fallback.to_string()
            }
            AppError::Notification(msg) => {
                tracing::error!(error = %msg, "Notification error");
                fallback.to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                fallback.to_string()
            }
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = self.public_message("Internal server error");

        let body = json!({
            "error": error_message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = AppError::Validation("email is required".to_string());
        assert_eq!(error.to_string(), "Validation error: email is required");
    }

    #[test]
    fn test_pipeline_error_names_step() {
        let error = AppError::pipeline(
            PipelineStep::StoreAnalysis,
            AppError::Internal("disk full".to_string()),
        );
        assert_eq!(
            error.to_string(),
            "Pipeline error at store_analysis: Internal error: disk full"
        );
    }

    #[test]
    fn test_invalid_transition_message() {
        let error = AppError::InvalidTransition {
            from: QuoteStatus::Completed,
            to: QuoteStatus::Processing,
        };
        assert_eq!(
            error.to_string(),
            "Invalid status transition: completed -> processing"
        );
    }

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (
                AppError::Validation("test".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::NotFound("test".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::pipeline(PipelineStep::Notify, AppError::Internal("x".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Notification("test".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Internal("test".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            assert_eq!(error.status_code(), expected_status);
        }
    }

    #[test]
    fn test_public_message_hides_internal_details() {
        let error = AppError::Internal("connection reset by peer".to_string());
        assert_eq!(error.public_message("Failed"), "Failed");

        let error = AppError::Validation("phone is required".to_string());
        assert_eq!(error.public_message("Failed"), "phone is required");
    }

    #[test]
    fn test_rejected_keeps_status_and_message() {
        let error = AppError::Rejected {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "Invalid upload: too large".to_string(),
        };

        assert_eq!(error.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(error.public_message("Failed"), "Invalid upload: too large");
    }

    #[test]
    fn test_not_found_into_response() {
        let response = AppError::NotFound("Analysis not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
