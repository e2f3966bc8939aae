use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::features::activation::ActivationError;
use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Activation(#[from] ActivationError),
}

impl AppError {
    /// Machine-readable code placed in the response envelope
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::Activation(e) => e.code(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Activation(ActivationError::TicketNotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Activation(ActivationError::TransientNetworkError { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Activation(ActivationError::ToggleFailed { .. }) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let (message, errors, retryable) = match self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::PayloadTooLarge(msg) => (msg, None, None),
            AppError::Validation(msg) => (msg.clone(), Some(vec![msg]), None),
            AppError::Activation(e) => {
                match &e {
                    ActivationError::TransientNetworkError { .. } => {
                        tracing::warn!("Booking backend unreachable: {}", e)
                    }
                    ActivationError::ToggleFailed { .. } => {
                        tracing::error!("Booking backend rejected toggle: {}", e)
                    }
                    ActivationError::TicketNotFound { .. } => {}
                }
                (e.user_message(), None, Some(e.is_retryable()))
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors).with_code(code, retryable));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
