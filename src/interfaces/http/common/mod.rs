//! Shared HTTP response types

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Uniform envelope for every API response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload, `null` on error
    pub data: Option<T>,
    /// Error description, absent on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// HTTP status for a domain error.
pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::DuplicateAccount(_) | DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::PaymentFailed(_) => StatusCode::PAYMENT_REQUIRED,
        DomainError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        DomainError::PersistenceFailed(_) | DomainError::CapacityRaceLost { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Error tuple for the `Result<Json<..>, (StatusCode, Json<..>)>` handler
/// signature, carrying the user-facing message.
pub fn error_reply<T>(err: DomainError) -> (StatusCode, axum::Json<ApiResponse<T>>) {
    (status_for(&err), axum::Json(ApiResponse::error(err.user_message())))
}

// ── Tests ──────────────────────────────────────────────────────
