//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::chat::ChatError;
use crate::core_state::CoreError;
use crate::requests::LifecycleError;
use crate::timeline::TimelineError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            ApiError::Conflict(detail) => (StatusCode::CONFLICT, "INVALID_TRANSITION", detail),
            ApiError::Forbidden(detail) => (StatusCode::FORBIDDEN, "CHAT_DISABLED", detail),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            CoreError::Lifecycle(e @ LifecycleError::InvalidStateTransition { .. }) => {
                ApiError::Conflict(e.to_string())
            }
            CoreError::Lifecycle(e @ LifecycleError::InvalidTransfer(_)) => {
                ApiError::BadRequest(e.to_string())
            }
            CoreError::Timeline(e) => ApiError::BadRequest(e.to_string()),
            CoreError::Chat(e @ ChatError::ChatDisabled(_)) => ApiError::Forbidden(e.to_string()),
            CoreError::Chat(e @ ChatError::NotParticipant(..)) => {
                ApiError::Forbidden(e.to_string())
            }
            CoreError::Chat(e @ ChatError::EmptyMessage) => ApiError::BadRequest(e.to_string()),
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use crate::models::enums::{EntryType, RequestStatus};

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let response = ApiError::NotFound("patient not found: x".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn internal_hides_detail() {
        let response = ApiError::Internal("disk on fire".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn double_decision_maps_to_409() {
        let err: ApiError = CoreError::Lifecycle(LifecycleError::InvalidStateTransition {
            request_id: "fr-1".into(),
            from: RequestStatus::Accepted,
            to: RequestStatus::Accepted,
        })
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn chat_disabled_maps_to_403() {
        let err: ApiError = CoreError::Chat(ChatError::ChatDisabled("348745".into())).into();
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let err: ApiError = CoreError::Chat(ChatError::EmptyMessage).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
        let err: ApiError = CoreError::Timeline(TimelineError::MissingEntryType).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
        let err: ApiError = CoreError::Timeline(TimelineError::ContentTypeMismatch {
            entry_type: EntryType::Note,
            content: EntryType::LabResult,
        })
        .into();
        assert!(matches!(err, ApiError::BadRequest(_)));
        let err: ApiError =
            CoreError::Lifecycle(LifecycleError::InvalidTransfer("reason is required".into())).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
