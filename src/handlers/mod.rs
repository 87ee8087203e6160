pub mod diagnostics;
pub mod rest;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{dto::FailureEnvelope, service::ServiceError};

/// Maps a service failure onto the shared failure envelope.
///
/// `action` reads as the tail of "Error ...", e.g. "retrieving note".
pub fn failure(action: &str, id: Option<&str>, err: ServiceError) -> Response {
    let target = id.map(|id| format!(" (id {id})")).unwrap_or_default();

    match err {
        ServiceError::Validation(message) => {
            tracing::warn!("Rejected request {action}{target}: {message}");
            (StatusCode::BAD_REQUEST, Json(FailureEnvelope::new(message))).into_response()
        }
        ServiceError::NotFound(id) => {
            tracing::warn!("Note with ID {id} not found while {action}");
            (
                StatusCode::NOT_FOUND,
                Json(FailureEnvelope::new(format!("Note with ID {id} not found"))),
            )
                .into_response()
        }
        ServiceError::Database { code, message } => {
            tracing::error!(status_code = ?code, "Error {action}{target}: {message}");
            (
                StatusCode::BAD_REQUEST,
                Json(
                    FailureEnvelope::new(format!("Error {action}: {message}"))
                        .with_status_code(code),
                ),
            )
                .into_response()
        }
        ServiceError::Unexpected(message) => {
            tracing::error!("Unexpected error {action}{target}: {message}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FailureEnvelope::new(format!("Unexpected error: {message}"))),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::to_bytes;

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn database_error_is_bad_request_with_status_code() {
        let response = failure(
            "retrieving note",
            Some("abc"),
            ServiceError::Database {
                code: Some(16500),
                message: "Request rate is large".to_string(),
            },
        );

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_of(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["statusCode"], 16500);
        assert_eq!(
            body["message"],
            "Error retrieving note: Request rate is large"
        );
    }

    #[tokio::test]
    async fn not_found_has_no_status_code() {
        let response = failure(
            "deleting note",
            Some("abc"),
            ServiceError::NotFound("abc".to_string()),
        );

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_of(response).await;
        assert_eq!(body["message"], "Note with ID abc not found");
        assert!(body.get("statusCode").is_none());
    }

    #[tokio::test]
    async fn unexpected_error_is_internal_server_error() {
        let response = failure(
            "retrieving notes",
            None,
            ServiceError::Unexpected("invalid type: null, expected a string".to_string()),
        );

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(
            body["message"],
            "Unexpected error: invalid type: null, expected a string"
        );
    }
}
