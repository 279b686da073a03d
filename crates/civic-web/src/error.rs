//! Error types for the civic web API.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use engine::EngineError;
use thiserror::Error;

/// Errors that can occur while handling an API request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failure reported by the engine.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Missing, unknown or expired session token.
    #[error("Please log in")]
    Unauthorized,

    /// Request body could not be read.
    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Engine(err) => match err {
                EngineError::Validation(_) => StatusCode::BAD_REQUEST,
                EngineError::InvalidCredentials
                | EngineError::InvalidCode
                | EngineError::OtpExpired => StatusCode::UNAUTHORIZED,
                EngineError::AccessDenied => StatusCode::FORBIDDEN,
                EngineError::NotFound { .. } | EngineError::NotRegistered => StatusCode::NOT_FOUND,
                EngineError::InvalidTransition { .. } | EngineError::Conflict(_) => {
                    StatusCode::CONFLICT
                }
                EngineError::Crypto(_) | EngineError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = serde_json::json!({
            "success": false,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use database::Status;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::from(EngineError::Validation("x".into())), 400),
            (ApiError::from(EngineError::InvalidCredentials), 401),
            (ApiError::from(EngineError::OtpExpired), 401),
            (ApiError::from(EngineError::AccessDenied), 403),
            (ApiError::from(EngineError::NotRegistered), 404),
            (
                ApiError::from(EngineError::NotFound {
                    entity: "Complaint",
                    id: "1".into(),
                }),
                404,
            ),
            (
                ApiError::from(EngineError::InvalidTransition {
                    from: Status::Resolved,
                    to: Status::Assigned,
                }),
                409,
            ),
            (ApiError::from(EngineError::Conflict("x".into())), 409),
            (ApiError::Unauthorized, 401),
            (ApiError::from(EngineError::Crypto("bad salt".into())), 500),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status().as_u16(), expected, "{err:?}");
        }
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let response = ApiError::from(EngineError::Crypto("argon2 params".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Internal server error");
    }
}
