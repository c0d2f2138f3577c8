//! Error envelope returned to API clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    pub detail: Vec<String>,
    pub request_id: String,
}

/// Handler failure carrying its HTTP status and response body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// Payload failed validation; `detail` lists every violated rule.
    pub fn validation(detail: Vec<String>, request_id: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: ErrorBody {
                error: "validation_error".to_string(),
                message: "Request validation failed".to_string(),
                detail,
                request_id: request_id.to_string(),
            },
        }
    }

    /// No route matched the requested path.
    pub fn not_found(path: &str, request_id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorBody {
                error: "not_found".to_string(),
                message: "Resource not found".to_string(),
                detail: vec![path.to_string()],
                request_id: request_id.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_validation_error_envelope() {
        let err = ApiError::validation(
            vec!["amount: must be greater than 0".to_string()],
            "req-123",
        );

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "Request validation failed");
        assert_eq!(body["detail"][0], "amount: must be greater than 0");
        assert_eq!(body["request_id"], "req-123");
    }

    #[tokio::test]
    async fn test_not_found_envelope() {
        let err = ApiError::not_found("/api/v1/nonexistent", "req-404");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"], "not_found");
        assert_eq!(body["detail"][0], "/api/v1/nonexistent");
        assert_eq!(body["request_id"], "req-404");
    }
}
