// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from service errors and extractor rejections to HTTP responses.
//!
//! Every failure body has the shape `{"detail": "<message>"}`.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use jotsync_core::JotsyncError;
use serde::Serialize;

/// Detail used for every 404.
pub const NOT_FOUND_DETAIL: &str = "Journal not found";

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl From<JotsyncError> for ApiError {
    fn from(err: JotsyncError) -> Self {
        match err {
            JotsyncError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, NOT_FOUND_DETAIL),
            JotsyncError::Validation(msg) => Self::new(StatusCode::UNPROCESSABLE_ENTITY, msg),
            JotsyncError::Conflict { client_id } => Self::new(
                StatusCode::CONFLICT,
                format!("journal with client_id {client_id} already exists"),
            ),
            JotsyncError::Storage { source } => {
                tracing::error!(error = %source, "storage unavailable");
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "Storage unavailable")
            }
            JotsyncError::Config(msg) | JotsyncError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

/// Malformed JSON keeps axum's 400; well-formed JSON with missing or
/// mistyped fields is 422.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404_with_fixed_detail() {
        let err = ApiError::from(JotsyncError::not_found("abc"));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.detail, "Journal not found");
    }

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (
                JotsyncError::Validation("bad".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                JotsyncError::Conflict {
                    client_id: "a".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                JotsyncError::Storage {
                    source: "gone".into(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                JotsyncError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn storage_detail_does_not_leak_source() {
        let err = ApiError::from(JotsyncError::Storage {
            source: "/secret/path/journals.db: disk I/O error".into(),
        });
        assert!(!err.detail.contains("secret"));
    }

    #[test]
    fn error_response_serializes_as_detail() {
        let json = serde_json::to_value(ErrorResponse {
            detail: "x".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"detail": "x"}));
    }
}
