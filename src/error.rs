// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Estate Ledger contributors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Field names a validation failure found absent, when applicable.
    pub missing: Option<Vec<String>>,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing: Option<Vec<String>>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            missing: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn payment_required(message: impl Into<String>) -> Self {
        Self::new(StatusCode::PAYMENT_REQUIRED, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// A 400 listing the request fields that were absent.
    pub fn missing_fields(fields: Vec<&str>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "The following fields are required".to_string(),
            missing: Some(fields.into_iter().map(str::to_string).collect()),
        }
    }

    /// A generic 500. The underlying detail is logged, and echoed to the
    /// client only when `expose` is set (development mode).
    pub fn internal(detail: impl std::fmt::Display, expose: bool) -> Self {
        tracing::error!(error = %detail, "internal server error");
        let message = if expose {
            format!("Internal Server Error: {detail}")
        } else {
            "Internal Server Error".to_string()
        };
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            success: false,
            message: self.message,
            missing: self.missing,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.message, "bad");

        let auth = ApiError::unauthorized("who");
        assert_eq!(auth.status, StatusCode::UNAUTHORIZED);

        let pay = ApiError::payment_required("broke");
        assert_eq!(pay.status, StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn internal_suppresses_detail_outside_dev() {
        let prod = ApiError::internal("connection refused", false);
        assert_eq!(prod.message, "Internal Server Error");

        let dev = ApiError::internal("connection refused", true);
        assert!(dev.message.contains("connection refused"));
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"success":false,"message":"bad data"}"#);
    }

    #[tokio::test]
    async fn missing_fields_are_listed() {
        let response = ApiError::missing_fields(vec!["txHash", "email"]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["missing"], serde_json::json!(["txHash", "email"]));
    }
}
