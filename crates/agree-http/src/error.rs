//! # Rejection Responses
//!
//! [`ValidationRejection`] implements `IntoResponse` and renders the
//! structured JSON error body. Violation lists travel in
//! `details.violations`; the other rejections carry no details.

use agree_core::ValidationResult;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::config::ValidationConfig;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// The error itself.
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Violation list for rule failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Why a request was turned away before reaching its handler.
#[derive(Error, Debug)]
pub enum ValidationRejection {
    /// The body or query violated its rule.
    #[error("request failed validation with {} violation(s)", .result.len())]
    Invalid {
        /// Status to answer with (4xx).
        status: StatusCode,
        /// Every violation found.
        result: ValidationResult,
    },

    /// The body is not valid JSON (400).
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// The query string could not be decoded (400).
    #[error("malformed query string: {0}")]
    MalformedQuery(String),

    /// The body exceeds the configured limit (413).
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge {
        /// Configured limit in bytes.
        limit: usize,
    },
}

impl ValidationRejection {
    /// Rule failure answered per `config`: its status, and without offending
    /// values unless the config exposes them.
    pub fn invalid(result: ValidationResult, config: &ValidationConfig) -> Self {
        let result = if config.expose_values {
            result
        } else {
            result
                .into_violations()
                .into_iter()
                .map(|mut violation| {
                    violation.actual = None;
                    violation
                })
                .collect()
        };
        Self::Invalid {
            status: config.rejection_status,
            result,
        }
    }

    /// Return the HTTP status code and machine-readable error code.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Invalid { status, .. } => (*status, "VALIDATION_ERROR"),
            Self::MalformedBody(_) => (StatusCode::BAD_REQUEST, "MALFORMED_BODY"),
            Self::MalformedQuery(_) => (StatusCode::BAD_REQUEST, "MALFORMED_QUERY"),
            Self::BodyTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "BODY_TOO_LARGE"),
        }
    }

    /// The violations, for rule failures.
    pub fn result(&self) -> Option<&ValidationResult> {
        match self {
            Self::Invalid { result, .. } => Some(result),
            _ => None,
        }
    }
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.to_string();
        let details = match self {
            Self::Invalid { result, .. } => Some(json!({ "violations": result.violations() })),
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}
