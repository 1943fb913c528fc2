//! Response types for the Revenue Statement Engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, code, details) = match error {
            EngineError::EmptyInput { source_name } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_INPUT",
                format!("The '{}' source must contain at least one usable record", source_name),
            ),
            EngineError::ConfigNotFound { path } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                format!("Configuration file not found: {}", path),
            ),
            EngineError::ConfigParseError { path, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                format!("Failed to parse {}: {}", path, message),
            ),
            EngineError::InvalidConfig { field, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                format!("{}: {}", field, message),
            ),
            EngineError::RateFileError { path, message } => (
                StatusCode::BAD_REQUEST,
                "RATE_SOURCE_ERROR",
                format!("{}: {}", path, message),
            ),
            EngineError::BookingSourceError { message } => {
                (StatusCode::BAD_GATEWAY, "BOOKING_SOURCE_ERROR", message)
            }
            EngineError::ExportError { path, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "EXPORT_ERROR",
                format!("{}: {}", path, message),
            ),
            EngineError::ArithmeticOverflow { context } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "ARITHMETIC_OVERFLOW",
                format!("Amounts are too large to total while {}", context),
            ),
            EngineError::ServerError { address, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SERVER_ERROR",
                format!("{}: {}", address, message),
            ),
        };
        Self {
            status,
            error: ApiError::with_details(code, message, details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_empty_input_maps_to_422() {
        let api_error: ApiErrorResponse = EngineError::empty_input("exchange_rates").into();
        assert_eq!(api_error.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api_error.error.code, "EMPTY_INPUT");
        assert!(api_error.error.message.contains("exchange_rates"));
    }

    #[test]
    fn test_arithmetic_overflow_maps_to_422() {
        let api_error: ApiErrorResponse = EngineError::ArithmeticOverflow {
            context: "summing booking fees".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api_error.error.code, "ARITHMETIC_OVERFLOW");
    }

    #[test]
    fn test_config_errors_map_to_500() {
        let api_error: ApiErrorResponse = EngineError::InvalidConfig {
            field: "reference_currency".to_string(),
            message: "must not be empty".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CONFIG_ERROR");
    }
}
