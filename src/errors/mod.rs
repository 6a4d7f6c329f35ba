//! Error handling module for the openaid backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found, including any failure to reach the remote API
    NotFound(String),
    /// Request parameters failed validation
    Validation(String),
    /// Bad request
    BadRequest(String),
    /// Database error
    Database(String),
    /// Invalid configuration
    Config(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
            AppError::Database(_) => codes::DATABASE_ERROR,
            AppError::Config(_) => codes::CONFIG_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Database(msg) => msg.clone(),
            AppError::Config(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Database(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Upstream payload error: {:?}", err);
        AppError::Internal(format!("Malformed upstream payload: {}", err))
    }
}

/// Every transport failure is reported as a missing resource; the remote API
/// gives no reliable way to tell transient and permanent failures apart.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Remote API error: {:?}", err);
        AppError::NotFound(format!("Remote resource unavailable: {}", err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        tracing::error!("CSV error: {:?}", err);
        AppError::Internal(format!("CSV error: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}
