//! Application error types
//!
//! Unified error handling for everything that talks to the community backend.

use community_core::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Authentication errors
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Insufficient permissions")]
    Forbidden,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Resource errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Rate limiting
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Any other non-success response from the backend
    #[error("{message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        errors: Vec<FieldError>,
    },

    // Transport errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to decode response: {0}")]
    Decode(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Build an error from a non-success backend response
    #[must_use]
    pub fn from_response(status: u16, body: ErrorResponse) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound(body.message),
            409 => Self::Conflict(body.message),
            429 => Self::RateLimitExceeded,
            400 | 422 if !body.errors.is_empty() => Self::Api {
                status,
                code: body.code,
                message: body.message,
                errors: body.errors,
            },
            400 | 422 => Self::Validation(body.message),
            _ => Self::Api {
                status,
                code: body.code,
                message: body.message,
                errors: body.errors,
            },
        }
    }

    /// HTTP-style status code for this error.
    ///
    /// Transport failures have no response, so they report gateway codes.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::Validation(_) => 400,

            // 401 Unauthorized
            Self::Unauthorized => 401,

            // 403 Forbidden
            Self::Forbidden => 403,

            // 404 Not Found
            Self::NotFound(_) => 404,

            // 409 Conflict
            Self::Conflict(_) => 409,

            // 429 Too Many Requests
            Self::RateLimitExceeded => 429,

            Self::Api { status, .. } => *status,

            // Transport
            Self::Decode(_) => 502,
            Self::Network(_) => 503,
            Self::Timeout => 504,

            // 500 Internal Server Error
            Self::Config(_) => 500,

            // Domain errors are all missing posts or comments
            Self::Domain(_) => 404,
        }
    }

    /// Get error code
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::Api { code, .. } => code,
            Self::Network(_) => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        let status = self.status_code();
        (400..500).contains(&status)
    }

    /// Check if this is a server or transport error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        let status = self.status_code();
        (500..600).contains(&status)
    }

    /// Session expired or missing
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Create a not found error for a resource
    #[must_use]
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::NotFound(resource.to_string())
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }
}

/// Field-level rejection reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

/// Error body returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default = "default_error_code")]
    pub code: String,
    #[serde(default = "default_error_message")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl Default for ErrorResponse {
    fn default() -> Self {
        Self {
            code: default_error_code(),
            message: default_error_message(),
            errors: Vec::new(),
        }
    }
}

impl ErrorResponse {
    /// Parse an error body, falling back to defaults for empty or non-JSON bodies
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let errors = match err {
            AppError::Api { errors, .. } => errors.clone(),
            _ => Vec::new(),
        };
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
            errors,
        }
    }
}

fn default_error_code() -> String {
    "UNKNOWN_ERROR".to_string()
}

fn default_error_message() -> String {
    "An error occurred".to_string()
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
