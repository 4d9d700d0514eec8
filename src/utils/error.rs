//! Error handling for the backend core
//!
//! This module defines all error types used throughout the access-control
//! and audit subsystem.

use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Result type alias for the backend
pub type Result<T> = std::result::Result<T, FinanceError>;

/// Main error type for the backend
#[derive(Error, Debug)]
pub enum FinanceError {
    /// Configuration errors (unknown role/permission, bad config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication errors (credential missing, invalid, or expired)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Authorization errors (permission or resource-scope denial)
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Cache errors (internal, degrade to recompute)
    #[error("Cache error: {0}")]
    Cache(String),

    /// Redis errors
    #[cfg(feature = "redis")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Audit persistence errors
    #[error("Audit error: {0}")]
    Audit(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for FinanceError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            FinanceError::Authentication(_) => (
                actix_web::http::StatusCode::UNAUTHORIZED,
                "AUTHENTICATION_ERROR",
                self.to_string(),
            ),
            FinanceError::Authorization(_) => (
                actix_web::http::StatusCode::FORBIDDEN,
                "AUTHORIZATION_ERROR",
                self.to_string(),
            ),
            FinanceError::NotFound(_) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                self.to_string(),
            ),
            FinanceError::Config(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                self.to_string(),
            ),
            FinanceError::Cache(_) | FinanceError::Timeout(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "CACHE_ERROR",
                "Cache operation failed".to_string(),
            ),
            #[cfg(feature = "redis")]
            FinanceError::Redis(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "CACHE_ERROR",
                "Cache operation failed".to_string(),
            ),
            FinanceError::Audit(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "AUDIT_ERROR",
                "Audit write failed".to_string(),
            ),
            _ => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
                request_id: None, // This should be set by middleware
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

/// Standard error response format
#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
    pub request_id: Option<String>,
}

/// Helper functions for creating specific errors
impl FinanceError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn authentication<S: Into<String>>(message: S) -> Self {
        Self::Authentication(message.into())
    }

    pub fn authorization<S: Into<String>>(message: S) -> Self {
        Self::Authorization(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache(message.into())
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    pub fn audit<S: Into<String>>(message: S) -> Self {
        Self::Audit(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }
}
