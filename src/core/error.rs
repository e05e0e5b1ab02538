//! Typed error handling for the query pipeline
//!
//! This module separates client mistakes from programming mistakes so that
//! callers can map them to the right response without inspecting strings.
//!
//! # Error Categories
//!
//! - [`QueryError`]: the client asked for a sort key or field that does not exist
//! - [`ConfigError`]: mappings or configuration are wrong (a bug, not a client error)
//! - [`StorageError`]: the storage collaborator failed
//!
//! # Example
//!
//! ```rust,ignore
//! use shelf::prelude::*;
//!
//! match pipeline.run::<Coin, CoinDto>(&params, coins) {
//!     Ok(outcome) => println!("{} records", outcome.records.len()),
//!     Err(ShelfError::Query(QueryError::InvalidSortKey { order_by, .. })) => {
//!         println!("cannot sort by {}", order_by);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The main error type for the crate
#[derive(Debug)]
pub enum ShelfError {
    /// Rejected client query input
    Query(QueryError),

    /// Mapping or configuration errors
    Config(ConfigError),

    /// Storage collaborator errors
    Storage(StorageError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ShelfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShelfError::Query(e) => write!(f, "{}", e),
            ShelfError::Config(e) => write!(f, "{}", e),
            ShelfError::Storage(e) => write!(f, "{}", e),
            ShelfError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ShelfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShelfError::Query(e) => Some(e),
            ShelfError::Config(e) => Some(e),
            ShelfError::Storage(e) => Some(e),
            ShelfError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ShelfError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShelfError::Query(_) => StatusCode::BAD_REQUEST,
            ShelfError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShelfError::Storage(e) => e.status_code(),
            ShelfError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ShelfError::Query(e) => e.error_code(),
            ShelfError::Config(_) => "CONFIG_ERROR",
            ShelfError::Storage(e) => e.error_code(),
            ShelfError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the client caused this error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ShelfError::Query(QueryError::InvalidSortKey { resource, order_by }) => {
                Some(serde_json::json!({
                    "resource": resource,
                    "orderBy": order_by,
                }))
            }
            ShelfError::Query(QueryError::InvalidFieldSelection { resource, fields }) => {
                Some(serde_json::json!({
                    "resource": resource,
                    "fields": fields,
                }))
            }
            ShelfError::Storage(StorageError::NotFound { resource, id }) => {
                Some(serde_json::json!({
                    "resource": resource,
                    "id": id.to_string(),
                }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ShelfError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// Errors caused by client query input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// `orderBy` names a key that has no mapping for the resource
    InvalidSortKey { resource: String, order_by: String },

    /// `fields` names a field the resource does not expose
    InvalidFieldSelection { resource: String, fields: String },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::InvalidSortKey { resource, order_by } => {
                write!(f, "Cannot sort {} by '{}'", resource, order_by)
            }
            QueryError::InvalidFieldSelection { resource, fields } => {
                write!(f, "Cannot select fields '{}' on {}", fields, resource)
            }
        }
    }
}

impl std::error::Error for QueryError {}

impl QueryError {
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::InvalidSortKey { .. } => "INVALID_SORT_KEY",
            QueryError::InvalidFieldSelection { .. } => "INVALID_FIELD_SELECTION",
        }
    }
}

impl From<QueryError> for ShelfError {
    fn from(err: QueryError) -> Self {
        ShelfError::Query(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to mappings and configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No property mapping was registered for a resource/entity pair
    MissingMapping { dto: String, entity: String },

    /// A sort key reached resolution without a mapping entry
    UnknownSortKey {
        key: String,
        dto: String,
        entity: String,
    },

    /// A mapping points at a field the entity does not have
    UnknownEntityField { field: String, entity: String },

    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingMapping { dto, entity } => {
                write!(f, "No property mapping registered for {} -> {}", dto, entity)
            }
            ConfigError::UnknownSortKey { key, dto, entity } => {
                write!(
                    f,
                    "Sort key '{}' is not mapped for {} -> {}",
                    key, dto, entity
                )
            }
            ConfigError::UnknownEntityField { field, entity } => {
                write!(f, "Entity {} has no field '{}'", entity, field)
            }
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ShelfError {
    fn from(err: ConfigError) -> Self {
        ShelfError::Config(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by the storage collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Entity was not found
    NotFound { resource: String, id: Uuid },

    /// Storage operation failed
    OperationFailed { operation: String, message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound { resource, id } => {
                write!(f, "{} with id '{}' not found", resource, id)
            }
            StorageError::OperationFailed { operation, message } => {
                write!(f, "Storage {} failed: {}", operation, message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl StorageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StorageError::NotFound { .. } => StatusCode::NOT_FOUND,
            StorageError::OperationFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::NotFound { .. } => "ENTITY_NOT_FOUND",
            StorageError::OperationFailed { .. } => "STORAGE_ERROR",
        }
    }
}

impl From<StorageError> for ShelfError {
    fn from(err: StorageError) -> Self {
        ShelfError::Storage(err)
    }
}

impl From<anyhow::Error> for ShelfError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ShelfError>() {
            Ok(shelf) => shelf,
            Err(err) => match err.downcast::<StorageError>() {
                Ok(storage) => ShelfError::Storage(storage),
                Err(err) => ShelfError::Internal(err.to_string()),
            },
        }
    }
}
