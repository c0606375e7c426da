//! Error types for costctl
//!
//! Library code uses `crate::error::Result<T>` which returns `CostctlError`.
//! CLI code uses `anyhow::Result<T>` for top-level error handling; the
//! conversion happens at the CLI boundary so error chains are preserved.
//!
//! The pricing module itself never returns errors: degenerate numeric
//! inputs propagate as ordinary floating-point values. Errors here cover
//! the surrounding surface only: configuration, validation of CLI
//! parameters, exports, and I/O.

use thiserror::Error;

/// Main error type for costctl
#[derive(Error, Debug)]
pub enum CostctlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse price file: {0}")]
    PriceFile(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CostctlError>;
