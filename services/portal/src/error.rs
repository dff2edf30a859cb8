//! services/portal/src/error.rs
//!
//! Defines the primary error type for the portal client.

use crate::config::ConfigError;
use crate::views::ViewError;
use alumnos_core::ports::PortError;

/// The primary error type for the `portal` application.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// A view refused the action or asked for a redirect.
    #[error("{0}")]
    View(#[from] ViewError),

    /// Represents an error from the underlying HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents a standard Input/Output error (e.g. reading a file to upload).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
