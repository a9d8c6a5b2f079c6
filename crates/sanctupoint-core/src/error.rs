// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for SanctuPoint.

use thiserror::Error;

/// The primary error type used across all SanctuPoint adapter traits and
/// screen controllers.
#[derive(Debug, Error)]
pub enum SanctuError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Data service errors surfaced with the service's raw message.
    #[error("{message}")]
    Service {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A write was rejected before dispatch (missing or malformed field).
    #[error("{message}")]
    Validation { message: String },

    /// A lookup matched nothing.
    #[error("{message}")]
    NotFound { entity: String, message: String },

    /// A navigation transition that the current session does not allow.
    #[error("navigation error: {0}")]
    Navigation(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification used when presenting an error to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkOrService,
    Validation,
    NotFound,
    Navigation,
    Internal,
}

impl SanctuError {
    /// Shorthand for a [`SanctuError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`SanctuError::NotFound`].
    pub fn not_found(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`SanctuError::Service`] without an underlying source.
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            message: message.into(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Storage { .. } | Self::Service { .. } | Self::Timeout { .. } => {
                ErrorKind::NetworkOrService
            }
            Self::Validation { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Navigation(_) => ErrorKind::Navigation,
            Self::Config(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }
}
