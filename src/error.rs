//! Error types and handling for the HopCache client
//!
//! Provides structured error types for all cache operations so callers can
//! branch on the failure kind instead of string-matching messages.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for HopCache client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Error taxonomy for HopCache client operations
///
/// Every operation surfaces exactly one of these kinds; nothing is retried
/// or swallowed inside the client.
#[derive(Error, Debug)]
pub enum ClientError {
    // ═══════════════════════════════════════════════════════════════
    // Network & Service Errors
    // ═══════════════════════════════════════════════════════════════
    /// Network-level failure before a usable response was received
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx status or an in-band rejection reported by the service
    #[error("service error (status {status}): {message}")]
    Service {
        /// HTTP status the reply carried (200 for in-band rejections)
        status: u16,
        /// Message reported by the service
        message: String,
    },

    /// Get on a key the service holds no entry for
    #[error("key not found: {key}")]
    NotFound {
        /// The key that was requested
        key: String,
    },

    // ═══════════════════════════════════════════════════════════════
    // Encoding & Decoding
    // ═══════════════════════════════════════════════════════════════
    /// A value could not be serialized for transport
    #[error("encode error: {0}")]
    Encode(String),

    /// A response body could not be parsed into the expected shape
    #[error("decode error: {0}")]
    Decode(String),

    // ═══════════════════════════════════════════════════════════════
    // Validation & Input Errors
    // ═══════════════════════════════════════════════════════════════
    /// Keys must be non-empty
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Invalid input argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // ═══════════════════════════════════════════════════════════════
    // Configuration Errors
    // ═══════════════════════════════════════════════════════════════
    /// Failed to read configuration file
    #[error("failed to read config from {path}: {reason}")]
    ConfigRead {
        /// Path that was read
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },

    /// Failed to write configuration file
    #[error("failed to write config to {path}: {reason}")]
    ConfigWrite {
        /// Path that was written
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) | Self::InvalidKey(_) => 2,
            Self::ConfigRead { .. } | Self::ConfigWrite { .. } | Self::InvalidConfig(_) => 3,
            Self::Transport(_) => 4,
            Self::Service { .. } => 5,
            Self::NotFound { .. } => 6,
            Self::Encode(_) | Self::Decode(_) => 7,
            Self::Internal(_) => 1,
        }
    }

    /// Whether the error is worth retrying by a caller that owns a retry
    /// policy (the client itself never retries)
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Service { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() {
            Self::Decode(format!("JSON syntax error: {err}"))
        } else {
            Self::Decode(err.to_string())
        }
    }
}

impl From<base64::DecodeError> for ClientError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(format!("base64 decode error: {err}"))
    }
}
