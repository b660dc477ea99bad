//! Error types and handling for GLB transfers
//!
//! Every failure a transfer can produce is a variant of [`TransferError`].
//! Remote-operation variants carry the [`Operation`] they came from and, when
//! the server answered, its raw response body.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for GLB transfer operations
pub type Result<T> = std::result::Result<T, TransferError>;

/// The remote operation an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `POST /upload-glb/`
    Upload,
    /// `GET /download-glb/{id}` and `GET /download-glb-by-name/{name}`
    Download,
    /// `GET /list-glb/`
    List,
    /// `GET /health` and `GET /health/detailed`
    Health,
    /// `GET /glb-info/{id}`
    Info,
    /// `DELETE /delete-glb/{id}`
    Delete,
}

impl Operation {
    /// Short lowercase name, used in log fields and error messages
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Download => "download",
            Self::List => "list",
            Self::Health => "health check",
            Self::Info => "file info",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comprehensive error types for GLB transfer operations
#[derive(Error, Debug)]
pub enum TransferError {
    // ═══════════════════════════════════════════════════════════════
    // Local File Errors
    // ═══════════════════════════════════════════════════════════════
    /// Source file missing or unreadable; no request was sent
    #[error("{operation} failed: cannot read {path}: {source}")]
    FileRead {
        operation: Operation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote fetch succeeded but the decoded asset could not be saved
    #[error("Downloaded '{name}' ({file_size} bytes) but failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        name: String,
        file_size: u64,
        #[source]
        source: std::io::Error,
    },

    // ═══════════════════════════════════════════════════════════════
    // Encoding & Protocol Errors
    // ═══════════════════════════════════════════════════════════════
    /// Payload was not valid base64
    #[error("{operation} failed: invalid base64 payload: {source}")]
    Decode {
        operation: Operation,
        #[source]
        source: base64::DecodeError,
        body: Option<String>,
    },

    /// Response body was not the expected JSON envelope
    #[error("{operation} failed: invalid response: {reason}")]
    Protocol {
        operation: Operation,
        reason: String,
        body: Option<String>,
    },

    /// Server answered the download with `success: false`
    #[error("Server reported download of {target} failed")]
    RemoteDownloadFailed { target: String, body: String },

    // ═══════════════════════════════════════════════════════════════
    // Network & HTTP Errors
    // ═══════════════════════════════════════════════════════════════
    /// Server answered with a non-2xx status
    #[error("{operation} failed: HTTP {status}: {body}")]
    Status {
        operation: Operation,
        status: u16,
        body: String,
    },

    /// Connection, DNS or transport failure; no response was received
    #[error("{operation} failed: {reason}")]
    Network { operation: Operation, reason: String },

    /// The exchange did not finish within the configured timeout
    #[error("{operation} timed out after {}s", .timeout.as_secs_f64())]
    Timeout {
        operation: Operation,
        timeout: Duration,
    },

    /// Cancelled while the exchange was in flight
    #[error("{operation} cancelled")]
    Cancelled { operation: Operation },

    // ═══════════════════════════════════════════════════════════════
    // Configuration & Input Errors
    // ═══════════════════════════════════════════════════════════════
    /// Failed to read configuration file
    #[error("Failed to read config from {path}: {reason}")]
    ConfigRead { path: PathBuf, reason: String },

    /// Failed to write configuration file
    #[error("Failed to write config to {path}: {reason}")]
    ConfigWrite { path: PathBuf, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid input argument, rejected before any I/O
    #[error("{operation} failed: invalid argument: {reason}")]
    InvalidArgument { operation: Operation, reason: String },

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TransferError {
    /// The remote operation this error belongs to, if any
    #[must_use]
    pub const fn operation(&self) -> Option<Operation> {
        match self {
            Self::FileRead { operation, .. }
            | Self::InvalidArgument { operation, .. }
            | Self::Decode { operation, .. }
            | Self::Protocol { operation, .. }
            | Self::Status { operation, .. }
            | Self::Network { operation, .. }
            | Self::Timeout { operation, .. }
            | Self::Cancelled { operation } => Some(*operation),
            Self::RemoteDownloadFailed { .. } | Self::FileWrite { .. } => {
                Some(Operation::Download)
            }
            _ => None,
        }
    }

    /// Raw server response body, populated only when a response was received
    #[must_use]
    pub fn server_body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } | Self::RemoteDownloadFailed { body, .. } => Some(body),
            Self::Protocol { body, .. } | Self::Decode { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Whether the remote side of the exchange fully succeeded
    ///
    /// True only for a download whose asset was fetched and decoded but
    /// could not be persisted locally.
    #[must_use]
    pub const fn is_remote_ok(&self) -> bool {
        matches!(self, Self::FileWrite { .. })
    }

    /// Whether the error was caused by cancellation
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Get the exit code for this error
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } => 2,
            Self::ConfigRead { .. } | Self::ConfigWrite { .. } | Self::InvalidConfig(_) => 3,
            Self::Network { .. } => 4,
            Self::Status { .. } | Self::RemoteDownloadFailed { .. } => 5,
            Self::Protocol { .. } | Self::Decode { .. } => 6,
            Self::FileRead { .. } | Self::FileWrite { .. } => 7,
            Self::Timeout { .. } => 124,
            Self::Cancelled { .. } => 130,
            Self::Internal(_) => 1,
        }
    }

    /// Classify a transport-level reqwest failure
    pub(crate) fn network(operation: Operation, err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            return Self::Timeout { operation, timeout };
        }
        let reason = if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            format!("request failed: {err}")
        };
        Self::Network { operation, reason }
    }
}
