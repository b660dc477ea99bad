#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

//! # GLB Transfer
//!
//! Client for a GLB file server: moves binary 3D models over HTTP as
//! base64 inside JSON envelopes.
//!
//! ## Architecture
//!
//! - **[`codec`]** - binary <-> base64 conversion
//! - **[`envelope`]** - request/response shapes exchanged with the server
//! - **[`client`]** - [`TransferClient`] and its operations
//! - **[`task`]** - cancellable background transfers
//! - **[`local`]** - file reads and atomic file writes
//! - **[`config`]** - persisted configuration
//! - **[`error`]** - error taxonomy
//! - **[`cli`]** - command-line arguments for the `glb-transfer` binary

pub mod cli;
pub mod client;
pub mod codec;
pub mod config;
pub mod envelope;
pub mod error;
pub mod local;
pub mod task;

/// Error type alias for convenience
pub use error::{Operation, Result, TransferError};

/// Client types re-exported for convenience
pub use client::{ClientConfig, TransferClient};

/// Configuration type alias for convenience
pub use config::Config;

pub use envelope::{DownloadedAsset, RawResponse, UploadReceipt};
pub use task::TransferTask;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "glb-transfer";
