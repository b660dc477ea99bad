//! Request/response shapes exchanged with the GLB file server

use crate::codec;
use crate::error::{Operation, Result, TransferError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Body of `POST /upload-glb/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequest {
    /// Base name of the uploaded file
    pub name: String,
    /// Free-form description, may be empty
    pub description: String,
    /// Base64-encoded file content
    pub data: String,
}

impl UploadRequest {
    /// Build an envelope around raw file content
    pub fn new(name: impl Into<String>, description: impl Into<String>, content: &[u8]) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            data: codec::encode(content),
        }
    }
}

/// Body of `GET /download-glb/{id}`
///
/// Only `success` is always required. The asset fields are checked by
/// [`DownloadResponse::into_content`] once the server reports success.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DownloadResponse {
    /// Name the asset was stored under
    #[serde(default)]
    pub name: Option<String>,
    /// Stored description; `null` and absent are both accepted
    #[serde(default)]
    pub description: Option<String>,
    /// Base64-encoded content
    #[serde(default)]
    pub data: Option<String>,
    /// Content length in bytes before encoding
    #[serde(default)]
    pub file_size: Option<u64>,
    /// Whether the server found and returned the asset
    pub success: bool,
}

/// A fully validated download: metadata plus decoded content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadContent {
    /// Name the asset was stored under
    pub name: String,
    /// Stored description, empty when the server had none
    pub description: String,
    /// Decoded GLB bytes
    pub bytes: Vec<u8>,
}

impl DownloadResponse {
    /// Parse a response body
    ///
    /// # Errors
    ///
    /// [`TransferError::Protocol`] when the body is not JSON or lacks `success`.
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| TransferError::Protocol {
            operation: Operation::Download,
            reason: format!("malformed download envelope: {e}"),
            body: Some(body.to_string()),
        })
    }

    /// Validate and decode a successful response
    ///
    /// `target` names what was requested (`id 3`, `name model.glb`) and is
    /// only used for error context. `body` is the raw response text.
    ///
    /// # Errors
    ///
    /// - [`TransferError::RemoteDownloadFailed`] if `success` is false; `data` is never touched
    /// - [`TransferError::Protocol`] if `name` or `data` is missing, or `file_size` disagrees with the content
    /// - [`TransferError::Decode`] if `data` is not valid base64
    pub fn into_content(self, target: &str, body: &str) -> Result<DownloadContent> {
        if !self.success {
            return Err(TransferError::RemoteDownloadFailed {
                target: target.to_string(),
                body: body.to_string(),
            });
        }

        let missing = |field: &str| TransferError::Protocol {
            operation: Operation::Download,
            reason: format!("successful response for {target} has no '{field}'"),
            body: Some(body.to_string()),
        };
        let name = self.name.ok_or_else(|| missing("name"))?;
        let data = self.data.ok_or_else(|| missing("data"))?;

        let bytes = codec::decode(&data).map_err(|source| TransferError::Decode {
            operation: Operation::Download,
            source,
            body: Some(body.to_string()),
        })?;

        if let Some(expected) = self.file_size {
            if expected != bytes.len() as u64 {
                return Err(TransferError::Protocol {
                    operation: Operation::Download,
                    reason: format!(
                        "file_size is {expected} but data decodes to {} bytes",
                        bytes.len()
                    ),
                    body: Some(body.to_string()),
                });
            }
        }

        Ok(DownloadContent {
            name,
            description: self.description.unwrap_or_default(),
            bytes,
        })
    }
}

/// Opaque response body of a pass-through call (list, health, info, delete)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code (always 2xx)
    pub status: u16,
    /// Response body, verbatim
    pub body: String,
}

impl RawResponse {
    /// Parse the body as untyped JSON, for callers that want to inspect it
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the body is not JSON.
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}

/// Outcome of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Name the file was uploaded as
    pub name: String,
    /// Size of the file content before encoding
    pub bytes_sent: u64,
    /// Server acknowledgment, not interpreted
    pub response: RawResponse,
}

/// Outcome of a successful download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedAsset {
    /// Where the content was written
    pub save_path: PathBuf,
    /// Name the asset was stored under
    pub name: String,
    /// Stored description
    pub description: String,
    /// Number of bytes written
    pub file_size: u64,
}
