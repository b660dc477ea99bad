//! HTTP client for the GLB file server
//!
//! [`TransferClient`] implements the server's fixed API: upload, download
//! (by id or by name), list, health, file info and delete. Binary content
//! always travels base64-encoded inside a JSON envelope.
//!
//! Every call owns its request and response buffers, so calls can run
//! concurrently on clones of the same client. No call retries.

pub mod http;

use crate::codec;
use crate::envelope::{DownloadResponse, DownloadedAsset, RawResponse, UploadReceipt, UploadRequest};
use crate::error::{Operation, Result, TransferError};
use crate::local;
use crate::task::{suspend, TransferTask};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Url};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const UPLOAD_PATH: &str = "upload-glb/";
const DOWNLOAD_PATH: &str = "download-glb";
const DOWNLOAD_BY_NAME_PATH: &str = "download-glb-by-name";
const LIST_PATH: &str = "list-glb/";
const HEALTH_PATH: &str = "health";
const HEALTH_DETAILED_PATH: &str = "health/detailed";
const INFO_PATH: &str = "glb-info";
const DELETE_PATH: &str = "delete-glb";

/// Connection settings for a [`TransferClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server root, e.g. `http://localhost:8000`; a trailing slash is optional
    pub base_url: String,
    /// Deadline for each exchange, connection and transfer together
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a config for `base_url` with the given timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Validate the URL and timeout
    ///
    /// # Errors
    ///
    /// [`TransferError::InvalidConfig`] for an empty or non-http(s) URL or a
    /// zero timeout.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(TransferError::InvalidConfig(
                "server url cannot be empty".to_string(),
            ));
        }
        let url = Url::parse(&self.base_url).map_err(|e| {
            TransferError::InvalidConfig(format!("invalid server url '{}': {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransferError::InvalidConfig(format!(
                "server url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.timeout.is_zero() {
            return Err(TransferError::InvalidConfig(
                "timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Client for the GLB file server
#[derive(Debug, Clone)]
pub struct TransferClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl TransferClient {
    /// Create a client from validated settings
    ///
    /// # Errors
    ///
    /// [`TransferError::InvalidConfig`] if `config` does not validate, or
    /// [`TransferError::Internal`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            http: http::create_client(config.timeout)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    /// Server root without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Per-exchange deadline
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Upload the file at `path` with an optional description
    ///
    /// The file is read and encoded before anything is sent, so a missing or
    /// unreadable file never reaches the network.
    ///
    /// # Errors
    ///
    /// - [`TransferError::InvalidArgument`] if `path` has no UTF-8 file name
    /// - [`TransferError::FileRead`] if the file cannot be read
    /// - [`TransferError::Status`] on a non-2xx answer (with the server body)
    /// - [`TransferError::Network`], [`TransferError::Timeout`], [`TransferError::Cancelled`]
    pub async fn upload(
        &self,
        path: &Path,
        description: &str,
        cancel: &CancellationToken,
    ) -> Result<UploadReceipt> {
        let name = local::base_name(Operation::Upload, path)?;
        let content = local::read_all_bytes(Operation::Upload, path).await?;
        if !codec::looks_like_glb(&content) {
            warn!(path = %path.display(), "file does not start with the GLB header; the server may reject it");
        }

        let request = UploadRequest::new(name.as_str(), description, &content);
        let body = serde_json::to_vec(&request).map_err(|e| TransferError::Protocol {
            operation: Operation::Upload,
            reason: format!("failed to encode upload envelope: {e}"),
            body: None,
        })?;

        let url = self.url(UPLOAD_PATH);
        info!(name = %name, bytes = content.len(), url = %url, "uploading");
        let request = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        let response = self.exchange(Operation::Upload, request, cancel).await?;

        info!(name = %name, status = response.status, "upload acknowledged");
        Ok(UploadReceipt {
            name,
            bytes_sent: content.len() as u64,
            response,
        })
    }

    /// Download asset `file_id` and save it to `save_path`
    ///
    /// `save_path` is written only after the response is fully received,
    /// parsed and decoded; any existing file there is replaced atomically.
    ///
    /// # Errors
    ///
    /// - [`TransferError::Protocol`] on a malformed envelope
    /// - [`TransferError::RemoteDownloadFailed`] if the server reports `success: false`
    /// - [`TransferError::Decode`] on invalid base64
    /// - [`TransferError::FileWrite`] if saving fails after a good fetch
    /// - [`TransferError::Status`], [`TransferError::Network`], [`TransferError::Timeout`], [`TransferError::Cancelled`]
    pub async fn download(
        &self,
        file_id: u64,
        save_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<DownloadedAsset> {
        let url = self.url(&format!("{DOWNLOAD_PATH}/{file_id}"));
        self.fetch_asset(url, format!("id {file_id}"), save_path, cancel)
            .await
    }

    /// Download an asset by its stored name; same contract as [`Self::download`]
    ///
    /// # Errors
    ///
    /// As [`Self::download`], plus [`TransferError::InvalidArgument`] for an empty name.
    pub async fn download_by_name(
        &self,
        name: &str,
        save_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<DownloadedAsset> {
        if name.is_empty() {
            return Err(TransferError::InvalidArgument {
                operation: Operation::Download,
                reason: "file name cannot be empty".to_string(),
            });
        }
        let url = self.url(&format!(
            "{DOWNLOAD_BY_NAME_PATH}/{}",
            urlencoding::encode(name)
        ));
        self.fetch_asset(url, format!("name {name}"), save_path, cancel)
            .await
    }

    async fn fetch_asset(
        &self,
        url: String,
        target: String,
        save_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<DownloadedAsset> {
        info!(target = %target, url = %url, "downloading");
        let request = self.http.get(&url);
        let raw = self.exchange(Operation::Download, request, cancel).await?;

        let content = DownloadResponse::parse(&raw.body)?.into_content(&target, &raw.body)?;
        if cancel.is_cancelled() {
            return Err(TransferError::Cancelled {
                operation: Operation::Download,
            });
        }

        let file_size = content.bytes.len() as u64;
        local::write_all_bytes(save_path, content.bytes)
            .await
            .map_err(|source| TransferError::FileWrite {
                path: save_path.to_path_buf(),
                name: content.name.clone(),
                file_size,
                source,
            })?;

        info!(target = %target, name = %content.name, bytes = file_size, path = %save_path.display(), "download saved");
        Ok(DownloadedAsset {
            save_path: save_path.to_path_buf(),
            name: content.name,
            description: content.description,
            file_size,
        })
    }

    /// List stored assets; the body is returned verbatim
    ///
    /// # Errors
    ///
    /// [`TransferError::Status`] (with body), [`TransferError::Network`],
    /// [`TransferError::Timeout`] or [`TransferError::Cancelled`].
    pub async fn list_files(&self, cancel: &CancellationToken) -> Result<RawResponse> {
        self.get_raw(Operation::List, LIST_PATH, cancel).await
    }

    /// Check server liveness; the body is returned verbatim
    ///
    /// # Errors
    ///
    /// As [`Self::list_files`].
    pub async fn check_health(&self, cancel: &CancellationToken) -> Result<RawResponse> {
        self.get_raw(Operation::Health, HEALTH_PATH, cancel).await
    }

    /// Detailed health report (database, cache); the body is returned verbatim
    ///
    /// # Errors
    ///
    /// As [`Self::list_files`].
    pub async fn check_health_detailed(&self, cancel: &CancellationToken) -> Result<RawResponse> {
        self.get_raw(Operation::Health, HEALTH_DETAILED_PATH, cancel)
            .await
    }

    /// Metadata for asset `file_id`, without its content
    ///
    /// # Errors
    ///
    /// As [`Self::list_files`].
    pub async fn file_info(&self, file_id: u64, cancel: &CancellationToken) -> Result<RawResponse> {
        self.get_raw(Operation::Info, &format!("{INFO_PATH}/{file_id}"), cancel)
            .await
    }

    /// Delete asset `file_id`
    ///
    /// # Errors
    ///
    /// As [`Self::list_files`].
    pub async fn delete(&self, file_id: u64, cancel: &CancellationToken) -> Result<RawResponse> {
        let url = self.url(&format!("{DELETE_PATH}/{file_id}"));
        info!(file_id, url = %url, "deleting");
        self.exchange(Operation::Delete, self.http.delete(&url), cancel)
            .await
    }

    async fn get_raw(
        &self,
        operation: Operation,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        let url = self.url(path);
        debug!(operation = %operation, url = %url, "requesting");
        self.exchange(operation, self.http.get(&url), cancel).await
    }

    /// Send `request` and read the whole body, under cancellation and deadline
    async fn exchange(
        &self,
        operation: Operation,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        let timeout = self.timeout;
        suspend(operation, cancel, timeout, async move {
            let response = request
                .send()
                .await
                .map_err(|e| TransferError::network(operation, &e, timeout))?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| TransferError::network(operation, &e, timeout))?;
            debug!(operation = %operation, status = status.as_u16(), bytes = body.len(), "response received");

            if !status.is_success() {
                warn!(operation = %operation, status = status.as_u16(), "server returned an error");
                return Err(TransferError::Status {
                    operation,
                    status: status.as_u16(),
                    body,
                });
            }
            Ok(RawResponse {
                status: status.as_u16(),
                body,
            })
        })
        .await
    }

    /// Run [`Self::upload`] as a cancellable background task
    #[must_use]
    pub fn spawn_upload(&self, path: PathBuf, description: String) -> TransferTask<UploadReceipt> {
        let client = self.clone();
        TransferTask::spawn(Operation::Upload, CancellationToken::new(), move |cancel| async move {
            client.upload(&path, &description, &cancel).await
        })
    }

    /// Run [`Self::download`] as a cancellable background task
    #[must_use]
    pub fn spawn_download(&self, file_id: u64, save_path: PathBuf) -> TransferTask<DownloadedAsset> {
        let client = self.clone();
        TransferTask::spawn(Operation::Download, CancellationToken::new(), move |cancel| async move {
            client.download(file_id, &save_path, &cancel).await
        })
    }

    /// Run [`Self::download_by_name`] as a cancellable background task
    #[must_use]
    pub fn spawn_download_by_name(&self, name: String, save_path: PathBuf) -> TransferTask<DownloadedAsset> {
        let client = self.clone();
        TransferTask::spawn(Operation::Download, CancellationToken::new(), move |cancel| async move {
            client.download_by_name(&name, &save_path, &cancel).await
        })
    }

    /// Run [`Self::list_files`] as a cancellable background task
    #[must_use]
    pub fn spawn_list(&self) -> TransferTask<RawResponse> {
        let client = self.clone();
        TransferTask::spawn(Operation::List, CancellationToken::new(), move |cancel| async move {
            client.list_files(&cancel).await
        })
    }

    /// Run [`Self::check_health`] as a cancellable background task
    #[must_use]
    pub fn spawn_health(&self) -> TransferTask<RawResponse> {
        let client = self.clone();
        TransferTask::spawn(Operation::Health, CancellationToken::new(), move |cancel| async move {
            client.check_health(&cancel).await
        })
    }
}
