use crate::error::{Result, TransferError};
use reqwest::Client;
use std::time::Duration;

/// Create the HTTP client used for all transfers
///
/// - `timeout` bounds each request end to end (connect + body)
/// - Short TCP keep-alive, no Nagle delay
/// - Small idle pool; transfers are independent and need no warm connections
///
/// # Errors
///
/// Returns an error if the client cannot be built (e.g., TLS backend setup).
pub fn create_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(timeout)
        .user_agent(concat!("glb-transfer/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| TransferError::Internal(format!("Failed to create HTTP client: {e}")))
}
