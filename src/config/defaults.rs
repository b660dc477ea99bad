//! Default configuration values

/// Default GLB file server URL
pub fn default_server_url() -> String {
    "http://localhost:8000".to_string()
}

/// Default request timeout in seconds
pub const fn default_timeout() -> u64 {
    300 // 5 minutes, large models are sent as a single JSON body
}

/// Environment variable overriding the server URL
pub const SERVER_URL_ENV: &str = "GLB_TRANSFER_URL";
