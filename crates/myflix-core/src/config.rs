//! Client configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// API base URL baked in at build time (`MYFLIX_API_URL` during compilation).
pub const DEFAULT_API_URL: &str = match option_env!("MYFLIX_API_URL") {
    Some(url) => url,
    None => "https://myflix-movies-api.herokuapp.com/",
};

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Resolved configuration for one client instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the myFlix API
    pub api_url: String,
    /// Directory holding the durable session entries
    pub storage_dir: PathBuf,
    /// Per-request timeout enforced by the transport
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage_dir: storage_dir.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
