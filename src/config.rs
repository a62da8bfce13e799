//! Configuration options for the Marlin client

use marlin_rust_core::{DeviceInfo, DEFAULT_TIMEOUT};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the Marlin client: one base URL per hosted service,
/// plus client options.
#[derive(Debug, Clone)]
pub struct MarlinConfig {
    /// Base URL of the auth service
    pub auth_url: String,

    /// Base URL of the news service
    pub news_url: String,

    /// Base URL of the social scheduling service
    pub social_url: String,

    /// Client options
    pub options: ClientOptions,
}

impl MarlinConfig {
    /// Create a new configuration with default options
    pub fn new(auth_url: &str, news_url: &str, social_url: &str) -> Self {
        Self {
            auth_url: auth_url.to_string(),
            news_url: news_url.to_string(),
            social_url: social_url.to_string(),
            options: ClientOptions::default(),
        }
    }

    /// Replace the client options
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }
}

/// Client options shared by all service clients
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The fixed request timeout (no retry, no backoff)
    pub request_timeout: Duration,

    /// Path of the durable storage file; in-memory storage when absent
    pub storage_path: Option<PathBuf>,

    /// Device identity used for the User-Agent and fingerprint headers
    pub device: DeviceInfo,

    /// Delay before a search-text change triggers a fetch
    pub search_debounce: Duration,

    /// Page size used by the debounced search
    pub search_page_size: u32,

    /// Maximum number of persisted recent searches
    pub recent_search_limit: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_TIMEOUT,
            storage_path: None,
            device: DeviceInfo::detect("marlin-rust", env!("CARGO_PKG_VERSION")),
            search_debounce: Duration::from_millis(500),
            search_page_size: 50,
            recent_search_limit: 10,
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Duration) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the durable storage path
    pub fn with_storage_path(mut self, value: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(value.into());
        self
    }

    /// Set the device identity
    pub fn with_device(mut self, value: DeviceInfo) -> Self {
        self.device = value;
        self
    }

    /// Set the search debounce delay
    pub fn with_search_debounce(mut self, value: Duration) -> Self {
        self.search_debounce = value;
        self
    }
}
