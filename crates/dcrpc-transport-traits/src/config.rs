//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// Configuration for request and response size limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum response body size in bytes.
    /// `None` = unlimited
    pub max_response_size: Option<usize>,

    /// Maximum request body size in bytes.
    /// `None` = unlimited
    pub max_request_size: Option<usize>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        // Full blocks travel hex-encoded in both directions.
        Self {
            max_response_size: Some(32 * 1024 * 1024), // 32MB
            max_request_size: Some(8 * 1024 * 1024),   // 8MB
        }
    }
}

impl LimitsConfig {
    /// Create a configuration with no limits.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_response_size: None,
            max_request_size: None,
        }
    }

    /// Create a configuration with strict limits for untrusted endpoints.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            max_response_size: Some(4 * 1024 * 1024), // 4MB
            max_request_size: Some(1024 * 1024),      // 1MB
        }
    }

    /// Sets the maximum request size.
    #[must_use]
    pub const fn with_max_request_size(mut self, max: Option<usize>) -> Self {
        self.max_request_size = max;
        self
    }

    /// Sets the maximum response size.
    #[must_use]
    pub const fn with_max_response_size(mut self, max: Option<usize>) -> Self {
        self.max_response_size = max;
        self
    }
}
