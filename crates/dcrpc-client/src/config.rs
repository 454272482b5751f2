//! Client configuration.

use std::time::Duration;

use dcrpc_transport_traits::LimitsConfig;
use serde::{Deserialize, Serialize};

/// Configuration for a [`Client`](crate::Client).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Deadline applied to calls whose context carries none.
    /// `None` = wait until the response or cancellation
    pub request_timeout: Option<Duration>,

    /// Request and response size limits.
    pub limits: LimitsConfig,
}

impl ClientConfig {
    /// Sets the default request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the size limits.
    #[must_use]
    pub fn with_limits(mut self, limits: LimitsConfig) -> Self {
        self.limits = limits;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_timeout() {
        let config = ClientConfig::default();
        assert!(config.request_timeout.is_none());
        assert_eq!(config.limits, LimitsConfig::default());
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::default()
            .with_request_timeout(Duration::from_secs(30))
            .with_limits(LimitsConfig::unlimited());
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.limits.max_request_size, None);
    }

    #[test]
    fn test_deserialize_from_json() {
        let config: ClientConfig = serde_json::from_value(serde_json::json!({
            "request_timeout": {"secs": 5, "nanos": 0},
            "limits": {"max_request_size": 1024, "max_response_size": null}
        }))
        .unwrap();
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.limits.max_request_size, Some(1024));
    }
}
