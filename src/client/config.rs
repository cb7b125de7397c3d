//! Client configuration.

use crate::error::{ConfigError, Result};
use crate::protocol::ResponseType;
use serde::{Deserialize, Serialize};

/// Settings shared by every exchange a client issues.
///
/// The three `supports_*`/`track_*` flags select engine behavior that
/// otherwise would need separate client types.
///
/// # Examples
///
/// ```
/// use courier_http::client::ClientConfig;
///
/// let config = ClientConfig::from_json(r#"{ "request_timeout_ms": 2500, "track_all_handles": false }"#).unwrap();
/// assert_eq!(config.request_timeout_ms, 2500);
/// assert!(!config.track_all_handles);
/// assert!(config.supports_query_params);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Timeout applied when a request sets none. `0` disables it.
    pub request_timeout_ms: u64,
    /// Proxy for all traffic. Empty means no proxy.
    pub proxy_url: String,
    /// Log failed and cancelled exchanges at `warn` level.
    pub enable_logging: bool,
    /// Response type used when a request sets none.
    pub default_response_type: ResponseType,
    /// Encode `params` into the query string. When off, params are ignored.
    pub supports_query_params: bool,
    /// Forward download progress to the progress observer.
    pub supports_progress_events: bool,
    /// `abort()` on the client cancels every outstanding exchange when set,
    /// otherwise only the most recently issued one.
    pub track_all_handles: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            request_timeout_ms: 0,
            proxy_url: String::new(),
            enable_logging: true,
            default_response_type: ResponseType::Json,
            supports_query_params: true,
            supports_progress_events: true,
            track_all_handles: true,
        }
    }
}

impl ClientConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidConfig(e.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.request_timeout_ms, 0);
        assert!(config.supports_query_params);
        assert!(config.supports_progress_events);
        assert!(config.track_all_handles);
        assert_eq!(config.default_response_type, ResponseType::Json);
    }

    #[test]
    fn test_from_json_partial() {
        let config = ClientConfig::from_json(r#"{"default_response_type":"text"}"#).unwrap();
        assert_eq!(config.default_response_type, ResponseType::Text);
        assert!(config.enable_logging);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = ClientConfig::from_json("{ not json").unwrap_err();
        assert_eq!(err.name(), "ConfigError");
    }
}
