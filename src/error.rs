//! Error types for courier_http.
//!
//! Every exchange that does not end in a 2xx response settles with exactly one
//! [`HttpError`]. The two outcome kinds callers branch on are:
//!
//! | Kind | Cause |
//! |------|-------|
//! | [`AbortionError`] | The exchange was cancelled before or during flight |
//! | [`AugmentedError`] | Network failure, non-2xx status or timeout |
//!
//! Network failures, error statuses and timeouts are collapsed into one kind and are
//! told apart only by `status`/`status_text` (a network failure reports status `0`).
//!
//! Two further variants cover problems found before anything is sent
//! ([`ConfigError`]) and payload decoding requested after a successful exchange.

use crate::protocol::is_success_status;
use crate::types::{HttpResponse, Payload, ResponseInit};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Result type alias for courier_http operations.
pub type Result<T> = std::result::Result<T, HttpError>;

/// Top-level error returned by every client operation.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The exchange was cancelled.
    #[error(transparent)]
    Aborted(#[from] AbortionError),

    /// The exchange completed unsuccessfully.
    #[error(transparent)]
    Failed(#[from] AugmentedError),

    /// The request could not be configured.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A successful payload could not be decoded into the requested type.
    #[error("failed to decode response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl HttpError {
    /// Stable name for programmatic branching.
    pub fn name(&self) -> &'static str {
        match self {
            HttpError::Aborted(_) => AbortionError::NAME,
            HttpError::Failed(_) => AugmentedError::NAME,
            HttpError::Config(_) => "ConfigError",
            HttpError::Decode(_) => "DecodeError",
        }
    }

    /// Whether the exchange was cancelled.
    pub fn is_abort(&self) -> bool {
        matches!(self, HttpError::Aborted(_))
    }

    /// HTTP status of a failed exchange, if the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Failed(e) => Some(e.status()),
            _ => None,
        }
    }

    /// Render the failure payload callers see, tagged with `name`.
    ///
    /// Returns `None` for configuration and decoding errors, which never
    /// reach the transport.
    pub fn failure_payload(&self) -> Option<serde_json::Value> {
        let failure = match self {
            HttpError::Aborted(e) => Failure::AbortionError(e),
            HttpError::Failed(e) => Failure::AugmentedError(e),
            _ => return None,
        };
        serde_json::to_value(failure).ok()
    }
}

#[derive(Serialize)]
#[serde(tag = "name")]
enum Failure<'a> {
    AbortionError(&'a AbortionError),
    AugmentedError(&'a AugmentedError),
}

/// Cancellation of an exchange, before or during flight.
///
/// Always terminal; the client never retries.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct AbortionError {
    url: String,
    message: String,
    ok: bool,
}

impl AbortionError {
    /// Error name reported in failure payloads.
    pub const NAME: &'static str = "AbortionError";

    /// Create an abortion error for the request URL.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let message = format!("Request \"{}\" aborted.", url);
        AbortionError {
            url,
            message,
            ok: false,
        }
    }

    /// URL of the cancelled request.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Human readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A completed exchange that did not succeed.
///
/// Carries the response metadata that was available when the exchange
/// ended, plus the raw payload (if any) under `error`.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct AugmentedError {
    #[serde(flatten)]
    response: HttpResponse,
    error: Payload,
    message: String,
}

impl AugmentedError {
    /// Error name reported in failure payloads.
    pub const NAME: &'static str = "AugmentedError";

    /// Build an augmented error from response metadata and the raw payload.
    ///
    /// The message is `Request "<url>" failed.` followed by the status and
    /// status text when the status is not a success status.
    pub fn new(init: ResponseInit, error: Payload) -> Self {
        let mut response = HttpResponse::new(init);
        let url = response.url().unwrap_or_default();

        let mut message = format!("Request \"{}\" failed.", url);
        if !is_success_status(response.status()) {
            message = format!("{} {} {}", message, response.status(), response.status_text());
            message.truncate(message.trim_end().len());
        }

        response.ok = false;
        AugmentedError {
            response,
            error,
            message,
        }
    }

    /// HTTP status, `0` for network failures and timeouts.
    pub fn status(&self) -> u16 {
        self.response.status()
    }

    /// HTTP status text.
    pub fn status_text(&self) -> &str {
        self.response.status_text()
    }

    /// Response headers, empty when none were received.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        self.response.headers()
    }

    /// URL of the failed exchange.
    pub fn url(&self) -> Option<&str> {
        self.response.url()
    }

    /// Always `false`.
    pub fn ok(&self) -> bool {
        self.response.ok()
    }

    /// Raw response payload, `Payload::Null` when nothing was received.
    pub fn error(&self) -> &Payload {
        &self.error
    }

    /// Human readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Problems detected while building a request, before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A header name is empty or contains invalid characters.
    #[error("'{0}' is an invalid HTTP request header")]
    InvalidHeaderName(String),

    /// A header value contains invalid characters.
    #[error("invalid value for HTTP request header '{0}'")]
    InvalidHeaderValue(String),

    /// A header value is empty or whitespace.
    #[error("HTTP request header '{0}' has an empty value")]
    EmptyHeaderValue(String),

    /// The request URL could not be parsed.
    #[error("invalid request url '{url}': {reason}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The underlying transport could not be built.
    #[error("transport configuration failed: {0}")]
    Transport(String),

    /// Client configuration could not be parsed.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn failure(status: u16, status_text: &str) -> AugmentedError {
        AugmentedError::new(
            ResponseInit {
                status: Some(status),
                status_text: Some(status_text.to_string()),
                url: Some("http://example.com/people".to_string()),
                ..Default::default()
            },
            Payload::Null,
        )
    }

    #[test]
    fn test_abortion_message() {
        let err = AbortionError::new("http://example.com/a");
        assert_eq!(err.message(), "Request \"http://example.com/a\" aborted.");
        assert_eq!(err.url(), "http://example.com/a");
    }

    #[test]
    fn test_augmented_message_includes_status() {
        let err = failure(404, "Not Found");
        assert_eq!(
            err.message(),
            "Request \"http://example.com/people\" failed. 404 Not Found"
        );
        assert!(!err.ok());
    }

    #[test]
    fn test_augmented_message_network_failure() {
        let err = failure(0, "");
        assert_eq!(err.message(), "Request \"http://example.com/people\" failed. 0");
        assert_eq!(err.status(), 0);
    }

    #[test]
    fn test_augmented_message_success_status() {
        let err = failure(204, "No Content");
        assert_eq!(err.message(), "Request \"http://example.com/people\" failed.");
        assert!(!err.ok());
    }

    #[test]
    fn test_error_names() {
        let aborted: HttpError = AbortionError::new("u").into();
        let failed: HttpError = failure(500, "Internal Server Error").into();
        assert_eq!(aborted.name(), "AbortionError");
        assert!(aborted.is_abort());
        assert_eq!(failed.name(), "AugmentedError");
        assert_eq!(failed.status(), Some(500));
    }

    #[test]
    fn test_failure_payload_shape() {
        let failed: HttpError = failure(404, "Not Found").into();
        let payload = failed.failure_payload().unwrap();
        assert_eq!(payload["name"], "AugmentedError");
        assert_eq!(payload["status"], 404);
        assert_eq!(payload["statusText"], "Not Found");
        assert_eq!(payload["ok"], false);
        assert_eq!(payload["url"], "http://example.com/people");
        assert_eq!(payload["error"], json!(null));

        let aborted: HttpError = AbortionError::new("http://x/").into();
        let payload = aborted.failure_payload().unwrap();
        assert_eq!(payload["name"], "AbortionError");
        assert_eq!(payload["ok"], false);
        assert_eq!(payload["message"], "Request \"http://x/\" aborted.");
    }

    #[test]
    fn test_config_error_has_no_payload() {
        let err: HttpError = ConfigError::EmptyHeaderValue("Accept".into()).into();
        assert!(err.failure_payload().is_none());
        assert_eq!(err.name(), "ConfigError");
    }
}
