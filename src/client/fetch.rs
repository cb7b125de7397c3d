//! The client façade.
//!
//! [`HttpClient`] exposes one method per verb. Each one fixes the method,
//! merges the body argument into the options and hands the resulting
//! descriptor to the lifecycle engine.
//!
//! # Examples
//!
//! ## Simple GET request
//!
//! ```ignore
//! use courier_http::HttpClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::new();
//!     let people = client.get("https://swapi.dev/api/people", None).await?;
//!     println!("{:?}", people.as_json());
//!     Ok(())
//! }
//! ```
//!
//! ## Cancelling a group of requests
//!
//! ```ignore
//! use courier_http::{AbortController, HttpClient, RequestOptions};
//!
//! let client = HttpClient::new();
//! let controller = AbortController::new();
//! let options = RequestOptions::new().with_signal(&controller.signal());
//!
//! let pending = client.get("https://swapi.dev/api/planets", Some(options));
//! controller.abort();
//! assert!(pending.await.unwrap_err().is_abort());
//! ```

use crate::client::config::ClientConfig;
use crate::client::options::{normalize, with_body_argument, RequestOptions};
use crate::client::progress::{NoopObserver, ProgressObserver};
use crate::client::registry::HandleRegistry;
use crate::error::Result;
use crate::protocol::Method;
use crate::transport::{ReqwestTransportFactory, TransportFactory};
use crate::types::Payload;
use bytes::Bytes;
use std::sync::Arc;

/// HTTP client with cancellation-aware verb methods.
///
/// Cloning is cheap; clones share configuration, transport factory,
/// progress observer and the registry used by [`abort`](Self::abort).
#[derive(Clone)]
pub struct HttpClient {
    pub(super) config: Arc<ClientConfig>,
    pub(super) transports: Arc<dyn TransportFactory>,
    pub(super) registry: Arc<HandleRegistry>,
    pub(super) observer: Arc<dyn ProgressObserver>,
}

impl HttpClient {
    /// Create a client with default configuration
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration, backed by `reqwest`.
    ///
    /// Falls back to an unconfigured `reqwest` client if the configuration
    /// cannot be applied (for example an invalid proxy URL).
    pub fn with_config(config: ClientConfig) -> Self {
        let transports = ReqwestTransportFactory::new(&config).unwrap_or_else(|e| {
            tracing::warn!("falling back to default transport: {}", e);
            ReqwestTransportFactory::default()
        });
        Self::with_transport(config, Arc::new(transports))
    }

    /// Create a client with custom configuration and transport.
    pub fn with_transport(config: ClientConfig, transports: Arc<dyn TransportFactory>) -> Self {
        HttpClient {
            registry: Arc::new(HandleRegistry::new(config.track_all_handles)),
            config: Arc::new(config),
            transports,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Replace the progress observer.
    pub fn with_progress_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a `GET` request.
    pub async fn get(&self, url: &str, options: Option<RequestOptions>) -> Result<Payload> {
        self.request(normalize(Method::Get, url, options)).await
    }

    /// Send a `HEAD` request.
    pub async fn head(&self, url: &str, options: Option<RequestOptions>) -> Result<Payload> {
        self.request(normalize(Method::Head, url, options)).await
    }

    /// Send an `OPTIONS` request.
    pub async fn options(&self, url: &str, options: Option<RequestOptions>) -> Result<Payload> {
        self.request(normalize(Method::Options, url, options)).await
    }

    /// Send a `DELETE` request.
    ///
    /// Body-less by convention; a body set in the options is still sent.
    pub async fn delete(&self, url: &str, options: Option<RequestOptions>) -> Result<Payload> {
        self.request(normalize(Method::Delete, url, options)).await
    }

    /// Send a `POST` request. An empty body is not sent.
    pub async fn post(
        &self,
        url: &str,
        body: impl Into<Bytes>,
        options: Option<RequestOptions>,
    ) -> Result<Payload> {
        let options = with_body_argument(options, body.into());
        self.request(normalize(Method::Post, url, Some(options))).await
    }

    /// Send a `PUT` request. An empty body is not sent.
    pub async fn put(
        &self,
        url: &str,
        body: impl Into<Bytes>,
        options: Option<RequestOptions>,
    ) -> Result<Payload> {
        let options = with_body_argument(options, body.into());
        self.request(normalize(Method::Put, url, Some(options))).await
    }

    /// Send a `PATCH` request. An empty body is not sent.
    pub async fn patch(
        &self,
        url: &str,
        body: impl Into<Bytes>,
        options: Option<RequestOptions>,
    ) -> Result<Payload> {
        let options = with_body_argument(options, body.into());
        self.request(normalize(Method::Patch, url, Some(options))).await
    }

    /// Cancel outstanding exchanges issued by this client.
    ///
    /// With `track_all_handles` every outstanding exchange is cancelled,
    /// otherwise only the most recently issued one (if it is still in
    /// flight). Returns the number of exchanges cancelled.
    pub fn abort(&self) -> usize {
        let cancelled = self.registry.abort_outstanding();
        if self.config.enable_logging {
            tracing::info!("HTTP request was cancelled! ({} outstanding)", cancelled);
        }
        cancelled
    }

    /// Alias of [`abort`](Self::abort).
    pub fn cancel(&self) -> usize {
        self.abort()
    }

    /// Number of exchanges currently tracked for [`abort`](Self::abort).
    pub fn outstanding(&self) -> usize {
        self.registry.outstanding()
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.config().track_all_handles);
        assert_eq!(client.outstanding(), 0);
    }

    #[test]
    fn test_invalid_proxy_falls_back() {
        let config = ClientConfig {
            proxy_url: "::not a proxy::".into(),
            ..Default::default()
        };
        let client = HttpClient::with_config(config);
        assert_eq!(client.config().proxy_url, "::not a proxy::");
    }

    #[test]
    fn test_abort_without_requests() {
        let client = HttpClient::new();
        assert_eq!(client.abort(), 0);
        assert_eq!(client.cancel(), 0);
    }
}
