//! [`Transport`] backed by `reqwest`.
//!
//! Configuration calls are recorded and turned into a
//! `reqwest::RequestBuilder` when the exchange is sent. The request then runs
//! on a spawned tokio task that streams the body and reports progress, so
//! `abort()` and `Drop` can cancel it by aborting the task.

use super::{EventSink, Progress, ReadyState, Transport, TransportEvent, TransportFactory, TransportResponse};
use crate::client::ClientConfig;
use crate::error::{ConfigError, Result};
use crate::protocol::headers::format_raw_headers;
use crate::protocol::{Method, ResponseType};
use crate::types::{Credentials, Payload};
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use http::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

/// Creates [`ReqwestTransport`]s sharing two `reqwest` clients.
///
/// One client keeps a cookie store and is used when `with_credentials` is
/// set; the other never sends or stores cookies.
#[derive(Debug, Clone)]
pub struct ReqwestTransportFactory {
    client: reqwest::Client,
    anonymous: reqwest::Client,
}

impl ReqwestTransportFactory {
    /// Build both clients from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Transport`] if the proxy URL is invalid or the
    /// TLS backend cannot be initialised.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Self::builder(config)?
            .cookie_store(true)
            .build()
            .map_err(|e| ConfigError::Transport(e.to_string()))?;
        let anonymous = Self::builder(config)?
            .build()
            .map_err(|e| ConfigError::Transport(e.to_string()))?;

        Ok(ReqwestTransportFactory { client, anonymous })
    }

    fn builder(config: &ClientConfig) -> Result<reqwest::ClientBuilder> {
        let mut builder = reqwest::Client::builder();
        if !config.proxy_url.is_empty() {
            let proxy = reqwest::Proxy::all(&config.proxy_url)
                .map_err(|e| ConfigError::Transport(e.to_string()))?;
            builder = builder.proxy(proxy);
        }
        Ok(builder)
    }
}

impl Default for ReqwestTransportFactory {
    fn default() -> Self {
        ReqwestTransportFactory {
            client: reqwest::Client::new(),
            anonymous: reqwest::Client::new(),
        }
    }
}

impl TransportFactory for ReqwestTransportFactory {
    fn create(&self) -> Box<dyn Transport> {
        Box::new(ReqwestTransport::new(self.client.clone(), self.anonymous.clone()))
    }
}

/// One exchange carried by `reqwest`.
#[derive(Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    anonymous: reqwest::Client,
    target: Option<(Method, Url)>,
    credentials: Option<Credentials>,
    headers: HeaderMap,
    with_credentials: bool,
    response_type: ResponseType,
    timeout: Option<Duration>,
    sink: Option<EventSink>,
    task: Option<JoinHandle<()>>,
}

impl ReqwestTransport {
    fn new(client: reqwest::Client, anonymous: reqwest::Client) -> Self {
        ReqwestTransport {
            client,
            anonymous,
            target: None,
            credentials: None,
            headers: HeaderMap::new(),
            with_credentials: false,
            response_type: ResponseType::default(),
            timeout: None,
            sink: None,
            task: None,
        }
    }
}

impl Transport for ReqwestTransport {
    fn open(&mut self, method: Method, url: &Url, credentials: Option<&Credentials>) -> Result<()> {
        self.target = Some((method, url.clone()));
        self.credentials = credentials.filter(|c| !c.is_empty()).cloned();
        Ok(())
    }

    fn set_request_header(&mut self, name: &HeaderName, value: &HeaderValue) {
        self.headers.insert(name.clone(), value.clone());
    }

    fn set_with_credentials(&mut self, with_credentials: bool) {
        self.with_credentials = with_credentials;
    }

    fn set_response_type(&mut self, response_type: ResponseType) {
        self.response_type = response_type;
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    fn send(&mut self, body: Option<Bytes>, sink: EventSink) {
        let Some((method, url)) = self.target.clone() else {
            sink.emit(TransportEvent::Error(TransportResponse::failed()));
            return;
        };

        let client = if self.with_credentials {
            &self.client
        } else {
            &self.anonymous
        };
        let mut builder = client
            .request(method.into(), url)
            .headers(std::mem::take(&mut self.headers));

        if let Some(credentials) = &self.credentials {
            builder = builder.basic_auth(
                credentials.username.clone().unwrap_or_default(),
                credentials.password.clone(),
            );
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        tracing::trace!(%method, "reqwest transport sending");
        self.sink = Some(sink.clone());
        self.task = Some(tokio::spawn(run(builder, self.response_type, sink)));
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            if let Some(sink) = self.sink.take() {
                sink.emit(TransportEvent::Abort);
            }
        }
    }
}

impl Drop for ReqwestTransport {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(builder: reqwest::RequestBuilder, response_type: ResponseType, sink: EventSink) {
    let response = match builder.send().await {
        Ok(response) => response,
        Err(e) => {
            sink.emit(failure(&e, TransportResponse::failed()));
            return;
        }
    };

    let status = response.status();
    let mut snapshot = TransportResponse {
        ready_state: ReadyState::HeadersReceived,
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        raw_headers: format_raw_headers(response.headers()),
        response_url: response.url().to_string(),
        body: Payload::Null,
    };

    let total = response.content_length();
    let mut loaded = 0u64;
    let mut buffer = BytesMut::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => {
                snapshot.ready_state = ReadyState::Loading;
                loaded += chunk.len() as u64;
                buffer.extend_from_slice(&chunk);
                if !sink.emit(TransportEvent::Progress(Progress { loaded, total })) {
                    return;
                }
            }
            Err(e) => {
                snapshot.status = 0;
                snapshot.status_text.clear();
                sink.emit(failure(&e, snapshot));
                return;
            }
        }
    }

    snapshot.ready_state = ReadyState::Done;
    snapshot.body = Payload::decode(response_type, buffer.freeze());
    sink.emit(TransportEvent::Load(snapshot));
}

fn failure(error: &reqwest::Error, snapshot: TransportResponse) -> TransportEvent {
    tracing::debug!(%error, timeout = error.is_timeout(), "reqwest transport failed");
    if error.is_timeout() {
        TransportEvent::Timeout(snapshot)
    } else {
        TransportEvent::Error(snapshot)
    }
}
