//! The request lifecycle engine.
//!
//! Every verb method of [`HttpClient`] drives one exchange through
//!
//! ```text
//! idle ─▶ signal-checked ─┬─▶ aborted-immediately ─────────────▶ settled
//!                         └─▶ configured ─▶ sent ─▶ (events) ─▶ settled
//! ```
//!
//! 1. The query string is appended (when params are present and supported).
//! 2. A signal that is already tripped settles with an abortion error; the
//!    transport is never created.
//! 3. A transport is allocated and the exchange is registered with the
//!    client's handle registry.
//! 4. The transport is configured: open, headers, credentials flag,
//!    response type, timeout.
//! 5. Abort listeners are attached to the caller's signal and to the
//!    registry signal. They post a cancellation marker into the same ordered
//!    channel the transport reports into.
//! 6. The body is sent and the first terminal event settles the exchange.
//!
//! Listeners and the registry entry are released by guards, so they are
//! removed whether the exchange resolves, rejects or is dropped mid-flight.

use super::fetch::HttpClient;
use super::options::RequestDescriptor;
use super::outcome;
use super::utils::append_query;
use crate::abort::{AbortSignal, ListenerGuard};
use crate::error::{AbortionError, ConfigError, Result};
use crate::transport::{EventSink, ExchangeEvent, Transport, TransportEvent, TransportResponse};
use crate::types::Payload;
use std::time::Duration;
use url::Url;

impl HttpClient {
    pub(crate) async fn request(&self, descriptor: RequestDescriptor) -> Result<Payload> {
        let url = self.resolve_url(&descriptor);

        if is_tripped(descriptor.signal()) {
            return self.settle(&descriptor, &url, Err(AbortionError::new(&url).into()));
        }

        let target = Url::parse(&url).map_err(|e| ConfigError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let mut transport = self.transports.create();
        let (client_signal, _registration) = self.registry.register();
        self.configure(transport.as_mut(), &descriptor, &target)?;

        let (sink, mut events) = EventSink::channel();
        let _caller_listener = descriptor.signal().map(|signal| {
            let canceller = sink.canceller();
            ListenerGuard::attach(signal, move || canceller.cancel())
        });
        let _client_listener = {
            let canceller = sink.canceller();
            ListenerGuard::attach(&client_signal, move || canceller.cancel())
        };

        // A trip between the first check and listener registration.
        if client_signal.is_aborted() || is_tripped(descriptor.signal()) {
            return self.settle(&descriptor, &url, Err(AbortionError::new(&url).into()));
        }

        tracing::debug!(method = %descriptor.method(), %url, "sending request");
        transport.send(descriptor.sendable_body().cloned(), sink);

        let report_progress = descriptor.report_progress() && self.config.supports_progress_events;
        let result: Result<Payload> = loop {
            let Some(event) = events.recv().await else {
                // Transport went away without reporting an outcome.
                break Err(outcome::augmented_error(TransportResponse::failed(), &url).into());
            };

            match event {
                ExchangeEvent::Cancelled => {
                    transport.abort();
                    break Err(AbortionError::new(&url).into());
                }
                ExchangeEvent::Transport(TransportEvent::Progress(progress)) => {
                    if report_progress {
                        self.observer.on_progress(&url, &progress);
                    }
                }
                ExchangeEvent::Transport(TransportEvent::Load(response)) => {
                    break outcome::classify(response, &url);
                }
                ExchangeEvent::Transport(TransportEvent::Error(response))
                | ExchangeEvent::Transport(TransportEvent::Timeout(response)) => {
                    break Err(outcome::augmented_error(response, &url).into());
                }
                ExchangeEvent::Transport(TransportEvent::Abort) => {
                    break Err(AbortionError::new(&url).into());
                }
            }
        };

        self.settle(&descriptor, &url, result)
    }

    fn resolve_url(&self, descriptor: &RequestDescriptor) -> String {
        let params = descriptor.params();
        if params.is_empty() {
            return descriptor.url().to_string();
        }
        if !self.config.supports_query_params {
            tracing::debug!(count = params.len(), "query params disabled, ignoring");
            return descriptor.url().to_string();
        }
        append_query(descriptor.url(), params)
    }

    fn configure(
        &self,
        transport: &mut dyn Transport,
        descriptor: &RequestDescriptor,
        target: &Url,
    ) -> Result<()> {
        transport.open(descriptor.method(), target, descriptor.credentials())?;

        for (name, value) in descriptor.headers().iter() {
            transport.set_request_header(name, value);
        }

        transport.set_with_credentials(descriptor.with_credentials());
        transport.set_response_type(
            descriptor
                .response_type()
                .unwrap_or(self.config.default_response_type),
        );

        let timeout = descriptor
            .timeout()
            .unwrap_or(Duration::from_millis(self.config.request_timeout_ms));
        if !timeout.is_zero() {
            transport.set_timeout(timeout);
        }

        Ok(())
    }

    fn settle(
        &self,
        descriptor: &RequestDescriptor,
        url: &str,
        result: Result<Payload>,
    ) -> Result<Payload> {
        match &result {
            Ok(_) => {
                tracing::debug!(method = %descriptor.method(), url, "request succeeded");
            }
            Err(e) if self.config.enable_logging => {
                tracing::warn!(method = %descriptor.method(), url, name = e.name(), "{}", e);
            }
            Err(_) => {}
        }
        result
    }
}

fn is_tripped(signal: Option<&AbortSignal>) -> bool {
    signal.is_some_and(AbortSignal::is_aborted)
}
