//! Transport abstraction.
//!
//! A [`Transport`] is the host primitive that carries one exchange. The
//! lifecycle engine configures it in a fixed order and then treats it as a
//! passive event source:
//!
//! ```text
//! open ─▶ headers ─▶ credentials flag ─▶ response type ─▶ timeout ─▶ send
//!                                                                     │
//!                           Progress* ─▶ Load | Error | Abort | Timeout
//! ```
//!
//! Events go through an [`EventSink`]. Only the first terminal event is
//! observed by the engine; anything emitted afterwards is dropped.
//!
//! [`TransportFactory`] allocates one transport per exchange. Transports are
//! never reused.

mod reqwest_client;

pub use reqwest_client::{ReqwestTransport, ReqwestTransportFactory};

use crate::error::Result;
use crate::protocol::{Method, ResponseType};
use crate::types::{Credentials, Payload};
use bytes::Bytes;
use http::{HeaderName, HeaderValue};
use std::time::Duration;
use tokio::sync::mpsc;
use url::Url;

/// Progress of a response body download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Bytes received so far.
    pub loaded: u64,
    /// Expected total, when the response declared one.
    pub total: Option<u64>,
}

/// How far a transport got before it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ReadyState {
    /// Not opened.
    #[default]
    Unsent,
    /// Opened, nothing received.
    Opened,
    /// Status line and headers received.
    HeadersReceived,
    /// Body is arriving.
    Loading,
    /// Finished.
    Done,
}

/// Snapshot of a transport when it reports a terminal event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportResponse {
    /// Furthest state reached.
    pub ready_state: ReadyState,
    /// Status code, `0` when none was received.
    pub status: u16,
    /// Status text, empty when none was received.
    pub status_text: String,
    /// Response headers as `name: value` lines.
    pub raw_headers: String,
    /// Final URL after redirects, empty when unknown.
    pub response_url: String,
    /// Decoded body.
    pub body: Payload,
}

impl TransportResponse {
    /// Snapshot for a transport that failed before receiving anything.
    pub fn failed() -> Self {
        TransportResponse {
            ready_state: ReadyState::Done,
            ..Default::default()
        }
    }
}

/// Notifications a transport emits after `send`.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Part of the body arrived.
    Progress(Progress),
    /// The exchange completed with a response (any status).
    Load(TransportResponse),
    /// The exchange failed at the network level.
    Error(TransportResponse),
    /// The exchange was cancelled through [`Transport::abort`].
    Abort,
    /// The configured timeout elapsed.
    Timeout(TransportResponse),
}

impl TransportEvent {
    /// Whether this event ends the exchange.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransportEvent::Progress(_))
    }
}

#[derive(Debug)]
pub(crate) enum ExchangeEvent {
    Transport(TransportEvent),
    Cancelled,
}

/// Ordered channel a transport reports its events into.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<ExchangeEvent>,
}

impl EventSink {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<ExchangeEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (EventSink { tx }, rx)
    }

    /// Report an event. Returns `false` once the exchange has settled.
    pub fn emit(&self, event: TransportEvent) -> bool {
        self.tx.send(ExchangeEvent::Transport(event)).is_ok()
    }

    /// A handle that posts a cancellation marker without keeping the
    /// channel open.
    pub(crate) fn canceller(&self) -> Canceller {
        Canceller {
            tx: self.tx.downgrade(),
        }
    }

    /// Whether the exchange has settled and nobody is listening.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Posts a cancellation marker into an exchange's event channel.
#[derive(Debug, Clone)]
pub(crate) struct Canceller {
    tx: mpsc::WeakUnboundedSender<ExchangeEvent>,
}

impl Canceller {
    pub(crate) fn cancel(&self) {
        if let Some(tx) = self.tx.upgrade() {
            let _ = tx.send(ExchangeEvent::Cancelled);
        }
    }
}

/// Host request primitive for a single exchange.
///
/// Methods are called by the lifecycle engine in declaration order. `send`
/// must not block: work happens in the background and is reported through
/// the [`EventSink`].
pub trait Transport: Send {
    /// Prepare the request line and optional credential pair.
    fn open(&mut self, method: Method, url: &Url, credentials: Option<&Credentials>) -> Result<()>;

    /// Add one request header.
    fn set_request_header(&mut self, name: &HeaderName, value: &HeaderValue);

    /// Whether ambient credentials (cookies) accompany the request.
    fn set_with_credentials(&mut self, with_credentials: bool);

    /// How the response body is decoded.
    fn set_response_type(&mut self, response_type: ResponseType);

    /// Give up after this long.
    fn set_timeout(&mut self, timeout: Duration);

    /// Start the exchange, with or without a body.
    fn send(&mut self, body: Option<Bytes>, sink: EventSink);

    /// Cancel the exchange. Emits [`TransportEvent::Abort`] if it was in flight.
    fn abort(&mut self);
}

/// Allocates a fresh [`Transport`] per exchange.
pub trait TransportFactory: Send + Sync {
    /// Create an unopened transport.
    fn create(&self) -> Box<dyn Transport>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_state_ordering() {
        assert!(ReadyState::HeadersReceived > ReadyState::Opened);
        assert!(ReadyState::Done >= ReadyState::HeadersReceived);
        assert!(ReadyState::Unsent < ReadyState::HeadersReceived);
    }

    #[tokio::test]
    async fn test_sink_preserves_order_and_closes() {
        let (sink, mut rx) = EventSink::channel();
        let canceller = sink.canceller();
        assert!(sink.emit(TransportEvent::Progress(Progress { loaded: 1, total: None })));
        canceller.cancel();

        assert!(matches!(rx.recv().await, Some(ExchangeEvent::Transport(_))));
        assert!(matches!(rx.recv().await, Some(ExchangeEvent::Cancelled)));

        drop(rx);
        assert!(sink.is_closed());
        assert!(!sink.emit(TransportEvent::Abort));
    }

    #[tokio::test]
    async fn test_canceller_does_not_hold_channel_open() {
        let (sink, mut rx) = EventSink::channel();
        let canceller = sink.canceller();
        drop(sink);

        canceller.cancel();
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_terminal_events() {
        assert!(!TransportEvent::Progress(Progress { loaded: 0, total: None }).is_terminal());
        assert!(TransportEvent::Abort.is_terminal());
        assert!(TransportEvent::Timeout(TransportResponse::failed()).is_terminal());
    }
}
