//! HTTP client implementation.
//!
//! This module turns a verb call plus a loosely filled options bag into one
//! exchange on a [`Transport`](crate::transport::Transport), and settles it
//! exactly once with a payload or an [`HttpError`](crate::HttpError).
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── fetch     - HttpClient and the verb methods
//! ├── exchange  - lifecycle engine
//! ├── options   - RequestOptions and normalization into RequestDescriptor
//! ├── utils     - query string encoding
//! ├── outcome   - success/failure classification
//! ├── registry  - outstanding exchanges for client-wide abort
//! ├── progress  - download progress observers
//! └── config    - client configuration
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`HttpClient`] | Verb methods, client-wide abort |
//! | [`RequestOptions`] | Per-request settings |
//! | [`RequestDescriptor`] | Normalized request |
//! | [`ClientConfig`] | Client configuration |
//! | [`ProgressObserver`] | Download progress callback |
//!
//! # Examples
//!
//! ## Creating a Client
//!
//! ```
//! use courier_http::client::{ClientConfig, HttpClient};
//!
//! // Default configuration
//! let client = HttpClient::new();
//!
//! // Custom configuration
//! let config = ClientConfig {
//!     request_timeout_ms: 10_000,
//!     track_all_handles: false,
//!     ..Default::default()
//! };
//! let client = HttpClient::with_config(config);
//! ```
//!
//! ## Building Options
//!
//! ```
//! use courier_http::client::RequestOptions;
//! use courier_http::types::Credentials;
//! use courier_http::AbortController;
//!
//! let controller = AbortController::new();
//! let options = RequestOptions::new()
//!     .with_header("Accept", "application/json").unwrap()
//!     .with_param("search", "skywalker")
//!     .with_auth(Credentials::new("luke", "secret"))
//!     .with_signal(&controller.signal())
//!     .report_progress();
//! ```

mod config;
mod exchange;
mod fetch;
mod options;
mod outcome;
mod progress;
mod registry;
mod utils;

pub use config::ClientConfig;
pub use fetch::HttpClient;
pub use options::{RequestDescriptor, RequestOptions};
pub use progress::{NoopObserver, ProgressObserver, TracingObserver};
pub use utils::*;
