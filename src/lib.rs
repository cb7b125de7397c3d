#![warn(missing_docs)]

//! # courier_http: cancellation-aware HTTP requests
//!
//! This crate sends single HTTP exchanges and normalizes how they end. Every
//! request settles exactly once, either with the response payload or with
//! one of two failure shapes:
//!
//! - [`AbortionError`] - the request was cancelled before or during flight
//! - [`AugmentedError`] - network failure, non-2xx status or timeout, with
//!   status, status text, response headers, URL and raw payload attached
//!
//! ## Key Features
//!
//! - **Seven verbs**: `get`, `head`, `options`, `delete`, `post`, `put`, `patch`
//! - **Cancellation tokens**: [`AbortController`]/[`AbortSignal`] that can be
//!   shared by a group of requests
//! - **Client-wide abort**: cancel every outstanding request, or only the
//!   most recent one
//! - **Query parameters**: scalar and list values, percent-encoded
//! - **Progress reporting**: through an injectable observer
//! - **Pluggable transport**: `reqwest` by default, any [`Transport`] for tests
//!   or other hosts
//!
//! ## Client Usage
//!
//! ```ignore
//! use courier_http::{AbortController, HttpClient, HttpError, RequestOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::new();
//!     let controller = AbortController::new();
//!
//!     let options = RequestOptions::new()
//!         .with_param("search", "r2")
//!         .with_signal(&controller.signal());
//!
//!     match client.get("https://swapi.dev/api/people/", Some(options)).await {
//!         Ok(payload) => println!("{:?}", payload.as_json()),
//!         Err(HttpError::Failed(e)) => eprintln!("{} ({})", e, e.status()),
//!         Err(e) => eprintln!("{}: {}", e.name(), e),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - **[abort]** - Cancellation signal and controller
//! - **[client]** - Client façade, lifecycle engine, options and configuration
//! - **[error]** - Error types and result handling
//! - **[protocol]** - Methods, response types and header handling
//! - **[transport]** - Transport abstraction and the `reqwest` transport
//! - **[types]** - Params, payloads, credentials and response metadata

pub mod abort;
pub mod client;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod types;

pub use abort::{AbortController, AbortSignal};
pub use client::{ClientConfig, HttpClient, RequestOptions};
pub use error::{AbortionError, AugmentedError, ConfigError, HttpError, Result};
pub use protocol::{Headers, Method, ResponseType};
pub use transport::{Transport, TransportFactory};
pub use types::{Credentials, Params, Payload};
