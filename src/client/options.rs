//! Request options and their normalization into a [`RequestDescriptor`].
//!
//! Callers describe a request with a loosely filled [`RequestOptions`] bag.
//! The verb methods fix the method, merge in the body argument, and produce a
//! [`RequestDescriptor`]: the complete, immutable description of one exchange.
//!
//! # Examples
//!
//! ```
//! use courier_http::client::RequestOptions;
//! use courier_http::protocol::ResponseType;
//! use std::time::Duration;
//!
//! let options = RequestOptions::new()
//!     .with_header("Accept", "application/json").unwrap()
//!     .with_param("page", 2)
//!     .with_response_type(ResponseType::Text)
//!     .with_timeout(Duration::from_secs(5));
//! assert_eq!(options.params.as_ref().unwrap().len(), 1);
//! ```

use crate::abort::AbortSignal;
use crate::error::ConfigError;
use crate::protocol::{Headers, Method, ResponseType};
use crate::types::{Credentials, ParamValue, Params};
use bytes::Bytes;
use std::time::Duration;

/// Caller-supplied settings for one request. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Request headers.
    pub headers: Option<Headers>,
    /// Query parameters appended to the URL.
    pub params: Option<Params>,
    /// Request body. Never transmitted for `GET`, `HEAD` and `OPTIONS`.
    pub body: Option<Bytes>,
    /// Credential pair handed to the transport when it is opened.
    pub credentials: Option<Credentials>,
    /// Send ambient credentials (cookies).
    pub with_credentials: Option<bool>,
    /// How to decode the response body.
    pub response_type: Option<ResponseType>,
    /// Give up after this long.
    pub timeout: Option<Duration>,
    /// Cancellation signal; may be shared between requests.
    pub signal: Option<AbortSignal>,
    /// Forward download progress to the client's progress observer.
    pub report_progress: bool,
}

impl RequestOptions {
    /// Empty options.
    pub fn new() -> Self {
        RequestOptions::default()
    }

    /// Replace all headers.
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Validate and add one header.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ConfigError> {
        self.headers.get_or_insert_with(Headers::new).insert(name, value)?;
        Ok(self)
    }

    /// Replace all query parameters.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    /// Add one query parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.get_or_insert_with(Params::new).insert(name, value);
        self
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the credential pair.
    pub fn with_auth(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Send ambient credentials (cookies).
    pub fn include_credentials(mut self, with_credentials: bool) -> Self {
        self.with_credentials = Some(with_credentials);
        self
    }

    /// Set the response type.
    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a cancellation signal.
    pub fn with_signal(mut self, signal: &AbortSignal) -> Self {
        self.signal = Some(signal.clone());
        self
    }

    /// Forward download progress to the progress observer.
    pub fn report_progress(mut self) -> Self {
        self.report_progress = true;
        self
    }
}

/// Fully resolved description of one exchange.
///
/// Only the verb methods create descriptors, so the method always matches
/// the verb that was called.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    url: String,
    headers: Headers,
    body: Option<Bytes>,
    credentials: Option<Credentials>,
    response_type: Option<ResponseType>,
    timeout: Option<Duration>,
    with_credentials: bool,
    params: Params,
    signal: Option<AbortSignal>,
    report_progress: bool,
}

impl RequestDescriptor {
    /// Request method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Request URL, without the encoded parameters.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Validated request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The body as supplied, even for methods that never send one.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// The body that is actually transmitted.
    ///
    /// `None` for `GET`, `HEAD` and `OPTIONS`, and for empty bodies.
    pub fn sendable_body(&self) -> Option<&Bytes> {
        self.body
            .as_ref()
            .filter(|b| !b.is_empty() && self.method.sends_body())
    }

    /// Credential pair.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Requested response type, if any.
    pub fn response_type(&self) -> Option<ResponseType> {
        self.response_type
    }

    /// Requested timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Whether ambient credentials accompany the request.
    pub fn with_credentials(&self) -> bool {
        self.with_credentials
    }

    /// Query parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Cancellation signal.
    pub fn signal(&self) -> Option<&AbortSignal> {
        self.signal.as_ref()
    }

    /// Whether progress should be reported.
    pub fn report_progress(&self) -> bool {
        self.report_progress
    }
}

/// Merge the verb's method with caller options.
///
/// Absent options behave like empty options.
pub(crate) fn normalize(method: Method, url: &str, options: Option<RequestOptions>) -> RequestDescriptor {
    let options = options.unwrap_or_default();
    RequestDescriptor {
        method,
        url: url.to_string(),
        headers: options.headers.unwrap_or_default(),
        body: options.body,
        credentials: options.credentials,
        response_type: options.response_type,
        timeout: options.timeout,
        with_credentials: options.with_credentials.unwrap_or(false),
        params: options.params.unwrap_or_default(),
        signal: options.signal,
        report_progress: options.report_progress,
    }
}

/// Merge a verb's explicit body argument into the options.
///
/// The argument always wins over `options.body`; an empty body counts as no
/// body.
pub(crate) fn with_body_argument(options: Option<RequestOptions>, body: Bytes) -> RequestOptions {
    let mut options = options.unwrap_or_default();
    options.body = Some(body).filter(|b| !b.is_empty());
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abort::AbortController;

    #[test]
    fn test_absent_options_default() {
        let descriptor = normalize(Method::Get, "http://x/", None);
        assert_eq!(descriptor.method(), Method::Get);
        assert!(descriptor.headers().is_empty());
        assert!(descriptor.params().is_empty());
        assert!(descriptor.body().is_none());
        assert!(!descriptor.with_credentials());
        assert!(descriptor.signal().is_none());
        assert!(!descriptor.report_progress());
    }

    #[test]
    fn test_get_keeps_but_never_sends_body() {
        let options = RequestOptions::new().with_body("payload");
        let descriptor = normalize(Method::Get, "http://x/", Some(options));
        assert_eq!(descriptor.body().unwrap(), &Bytes::from_static(b"payload"));
        assert!(descriptor.sendable_body().is_none());

        let options = RequestOptions::new().with_body("payload");
        let descriptor = normalize(Method::Options, "http://x/", Some(options));
        assert!(descriptor.sendable_body().is_none());
    }

    #[test]
    fn test_delete_sends_body() {
        let options = RequestOptions::new().with_body("payload");
        let descriptor = normalize(Method::Delete, "http://x/", Some(options));
        assert!(descriptor.sendable_body().is_some());
    }

    #[test]
    fn test_body_argument_wins() {
        let options = RequestOptions::new().with_body("from options");
        let merged = with_body_argument(Some(options), Bytes::from_static(b"from argument"));
        assert_eq!(merged.body.unwrap(), Bytes::from_static(b"from argument"));

        let options = RequestOptions::new().with_body("from options");
        let merged = with_body_argument(Some(options), Bytes::new());
        assert!(merged.body.is_none());
    }

    #[test]
    fn test_caller_options_untouched() {
        let controller = AbortController::new();
        let original = RequestOptions::new()
            .with_param("q", "rust")
            .with_signal(&controller.signal());
        let descriptor = normalize(Method::Post, "http://x/", Some(original.clone()));

        assert_eq!(original.params.as_ref().unwrap().len(), 1);
        assert!(original.body.is_none());
        assert_eq!(descriptor.params().len(), 1);

        controller.abort();
        assert!(descriptor.signal().unwrap().is_aborted());
    }

    #[test]
    fn test_with_header_validates() {
        assert!(RequestOptions::new().with_header("Accept", "").is_err());
        let options = RequestOptions::new().with_header("Accept", "text/plain").unwrap();
        assert_eq!(options.headers.unwrap().len(), 1);
    }
}
