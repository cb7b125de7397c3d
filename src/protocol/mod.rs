//! HTTP protocol vocabulary shared by the client and transports.
//!
//! - [`Method`]: the nine standard request methods
//! - [`ResponseType`]: how a response body is decoded
//! - [`headers`]: validated request headers and response header reshaping
//!
//! # Examples
//!
//! ```
//! use courier_http::protocol::{is_success_status, Method, ResponseType};
//!
//! assert!(!Method::Get.sends_body());
//! assert!(Method::Post.sends_body());
//! assert_eq!(ResponseType::default(), ResponseType::Json);
//! assert!(is_success_status(204));
//! assert!(!is_success_status(404));
//! ```

pub mod headers;

pub use headers::{parse_raw_headers, Headers};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard HTTP request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// `GET`
    Get,
    /// `HEAD`
    Head,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `CONNECT`
    Connect,
    /// `OPTIONS`
    Options,
    /// `TRACE`
    Trace,
    /// `PATCH`
    Patch,
}

impl Method {
    /// Upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Connect => "CONNECT",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Patch => "PATCH",
        }
    }

    /// Whether a request body is transmitted for this method.
    ///
    /// `GET`, `HEAD` and `OPTIONS` never transmit a body, even when one
    /// was supplied in the options.
    pub fn sends_body(&self) -> bool {
        !matches!(self, Method::Get | Method::Head | Method::Options)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => http::Method::GET,
            Method::Head => http::Method::HEAD,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Delete => http::Method::DELETE,
            Method::Connect => http::Method::CONNECT,
            Method::Options => http::Method::OPTIONS,
            Method::Trace => http::Method::TRACE,
            Method::Patch => http::Method::PATCH,
        }
    }
}

/// How the response body is decoded into a [`Payload`](crate::types::Payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Parse the body as JSON (default).
    #[default]
    Json,
    /// Decode the body as UTF-8 text.
    Text,
    /// Keep the raw bytes.
    Blob,
    /// Keep the raw bytes.
    ArrayBuffer,
    /// Keep the markup as text.
    Document,
}

impl ResponseType {
    /// Lower-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Json => "json",
            ResponseType::Text => "text",
            ResponseType::Blob => "blob",
            ResponseType::ArrayBuffer => "arraybuffer",
            ResponseType::Document => "document",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check if a status code is in the success range `[200, 300)`.
#[inline]
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_less_methods() {
        assert!(!Method::Get.sends_body());
        assert!(!Method::Head.sends_body());
        assert!(!Method::Options.sends_body());
        assert!(Method::Delete.sends_body());
        assert!(Method::Patch.sends_body());
    }

    #[test]
    fn test_method_to_http() {
        assert_eq!(http::Method::from(Method::Patch), http::Method::PATCH);
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_response_type_serde_names() {
        let parsed: ResponseType = serde_json::from_str("\"arraybuffer\"").unwrap();
        assert_eq!(parsed, ResponseType::ArrayBuffer);
        assert_eq!(serde_json::to_string(&ResponseType::Json).unwrap(), "\"json\"");
    }

    #[test]
    fn test_success_range() {
        assert!(is_success_status(200));
        assert!(is_success_status(299));
        assert!(!is_success_status(300));
        assert!(!is_success_status(0));
    }
}
