//! Request header validation and response header reshaping.
//!
//! Request headers are held in [`Headers`], which validates every entry when
//! it is inserted. Response headers arrive from a transport as one raw block
//! and are reshaped into a plain mapping by [`parse_raw_headers`].
//!
//! # Header Rules
//!
//! | Entry | Accepted | Error |
//! |-------|----------|-------|
//! | `Accept: application/json` | yes | |
//! | `X-Trace-Id: 42` | yes | |
//! | `Bad Name: v` | no | `InvalidHeaderName` |
//! | `Accept: ` | no | `EmptyHeaderValue` |
//! | `Accept: a\nb` | no | `InvalidHeaderValue` |
//!
//! # Examples
//!
//! ```
//! use courier_http::protocol::{parse_raw_headers, Headers};
//!
//! let headers = Headers::new()
//!     .with("Accept", "application/json")
//!     .unwrap();
//! assert_eq!(headers.len(), 1);
//!
//! let parsed = parse_raw_headers("content-type: text/plain\r\nx-count: 2\r\n");
//! assert_eq!(parsed["x-count"], "2");
//! ```

use crate::error::ConfigError;
use http::{HeaderName, HeaderValue};
use std::collections::BTreeMap;

/// Validated, order-preserving set of request headers.
///
/// Names are checked against HTTP token rules and values must be non-empty
/// and free of control characters. Re-inserting a name replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(HeaderName, HeaderValue)>,
}

impl Headers {
    /// Create an empty header set.
    pub fn new() -> Self {
        Headers::default()
    }

    /// Validate and insert one header.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a malformed name, a malformed value or
    /// an empty value.
    pub fn insert(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let (name, value) = validate(name, value)?;
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: &str, value: &str) -> Result<Self, ConfigError> {
        self.insert(name, value)?;
        Ok(self)
    }

    /// Validate a whole mapping at once.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier_http::protocol::Headers;
    ///
    /// let headers = Headers::try_from_pairs([("Accept", "text/plain"), ("X-Id", "7")]).unwrap();
    /// assert_eq!(headers.len(), 2);
    ///
    /// assert!(Headers::try_from_pairs([("Accept", "")]).is_err());
    /// ```
    pub fn try_from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut headers = Headers::new();
        for (k, v) in pairs {
            headers.insert(k.as_ref(), v.as_ref())?;
        }
        Ok(headers)
    }

    /// Look up a header value by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.entries
            .iter()
            .find(|(n, _)| n.as_str().eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.entries.iter().map(|(n, v)| (n, v))
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no headers are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), ConfigError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidHeaderName(name.to_string()));
    }
    let header_name = HeaderName::from_bytes(trimmed.as_bytes())
        .map_err(|_| ConfigError::InvalidHeaderName(name.to_string()))?;

    if value.trim().is_empty() {
        return Err(ConfigError::EmptyHeaderValue(trimmed.to_string()));
    }
    let header_value = HeaderValue::from_str(value)
        .map_err(|_| ConfigError::InvalidHeaderValue(trimmed.to_string()))?;

    Ok((header_name, header_value))
}

/// Reshape a raw response header block into a mapping.
///
/// The block is split on line breaks and every non-empty line is split at
/// its first `": "`. A line without a separator becomes a name with an empty
/// value. Later duplicates overwrite earlier ones.
///
/// # Examples
///
/// ```
/// use courier_http::protocol::parse_raw_headers;
///
/// let map = parse_raw_headers("date: Mon, 01 Jan 2024 00:00:00 GMT\r\nvia: a: b");
/// assert_eq!(map["date"], "Mon, 01 Jan 2024 00:00:00 GMT");
/// assert_eq!(map["via"], "a: b");
///
/// assert!(parse_raw_headers("").is_empty());
/// ```
pub fn parse_raw_headers(raw: &str) -> BTreeMap<String, String> {
    raw.trim()
        .split(['\r', '\n'])
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once(": ") {
            Some((name, value)) => (name.to_string(), value.to_string()),
            None => (line.to_string(), String::new()),
        })
        .collect()
}

/// Render response headers into the raw block format transports report.
///
/// Each header becomes one `name: value\r\n` line. Values that are not
/// visible ASCII are skipped.
pub fn format_raw_headers(headers: &http::HeaderMap) -> String {
    headers
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| format!("{}: {}\r\n", k, v)))
        .collect()
}
