use crate::protocol::is_success_status;
use serde::Serialize;
use std::collections::BTreeMap;

/// Input for [`HttpResponse::new`]; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseInit {
    /// Response headers.
    pub headers: Option<BTreeMap<String, String>>,
    /// Status code.
    pub status: Option<u16>,
    /// Status text.
    pub status_text: Option<String>,
    /// Final response URL.
    pub url: Option<String>,
}

/// Response metadata shared by successful and failed exchanges.
///
/// Absent data falls back to a plain `200 OK` with no headers and no URL.
///
/// # Examples
///
/// ```
/// use courier_http::types::{HttpResponse, ResponseInit};
///
/// let response = HttpResponse::new(ResponseInit::default());
/// assert_eq!(response.status(), 200);
/// assert_eq!(response.status_text(), "OK");
/// assert!(response.ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    headers: BTreeMap<String, String>,
    status: u16,
    status_text: String,
    url: Option<String>,
    pub(crate) ok: bool,
}

impl HttpResponse {
    /// Default status for absent data.
    pub const DEFAULT_STATUS: u16 = 200;

    /// Default status text for absent data.
    pub const DEFAULT_STATUS_TEXT: &'static str = "OK";

    /// Build response metadata, filling absent fields with defaults.
    pub fn new(init: ResponseInit) -> Self {
        let status = init.status.unwrap_or(Self::DEFAULT_STATUS);
        HttpResponse {
            headers: init.headers.unwrap_or_default(),
            status,
            status_text: init
                .status_text
                .unwrap_or_else(|| Self::DEFAULT_STATUS_TEXT.to_string()),
            url: init.url,
            ok: is_success_status(status),
        }
    }

    /// Response headers.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Status text.
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Final response URL, if known.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Whether the status is in `[200, 300)`.
    pub fn ok(&self) -> bool {
        self.ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_zero_status_is_kept() {
        let response = HttpResponse::new(ResponseInit {
            status: Some(0),
            status_text: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(response.status(), 0);
        assert_eq!(response.status_text(), "");
        assert!(!response.ok());
    }

    #[test]
    fn test_serializes_camel_case() {
        let response = HttpResponse::new(ResponseInit {
            status: Some(404),
            status_text: Some("Not Found".into()),
            url: Some("http://x/".into()),
            ..Default::default()
        });
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["statusText"], "Not Found");
        assert_eq!(value["ok"], false);
        assert_eq!(value["url"], "http://x/");
    }
}
