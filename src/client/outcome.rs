//! Outcome classification for finished transports.
//!
//! A `Load` event with a 2xx status resolves with the raw payload. Every
//! other terminal snapshot (non-2xx load, network error, timeout) becomes an
//! [`AugmentedError`].

use crate::error::{AugmentedError, HttpError, Result};
use crate::protocol::{is_success_status, parse_raw_headers};
use crate::transport::{ReadyState, TransportResponse};
use crate::types::{Payload, ResponseInit};

/// Classify a completed (`Load`) transport.
pub(crate) fn classify(response: TransportResponse, request_url: &str) -> Result<Payload> {
    if response.ready_state == ReadyState::Done && is_success_status(response.status) {
        Ok(response.body)
    } else {
        Err(HttpError::Failed(augmented_error(response, request_url)))
    }
}

/// Build the failure for a transport snapshot.
///
/// Headers are reshaped only if the transport got as far as receiving them.
/// The URL is the final response URL when known, else the request URL.
pub(crate) fn augmented_error(response: TransportResponse, request_url: &str) -> AugmentedError {
    let headers = if response.ready_state >= ReadyState::HeadersReceived {
        parse_raw_headers(&response.raw_headers)
    } else {
        Default::default()
    };

    let url = if response.response_url.is_empty() {
        request_url.to_string()
    } else {
        response.response_url
    };

    AugmentedError::new(
        ResponseInit {
            headers: Some(headers),
            status: Some(response.status),
            status_text: Some(response.status_text),
            url: Some(url),
        },
        response.body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loaded(status: u16, status_text: &str) -> TransportResponse {
        TransportResponse {
            ready_state: ReadyState::Done,
            status,
            status_text: status_text.to_string(),
            raw_headers: "content-type: application/json\r\nx-request-id: 7\r\n".to_string(),
            response_url: "http://example.com/people/".to_string(),
            body: Payload::Json(json!({"count": 82})),
        }
    }

    #[test]
    fn test_success_returns_payload_unchanged() {
        let payload = classify(loaded(200, "OK"), "http://example.com/people").unwrap();
        assert_eq!(payload, Payload::Json(json!({"count": 82})));

        let payload = classify(loaded(299, ""), "http://example.com/people").unwrap();
        assert!(payload.as_json().is_some());
    }

    #[test]
    fn test_not_found_is_augmented() {
        let err = classify(loaded(404, "Not Found"), "http://example.com/people").unwrap_err();
        let HttpError::Failed(err) = err else {
            panic!("expected AugmentedError");
        };
        assert_eq!(err.status(), 404);
        assert!(err.message().contains("404"));
        assert!(err.message().contains("http://example.com/people/"));
        assert_eq!(err.headers()["x-request-id"], "7");
        assert_eq!(err.error(), &Payload::Json(json!({"count": 82})));
        assert!(!err.ok());
    }

    #[test]
    fn test_incomplete_load_is_failure() {
        let mut response = loaded(200, "OK");
        response.ready_state = ReadyState::Loading;
        assert!(classify(response, "http://x/").is_err());
    }

    #[test]
    fn test_network_failure_has_no_headers() {
        let err = augmented_error(TransportResponse::failed(), "http://example.com/down");
        assert_eq!(err.status(), 0);
        assert!(err.headers().is_empty());
        assert_eq!(err.url(), Some("http://example.com/down"));
        assert_eq!(err.message(), "Request \"http://example.com/down\" failed. 0");
        assert!(err.error().is_null());
    }

    #[test]
    fn test_headers_skipped_before_received() {
        let mut response = loaded(0, "");
        response.ready_state = ReadyState::Opened;
        let err = augmented_error(response, "http://x/");
        assert!(err.headers().is_empty());
    }
}
