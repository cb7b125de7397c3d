//! Query string encoding.
//!
//! Parameters are rendered as `key=value` pairs joined with `&`. Keys and
//! values are percent-encoded with the `encodeURIComponent` character set:
//! everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped, and spaces
//! become `%20`.
//!
//! List values are joined with `,` first and the joined string is encoded as
//! one unit, so the separators themselves are escaped:
//!
//! | Params | Encoded |
//! |--------|---------|
//! | `q = "rust lang"` | `q=rust%20lang` |
//! | `ids = [1, 2, 3]` | `ids=1%2C2%2C3` |
//! | `a&b = "x=y"` | `a%26b=x%3Dy` |
//!
//! [`append_query`] adds the encoded string after a `?`. A URL that already
//! carries a query string is not merged with the new one; it ends up with a
//! second `?`, so callers must pass parameters either in the URL or in
//! `params`, not both.
//!
//! # Examples
//!
//! ```
//! use courier_http::client::{append_query, build_params};
//! use courier_http::types::Params;
//!
//! let params = Params::new().with("q", "rust lang").with("ids", vec![1, 2]);
//! assert_eq!(build_params(&params), "q=rust%20lang&ids=1%2C2");
//! assert_eq!(
//!     append_query("http://example.com/search", &params),
//!     "http://example.com/search?q=rust%20lang&ids=1%2C2"
//! );
//! ```

use crate::types::{ParamValue, Params};
use url::form_urlencoded::byte_serialize;

/// Percent-encode one component with the `encodeURIComponent` character set.
pub fn encode_component(input: &str) -> String {
    byte_serialize(input.as_bytes())
        .map(|chunk| match chunk {
            "+" => "%20",
            "%21" => "!",
            "%27" => "'",
            "%28" => "(",
            "%29" => ")",
            "%7E" => "~",
            other => other,
        })
        .collect()
}

fn render_value(value: &ParamValue) -> String {
    match value {
        ParamValue::Single(scalar) => scalar.to_string(),
        ParamValue::List(scalars) => scalars
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(","),
    }
}

/// Encode parameters into a query string without the leading `?`.
///
/// Callers check for an empty mapping first; an empty mapping encodes to an
/// empty string.
pub fn build_params(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                encode_component(key),
                encode_component(&render_value(value))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Append encoded parameters to a URL, or return it unchanged when there
/// are none.
pub fn append_query(url: &str, params: &Params) -> String {
    if params.is_empty() {
        return url.to_string();
    }
    format!("{}?{}", url, build_params(params))
}
