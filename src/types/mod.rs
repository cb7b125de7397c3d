//! Core data types for requests and responses.

mod params;
mod payload;
mod response;

pub use params::{ParamValue, Params, Scalar};
pub use payload::Payload;
pub use response::{HttpResponse, ResponseInit};

use serde::{Deserialize, Serialize};

/// User name and password passed to the transport when it is opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// User name, if any.
    pub username: Option<String>,
    /// Password, if any.
    pub password: Option<String>,
}

impl Credentials {
    /// Credentials with both parts set.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Whether neither part is set.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }
}
