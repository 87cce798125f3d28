//! Invocation results
//!
//! A successful invocation is always a permanent redirect to the stored
//! variant. A failed one carries the error kind and message.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::ResizeError;

/// Status of the success response
pub const REDIRECT_STATUS: u16 = 301;

/// Status reported for every pipeline failure
pub const ERROR_STATUS: u16 = 500;

/// Header name used in the serialized redirect
pub const LOCATION_HEADER: &str = "location";

/// Redirect returned after the resized object has been stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ResizeResponse {
    /// Permanent redirect to `{base_url}/{key}`.
    ///
    /// The base URL is used verbatim; a trailing slash on it is not collapsed.
    pub fn redirect(base_url: &str, key: &str) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(LOCATION_HEADER.to_string(), format!("{}/{}", base_url, key));
        Self {
            status_code: REDIRECT_STATUS,
            headers,
            body: String::new(),
        }
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION_HEADER).map(String::as_str)
    }
}

/// Error payload, `{"errorType": ..., "errorMessage": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_type: String,
    pub error_message: String,
}

impl From<&ResizeError> for ErrorResponse {
    fn from(err: &ResizeError) -> Self {
        Self {
            error_type: err.kind().to_string(),
            error_message: err.to_string(),
        }
    }
}

impl ErrorResponse {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"errorType":"{}","errorMessage":"serialization failed"}}"#,
                self.error_type
            )
        })
    }
}
