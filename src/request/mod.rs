//! Request parsing
//!
//! Turns the `key` query parameter, `<width>x<height>/<original path>`, into
//! a [`ResizeRequest`]. The full key is kept untouched: it is both the
//! destination of the resized object and the path of the redirect.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::dimensions::Dimensions;
use crate::error::ResizeError;

/// Name of the query parameter carrying the request key
pub const KEY_PARAM: &str = "key";

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([0-9]+)x([0-9]+)/(.+)").expect("key pattern is valid"))
}

/// A parsed resize request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeRequest {
    /// Requested size, both axes non-zero
    pub dimensions: Dimensions,
    /// Key of the original object
    pub original_key: String,
    /// The `key` parameter exactly as received
    pub key: String,
}

impl ResizeRequest {
    /// Parse a request from its decoded query parameters.
    ///
    /// The pattern is searched for anywhere in the key, so a leading prefix
    /// before the dimensions is ignored for parsing but kept in `key`.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, ResizeError> {
        if params.is_empty() {
            return Err(ResizeError::MissingParameters);
        }
        let key = params.get(KEY_PARAM).ok_or(ResizeError::MissingParameters)?;
        Self::parse(key)
    }

    /// Parse a raw request key
    pub fn parse(key: &str) -> Result<Self, ResizeError> {
        let captures = key_pattern()
            .captures(key)
            .ok_or_else(|| ResizeError::MalformedKey {
                key: key.to_string(),
            })?;

        let raw_width = &captures[1];
        let raw_height = &captures[2];
        let invalid = |reason: &str| ResizeError::InvalidDimensions {
            width: raw_width.to_string(),
            height: raw_height.to_string(),
            reason: reason.to_string(),
        };

        let width: u32 = raw_width
            .parse()
            .map_err(|_| invalid("width is too large"))?;
        let height: u32 = raw_height
            .parse()
            .map_err(|_| invalid("height is too large"))?;

        if width == 0 || height == 0 {
            return Err(invalid("Width and Height must be larger than 0"));
        }

        Ok(Self {
            dimensions: Dimensions::new(width, height),
            original_key: captures[3].to_string(),
            key: key.to_string(),
        })
    }
}

/// Split a raw query string into percent-decoded parameters.
///
/// Pairs without `=` are ignored; a repeated name keeps the last value.
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in query.split('&') {
        if let Some((name, value)) = pair.split_once('=') {
            if name.is_empty() {
                continue;
            }
            params.insert(
                urlencoding::decode(name)
                    .map(|n| n.into_owned())
                    .unwrap_or_else(|_| name.to_string()),
                urlencoding::decode(value)
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| value.to_string()),
            );
        }
    }
    params
}
