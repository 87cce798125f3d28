//! Supported-dimension resolution
//!
//! The dimension configuration is a JSON blob kept in object storage:
//!
//! ```json
//! { "supportedDimensions": [ { "width": 800, "height": 600 }, ... ] }
//! ```
//!
//! A requested size is upgraded to a configured size only when the configured
//! size is strictly larger on *both* axes than the current candidate. Entries
//! are visited in the order they appear, and the candidate moves as they
//! match, so the result is not necessarily the smallest covering entry.

use serde::Deserialize;

use crate::error::ResizeError;

/// A width/height pair in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when `self` is strictly larger than `other` on both axes
    pub fn dominates(&self, other: &Dimensions) -> bool {
        self.width > other.width && self.height > other.height
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parsed dimension configuration blob
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionConfig {
    pub supported_dimensions: Vec<Dimensions>,
}

impl DimensionConfig {
    /// Parse and validate a configuration blob
    pub fn from_json(data: &[u8]) -> Result<Self, ResizeError> {
        let config: DimensionConfig =
            serde_json::from_slice(data).map_err(|e| ResizeError::ConfigParse(e.to_string()))?;

        if let Some(bad) = config
            .supported_dimensions
            .iter()
            .find(|d| d.width == 0 || d.height == 0)
        {
            return Err(ResizeError::ConfigParse(format!(
                "supported dimension {} must be positive",
                bad
            )));
        }

        Ok(config)
    }

    /// Resolve the size to render for a requested size
    pub fn resolve(&self, requested: Dimensions) -> Dimensions {
        self.supported_dimensions
            .iter()
            .fold(requested, |candidate, supported| {
                if supported.dominates(&candidate) {
                    *supported
                } else {
                    candidate
                }
            })
    }
}
