//! Output format and fit mode
//!
//! The output format is never negotiated: it is whatever the source object's
//! content type names after the `image/` prefix.

use serde::Deserialize;
use std::str::FromStr;

use super::error::ImageError;

/// Media-type prefix every stored original must carry
pub const IMAGE_MEDIA_PREFIX: &str = "image/";

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
            Self::Gif => "gif",
        }
    }

    /// Derive the output format from a source content type.
    ///
    /// Strips the `image/` prefix and any media-type parameters, then matches
    /// the subtype case-insensitively. Callers are expected to have checked
    /// the prefix already; a missing prefix is reported as unsupported.
    pub fn from_content_type(content_type: &str) -> Result<Self, ImageError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        let subtype = essence
            .strip_prefix(IMAGE_MEDIA_PREFIX)
            .ok_or_else(|| ImageError::unsupported_format(essence))?;
        subtype.parse()
    }
}

impl FromStr for OutputFormat {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" | "pjpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            "gif" => Ok(OutputFormat::Gif),
            _ => Err(ImageError::unsupported_format(s)),
        }
    }
}

/// How the source is mapped onto the exact target size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale to cover the target, then crop the overflow around the centre
    #[default]
    Cover,
    /// Stretch to fill exactly (may distort)
    Fill,
}
