//! Resizer error types
//!
//! Kept separate from the pipeline error so the transform can be used and
//! tested on its own; converted into `ResizeError` at the pipeline boundary.

use std::fmt;

/// Errors that can occur while transforming an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// The requested output format cannot be encoded
    UnsupportedFormat { format: String },
    /// Input bytes are not a decodable image
    DecodeFailed { message: String },
    /// Resize operation failed
    ResizeFailed { message: String },
    /// Encoding to output format failed
    EncodeFailed { format: String, message: String },
    /// Source or target size is over the configured limits
    DimensionsExceeded {
        width: u32,
        height: u32,
        reason: String,
    },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::UnsupportedFormat { format } => {
                write!(f, "Unsupported image format: {}", format)
            }
            ImageError::DecodeFailed { message } => {
                write!(f, "Failed to decode image: {}", message)
            }
            ImageError::ResizeFailed { message } => {
                write!(f, "Resize failed: {}", message)
            }
            ImageError::EncodeFailed { format, message } => {
                write!(f, "Failed to encode to {}: {}", format, message)
            }
            ImageError::DimensionsExceeded {
                width,
                height,
                reason,
            } => {
                write!(f, "Image size {}x{} is too large: {}", width, height, reason)
            }
        }
    }
}

impl std::error::Error for ImageError {}

impl ImageError {
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        ImageError::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn decode_failed(message: impl Into<String>) -> Self {
        ImageError::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn resize_failed(message: impl Into<String>) -> Self {
        ImageError::ResizeFailed {
            message: message.into(),
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        ImageError::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn dimensions_exceeded(width: u32, height: u32, reason: impl Into<String>) -> Self {
        ImageError::DimensionsExceeded {
            width,
            height,
            reason: reason.into(),
        }
    }
}
