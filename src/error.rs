// Error types module

use thiserror::Error;

use crate::resizer::ImageError;
use crate::storage::StorageError;

/// Centralized error type for the resize pipeline
///
/// Every stage returns one of these. None of them is retried or recovered:
/// the first failure ends the invocation and is handed to the responder as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResizeError {
    /// The request carried no query parameters (or no `key` parameter)
    #[error("Has no parameters in query string")]
    MissingParameters,

    /// The `key` parameter does not look like `<width>x<height>/<path>`
    #[error("Lacking of parameters: key '{key}' does not match <width>x<height>/<path>")]
    MalformedKey { key: String },

    /// Width or height is zero or not representable
    #[error("Invalid dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        width: String,
        height: String,
        reason: String,
    },

    /// The supported-dimensions blob is not valid
    #[error("Invalid dimension configuration: {0}")]
    ConfigParse(String),

    /// The requested object does not exist
    #[error("Object not found: {bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },

    /// Any other blob store failure (network, permissions, write errors)
    #[error("Storage error: {0}")]
    Storage(String),

    /// The retrieved object has no body or no content type
    #[error("Data object is invalid: {0}")]
    InvalidAsset(String),

    /// The retrieved object's content type is not `image/*`
    #[error("Data is not an image: content type '{content_type}'")]
    NotAnImage { content_type: String },

    /// Source bytes are not a decodable image
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The content-type subtype cannot be encoded
    #[error("Unsupported image format: {format}")]
    UnsupportedFormat { format: String },

    /// The resize transform itself failed
    #[error("Resize failed: {0}")]
    ResizeFailed(String),

    /// Re-encoding the resized pixels failed
    #[error("Failed to encode to {format}: {message}")]
    EncodeFailed { format: String, message: String },
}

impl ResizeError {
    /// Stable name of the error kind.
    ///
    /// Used as the `errorType` of the error response and as the `kind`
    /// label of the error counter.
    pub fn kind(&self) -> &'static str {
        match self {
            ResizeError::MissingParameters => "MissingParameters",
            ResizeError::MalformedKey { .. } => "MalformedKey",
            ResizeError::InvalidDimensions { .. } => "InvalidDimensions",
            ResizeError::ConfigParse(_) => "ConfigParseError",
            ResizeError::ObjectNotFound { .. } => "ObjectNotFound",
            ResizeError::Storage(_) => "StorageError",
            ResizeError::InvalidAsset(_) => "InvalidAsset",
            ResizeError::NotAnImage { .. } => "NotAnImage",
            ResizeError::Decode(_) => "DecodeError",
            ResizeError::UnsupportedFormat { .. } => "UnsupportedFormat",
            ResizeError::ResizeFailed(_) => "ResizeFailed",
            ResizeError::EncodeFailed { .. } => "EncodeFailed",
        }
    }

    /// Whether the failure was caused by the request or the stored data
    /// rather than by the infrastructure. Only affects log severity.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ResizeError::MissingParameters
                | ResizeError::MalformedKey { .. }
                | ResizeError::InvalidDimensions { .. }
                | ResizeError::ObjectNotFound { .. }
                | ResizeError::InvalidAsset(_)
                | ResizeError::NotAnImage { .. }
                | ResizeError::Decode(_)
                | ResizeError::UnsupportedFormat { .. }
        )
    }
}

impl From<StorageError> for ResizeError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { bucket, key } => ResizeError::ObjectNotFound { bucket, key },
            other => ResizeError::Storage(other.to_string()),
        }
    }
}

impl From<ImageError> for ResizeError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::UnsupportedFormat { format } => ResizeError::UnsupportedFormat { format },
            ImageError::DecodeFailed { message } => ResizeError::Decode(message),
            ImageError::ResizeFailed { message } => ResizeError::ResizeFailed(message),
            ImageError::EncodeFailed { format, message } => {
                ResizeError::EncodeFailed { format, message }
            }
            ImageError::DimensionsExceeded {
                width,
                height,
                reason,
            } => ResizeError::InvalidDimensions {
                width: width.to_string(),
                height: height.to_string(),
                reason,
            },
        }
    }
}
