//! Image resize transform
//!
//! Decodes an original, resizes it to an exact target size and re-encodes it
//! in the format named by the original's content type:
//!
//! ```text
//! bytes (any decodable format) ──decode──▶ pixels ──cover/fill──▶ W x H ──encode──▶ bytes (image/<subtype>)
//! ```
//!
//! Supported output subtypes: `jpeg` (`jpg`, `pjpeg`), `png`, `webp`
//! (lossless) and `gif`.

pub mod encoder;
pub mod error;
pub mod format;
pub mod limits;
pub mod processor;

pub use encoder::{EncoderFactory, EncoderQuality, ImageEncoder, DEFAULT_QUALITY};
pub use error::ImageError;
pub use format::{FitMode, OutputFormat, IMAGE_MEDIA_PREFIX};
pub use limits::{DimensionLimits, DEFAULT_MAX_DIMENSION, DEFAULT_MAX_PIXELS};
pub use processor::{resize_image, ResizeOptions};
