//! Image bomb protection
//!
//! Both the target size and the decoded source size are checked against
//! these limits before any pixel buffer is allocated.

use super::error::ImageError;

pub const DEFAULT_MAX_DIMENSION: u32 = 10_000;
pub const DEFAULT_MAX_PIXELS: u64 = 100_000_000; // 100 megapixels

/// Upper bounds for any image the resizer allocates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionLimits {
    /// Maximum width or height
    pub max_dimension: u32,
    /// Maximum total pixels (width * height)
    pub max_pixels: u64,
}

impl Default for DimensionLimits {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

impl DimensionLimits {
    /// Validate image dimensions against the limits
    pub fn validate(&self, width: u32, height: u32) -> Result<(), ImageError> {
        if width > self.max_dimension || height > self.max_dimension {
            return Err(ImageError::dimensions_exceeded(
                width,
                height,
                format!("each side must be at most {}", self.max_dimension),
            ));
        }

        let pixels = width as u64 * height as u64;
        if pixels > self.max_pixels {
            return Err(ImageError::dimensions_exceeded(
                width,
                height,
                format!("{} pixels exceeds the limit of {}", pixels, self.max_pixels),
            ));
        }

        Ok(())
    }
}
