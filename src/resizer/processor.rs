//! Image processing implementation
//!
//! Handles the actual image transformation: decode → (crop) → resize → encode

use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::io::Reader as ImageReader;
use image::DynamicImage;
use std::io::Cursor;
use std::num::NonZeroU32;

use super::encoder::{EncoderFactory, EncoderQuality, DEFAULT_QUALITY};
use super::error::ImageError;
use super::format::{FitMode, OutputFormat};
use super::limits::DimensionLimits;

/// Knobs for the transform that do not change per request
#[derive(Debug, Clone, Copy)]
pub struct ResizeOptions {
    pub fit: FitMode,
    pub quality: u8,
    pub limits: DimensionLimits,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            fit: FitMode::default(),
            quality: DEFAULT_QUALITY,
            limits: DimensionLimits::default(),
        }
    }
}

/// Resize an encoded image to exactly `width` x `height` and re-encode it.
///
/// The input format is sniffed from the bytes; the output format is the one
/// given. Both target dimensions must be non-zero, and both the target and
/// the source header size must be within `options.limits`.
pub fn resize_image(
    data: &[u8],
    width: u32,
    height: u32,
    format: OutputFormat,
    options: ResizeOptions,
) -> Result<Vec<u8>, ImageError> {
    options.limits.validate(width, height)?;

    let (src_w, src_h) = source_dimensions(data)?;
    options.limits.validate(src_w, src_h)?;

    let img = decode_image(data)?;

    let img = match options.fit {
        FitMode::Cover => crop_to_aspect(img, width, height)?,
        FitMode::Fill => img,
    };

    let resized = if img.width() != width || img.height() != height {
        scale_image(&img, width, height)?
    } else {
        img
    };

    let encoder = EncoderFactory::create(format);
    let rgba_data = resized.to_rgba8().into_raw();
    encoder.encode(
        &rgba_data,
        width,
        height,
        EncoderQuality::with_quality(options.quality),
    )
}

/// Read the size from the image header without decoding pixels
fn source_dimensions(data: &[u8]) -> Result<(u32, u32), ImageError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::decode_failed(e.to_string()))?
        .into_dimensions()
        .map_err(|e| ImageError::decode_failed(e.to_string()))
}

/// Decode image data into a DynamicImage
fn decode_image(data: &[u8]) -> Result<DynamicImage, ImageError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::decode_failed(e.to_string()))?
        .decode()
        .map_err(|e| ImageError::decode_failed(e.to_string()))
}

/// Crop the centre of `img` to the aspect ratio of the target size
fn crop_to_aspect(
    img: DynamicImage,
    target_w: u32,
    target_h: u32,
) -> Result<DynamicImage, ImageError> {
    if target_w == 0 || target_h == 0 {
        return Err(ImageError::resize_failed("Target dimensions must be non-zero"));
    }

    let (src_w, src_h) = (img.width() as u64, img.height() as u64);
    let (dst_w, dst_h) = (target_w as u64, target_h as u64);

    // Compare src_w/src_h with dst_w/dst_h without floating point
    let (crop_w, crop_h) = if src_w * dst_h > src_h * dst_w {
        (((src_h * dst_w + dst_h / 2) / dst_h).clamp(1, src_w), src_h)
    } else {
        (src_w, ((src_w * dst_h + dst_w / 2) / dst_w).clamp(1, src_h))
    };

    if crop_w == src_w && crop_h == src_h {
        return Ok(img);
    }

    let x = (src_w - crop_w) / 2;
    let y = (src_h - crop_h) / 2;
    Ok(img.crop_imm(x as u32, y as u32, crop_w as u32, crop_h as u32))
}

/// Resize image using fast-image-resize with Lanczos3 filter
fn scale_image(img: &DynamicImage, target_w: u32, target_h: u32) -> Result<DynamicImage, ImageError> {
    let src_width =
        NonZeroU32::new(img.width()).ok_or_else(|| ImageError::resize_failed("Source width is 0"))?;
    let src_height = NonZeroU32::new(img.height())
        .ok_or_else(|| ImageError::resize_failed("Source height is 0"))?;
    let dst_width =
        NonZeroU32::new(target_w).ok_or_else(|| ImageError::resize_failed("Target width is 0"))?;
    let dst_height =
        NonZeroU32::new(target_h).ok_or_else(|| ImageError::resize_failed("Target height is 0"))?;

    let src_image = Image::from_vec_u8(
        src_width,
        src_height,
        img.to_rgba8().into_raw(),
        PixelType::U8x4,
    )
    .map_err(|e| ImageError::resize_failed(format!("Failed to create source image: {:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));

    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| ImageError::resize_failed(format!("Resize operation failed: {:?}", e)))?;

    let rgba_image = image::RgbaImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| ImageError::resize_failed("Failed to create output image buffer"))?;

    Ok(DynamicImage::ImageRgba8(rgba_image))
}
