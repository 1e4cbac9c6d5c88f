//! Derivative encoder.
//!
//! Turns a rendered [`DynamicImage`] into the bytes of the requested output
//! format.
//!
//! # Design Decisions
//!
//! - **JPEG has no alpha**: transparent pixels (for example the corners left
//!   by an arbitrary rotation) are flattened onto white before encoding.
//!
//! - **Quality is a fraction**: callers pass JPEG quality in `(0, 1]`; zero
//!   selects [`DEFAULT_JPEG_QUALITY`]. Lossless formats ignore it.
//!
//! - **TIFF has no gray with alpha**: gray images that kept an alpha channel
//!   are widened to RGBA so the alpha survives.
//!
//! - **No JPEG 2000 or PDF**: requests for `jp2` or `pdf` are parsed like any
//!   other, but encoding them fails with [`ImageError::UnsupportedOutput`].

use std::borrow::Cow;
use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::api::Format;
use crate::error::ImageError;

/// Default JPEG quality, as a fraction.
pub const DEFAULT_JPEG_QUALITY: f32 = 0.9;

/// Minimum JPEG quality on the encoder's 1-100 scale.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum JPEG quality on the encoder's 1-100 scale.
pub const MAX_JPEG_QUALITY: u8 = 100;

// =============================================================================
// Quality
// =============================================================================

/// Whether `quality` is a usable JPEG quality fraction (`0` means default).
#[inline]
pub fn is_valid_quality(quality: f32) -> bool {
    quality.is_finite() && (0.0..=1.0).contains(&quality)
}

/// Convert a quality fraction to the encoder's 1-100 scale.
///
/// Zero, negative and non-finite values select the default.
pub fn jpeg_quality(quality: f32) -> u8 {
    let quality = if quality.is_finite() && quality > 0.0 {
        quality.min(1.0)
    } else {
        DEFAULT_JPEG_QUALITY
    };

    ((quality * 100.0).round() as u8).clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
}

/// The `image` crate format used to write an output format, if one is
/// available.
pub fn image_format(format: Format) -> Option<ImageFormat> {
    match format {
        Format::Jpg => Some(ImageFormat::Jpeg),
        Format::Tif => Some(ImageFormat::Tiff),
        Format::Png => Some(ImageFormat::Png),
        Format::Gif => Some(ImageFormat::Gif),
        Format::Webp => Some(ImageFormat::WebP),
        Format::Jp2 | Format::Pdf => None,
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode an image in the given output format.
///
/// `quality` only affects JPEG output.
pub fn encode(image: &DynamicImage, format: Format, quality: f32) -> Result<Bytes, ImageError> {
    let Some(image_format) = image_format(format) else {
        return Err(ImageError::UnsupportedOutput {
            format: format.to_string(),
        });
    };

    let mut output = Vec::new();

    match image_format {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut output, jpeg_quality(quality));
            jpeg_ready(image)
                .write_with_encoder(encoder)
                .map_err(encode_error)?;
        }
        ImageFormat::Gif | ImageFormat::WebP => {
            // Both encoders only take 8-bit RGB(A)
            let image = if image.color().has_alpha() {
                DynamicImage::ImageRgba8(image.to_rgba8())
            } else {
                DynamicImage::ImageRgb8(image.to_rgb8())
            };
            image
                .write_to(&mut Cursor::new(&mut output), image_format)
                .map_err(encode_error)?;
        }
        ImageFormat::Tiff => {
            tiff_ready(image)
                .write_to(&mut Cursor::new(&mut output), image_format)
                .map_err(encode_error)?;
        }
        _ => {
            image
                .write_to(&mut Cursor::new(&mut output), image_format)
                .map_err(encode_error)?;
        }
    }

    Ok(Bytes::from(output))
}

/// Gray images stay gray; everything else becomes 8-bit RGB with any alpha
/// composited onto white.
fn jpeg_ready(image: &DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(_) => image.clone(),
        _ if !image.color().has_alpha() => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ => DynamicImage::ImageRgb8(flatten_onto_white(image)),
    }
}

/// The TIFF encoder rejects gray with alpha.
fn tiff_ready(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageLumaA8(_) => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
        DynamicImage::ImageLumaA16(_) => Cow::Owned(DynamicImage::ImageRgba16(image.to_rgba16())),
        _ => Cow::Borrowed(image),
    }
}

fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();

    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

fn encode_error(err: image::ImageError) -> ImageError {
    ImageError::Encode {
        message: err.to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
