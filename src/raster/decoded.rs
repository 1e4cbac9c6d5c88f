//! [`RasterBackend`] over the `image` crate.

use std::io::Cursor;
use std::path::Path;

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageReader, Luma, Rgba, RgbaImage};
use tracing::debug;

use super::backend::RasterBackend;
use super::encoder;
use crate::api::{Format, Quality, Region, Rotation, Size};
use crate::error::ImageError;

/// Luma value at or above which a bitonal pixel is white.
pub const BITONAL_THRESHOLD: u8 = 128;

/// A decoded image held in memory.
///
/// Cloning copies the pixels, which gives each request its own working image.
#[derive(Debug, Clone)]
pub struct RasterImage {
    image: DynamicImage,
}

impl RasterImage {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Decode an image file, guessing the format from its contents.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Decoding source image");

        let image = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| decode_error(path, e))?;

        Ok(Self::new(image))
    }

    /// Decode an image held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ImageError> {
        let image = ImageReader::new(Cursor::new(data))
            .with_guessed_format()?
            .decode()
            .map_err(|e| ImageError::Decode {
                message: e.to_string(),
            })?;

        Ok(Self::new(image))
    }

    /// Read the dimensions of an image file from its header, without decoding
    /// the pixels.
    pub fn read_dimensions(path: impl AsRef<Path>) -> Result<(u32, u32), ImageError> {
        let path = path.as_ref();

        ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| decode_error(path, e))
    }

    /// Pixel rectangle selected by a region, clipped to the image.
    fn crop_bounds(&self, region: &Region) -> Result<(u32, u32, u32, u32), ImageError> {
        let (width, height) = self.dimensions();
        let (x, y, w, h) = region.to_pixels(width, height);

        if x >= width || y >= height {
            return Err(ImageError::RegionOutOfBounds {
                region: region.to_string(),
                width,
                height,
            });
        }

        // Regions running past the edge are clipped
        let w = w.min(width - x);
        let h = h.min(height - y);

        if w == 0 || h == 0 {
            return Err(ImageError::EmptyResult {
                reason: format!("region {} selects no pixels", region),
            });
        }

        debug!(x, y, w, h, "Extracting region");
        Ok((x, y, w, h))
    }

    pub fn as_image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }
}

impl From<DynamicImage> for RasterImage {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

impl RasterBackend for RasterImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    fn extract(self, region: &Region) -> Result<Self, ImageError> {
        if region.is_full_image() {
            return Ok(self);
        }

        let (x, y, w, h) = self.crop_bounds(region)?;
        Ok(Self::new(self.image.crop_imm(x, y, w, h)))
    }

    fn extract_ref(&self, region: &Region) -> Result<Self, ImageError> {
        if region.is_full_image() {
            return Ok(self.clone());
        }

        let (x, y, w, h) = self.crop_bounds(region)?;
        Ok(Self::new(self.image.crop_imm(x, y, w, h)))
    }

    fn resize_to(self, size: &Size) -> Result<Self, ImageError> {
        if size.is_full_size() {
            return Ok(self);
        }

        let (width, height) = self.dimensions();
        let (target_width, target_height) = size.resolve(width, height);

        if (target_width, target_height) == (width, height) {
            return Ok(self);
        }

        debug!(target_width, target_height, "Resizing");
        Ok(Self::new(self.image.resize_exact(
            target_width,
            target_height,
            FilterType::Lanczos3,
        )))
    }

    fn rotate_to(self, rotation: &Rotation) -> Result<Self, ImageError> {
        let image = if rotation.is_mirrored() {
            self.image.fliph()
        } else {
            self.image
        };

        if !rotation.is_rotated() {
            return Ok(Self::new(image));
        }

        let rotated = if rotation.is_multiple_of_90() {
            match rotation.degrees_as_int() % 360 {
                90 => image.rotate90(),
                180 => image.rotate180(),
                270 => image.rotate270(),
                _ => image,
            }
        } else {
            DynamicImage::ImageRgba8(rotate_bilinear(&image.to_rgba8(), rotation.degrees()))
        };

        Ok(Self::new(rotated))
    }

    fn adjust(self, quality: Quality) -> Result<Self, ImageError> {
        let image = match quality {
            Quality::Default | Quality::Color => self.image,
            Quality::Gray if self.image.color().has_alpha() => {
                DynamicImage::ImageLumaA8(self.image.to_luma_alpha8())
            }
            Quality::Gray => DynamicImage::ImageLuma8(self.image.to_luma8()),
            Quality::Bitonal => DynamicImage::ImageLuma8(threshold(&self.image.to_luma8())),
        };

        Ok(Self::new(image))
    }

    fn encode(&self, format: Format, quality: f32) -> Result<Bytes, ImageError> {
        encoder::encode(&self.image, format, quality)
    }
}

fn decode_error(path: &Path, err: image::ImageError) -> ImageError {
    ImageError::Decode {
        message: format!("{}: {}", path.display(), err),
    }
}

fn threshold(gray: &GrayImage) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y).0[0] >= BITONAL_THRESHOLD {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Rotate clockwise by an arbitrary angle about the centre.
///
/// The canvas grows to hold the whole rotated image; uncovered pixels are
/// transparent.
fn rotate_bilinear(source: &RgbaImage, degrees: f32) -> RgbaImage {
    let theta = f64::from(degrees).to_radians();
    let (sin, cos) = theta.sin_cos();
    let (width, height) = (f64::from(source.width()), f64::from(source.height()));

    let out_width = (width * cos.abs() + height * sin.abs()).round().max(1.0);
    let out_height = (width * sin.abs() + height * cos.abs()).round().max(1.0);

    let (cx, cy) = (width / 2.0, height / 2.0);
    let (out_cx, out_cy) = (out_width / 2.0, out_height / 2.0);

    RgbaImage::from_fn(out_width as u32, out_height as u32, |px, py| {
        let dx = f64::from(px) + 0.5 - out_cx;
        let dy = f64::from(py) + 0.5 - out_cy;

        // Inverse rotation maps the output pixel back into the source
        let sx = dx * cos + dy * sin + cx - 0.5;
        let sy = -dx * sin + dy * cos + cy - 0.5;

        sample_bilinear(source, sx, sy)
    })
}

fn sample_bilinear(source: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let (width, height) = (f64::from(source.width()), f64::from(source.height()));

    if x <= -1.0 || y <= -1.0 || x >= width || y >= height {
        return Rgba([0, 0, 0, 0]);
    }

    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (x - x0, y - y0);

    let texel = |tx: f64, ty: f64| -> [f64; 4] {
        if tx < 0.0 || ty < 0.0 || tx >= width || ty >= height {
            [0.0; 4]
        } else {
            source.get_pixel(tx as u32, ty as u32).0.map(f64::from)
        }
    };

    let corners = [
        (texel(x0, y0), (1.0 - fx) * (1.0 - fy)),
        (texel(x0 + 1.0, y0), fx * (1.0 - fy)),
        (texel(x0, y0 + 1.0), (1.0 - fx) * fy),
        (texel(x0 + 1.0, y0 + 1.0), fx * fy),
    ];

    let mut pixel = [0u8; 4];
    for (channel, value) in pixel.iter_mut().enumerate() {
        let sum: f64 = corners.iter().map(|(t, w)| t[channel] * w).sum();
        *value = sum.round().clamp(0.0, 255.0) as u8;
    }

    Rgba(pixel)
}
