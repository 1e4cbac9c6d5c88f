//! The raster backend contract.
//!
//! A backend owns the pixels of one working image. Each transform step
//! consumes the image and returns the transformed one, so a request always
//! works on its own copy and steps cannot be applied out of order by
//! accident when [`RasterBackend::transform`] is used.

use bytes::Bytes;

use crate::api::{Format, Quality, Region, Request, Rotation, Size};
use crate::error::ImageError;
use crate::tile::geometry;

/// Pixel operations needed to render an IIIF request.
pub trait RasterBackend: Sized {
    /// Current `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Crop to a region of the current image.
    fn extract(self, region: &Region) -> Result<Self, ImageError>;

    /// Scale to a requested size.
    fn resize_to(self, size: &Size) -> Result<Self, ImageError>;

    /// Mirror and/or rotate clockwise.
    fn rotate_to(self, rotation: &Rotation) -> Result<Self, ImageError>;

    /// Convert to the requested quality.
    fn adjust(self, quality: Quality) -> Result<Self, ImageError>;

    /// Encode the current image. `quality` is a JPEG quality fraction in
    /// `(0, 1]`, zero meaning the backend default.
    fn encode(&self, format: Format, quality: f32) -> Result<Bytes, ImageError>;

    /// Apply every step of a request: extract, resize, rotate, adjust.
    ///
    /// Region and size refer to the source image while rotation and quality
    /// apply to the cropped and scaled result, so this order is fixed.
    fn transform(self, request: &Request) -> Result<Self, ImageError> {
        self.extract(request.region())?
            .resize_to(request.size())?
            .rotate_to(request.rotation())?
            .adjust(request.quality())
    }

    /// Transform and encode in the request's format.
    fn render(self, request: &Request, quality: f32) -> Result<Bytes, ImageError> {
        self.transform(request)?.encode(request.format(), quality)
    }

    /// Extract a region into a new image, leaving this one untouched.
    fn extract_ref(&self, region: &Region) -> Result<Self, ImageError>
    where
        Self: Clone,
    {
        self.clone().extract(region)
    }

    /// Render a request against a shared source image.
    fn render_ref(&self, request: &Request, quality: f32) -> Result<Bytes, ImageError>
    where
        Self: Clone,
    {
        self.extract_ref(request.region())?
            .resize_to(request.size())?
            .rotate_to(request.rotation())?
            .adjust(request.quality())?
            .encode(request.format(), quality)
    }

    /// Largest centred square of the current image.
    fn center(&self) -> Option<Region> {
        let (width, height) = self.dimensions();
        geometry::center(width, height)
    }

    /// Aspect ratio of the current image in lowest terms (`16:9`).
    fn aspect_ratio(&self) -> String {
        let (width, height) = self.dimensions();
        geometry::aspect_ratio(width, height)
    }

    /// Tile scale factors for the current image.
    fn scale_factors(&self, tile_size: u32) -> Vec<u32> {
        let (width, height) = self.dimensions();
        geometry::scale_factors(width, height, tile_size)
    }
}
