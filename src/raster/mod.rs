//! Pixel rendering of IIIF requests.
//!
//! The request model never touches pixels. Rendering goes through the
//! [`RasterBackend`] trait, which applies the request steps in protocol order:
//!
//! ```text
//!   source ──► extract(region) ──► resize_to(size) ──► rotate_to(rotation)
//!                                                          │
//!           bytes ◄── encode(format) ◄── adjust(quality) ◄─┘
//! ```
//!
//! [`RasterImage`] implements the backend over the `image` crate and writes
//! JPEG, PNG, GIF, TIFF and WebP.

mod backend;
mod decoded;
mod encoder;

pub use backend::RasterBackend;
pub use decoded::{RasterImage, BITONAL_THRESHOLD};
pub use encoder::{
    encode, image_format, is_valid_quality, jpeg_quality, DEFAULT_JPEG_QUALITY, MAX_JPEG_QUALITY,
    MIN_JPEG_QUALITY,
};
