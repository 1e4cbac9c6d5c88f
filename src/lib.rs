//! # IIIF Tiler
//!
//! The IIIF Image API request model plus static tile pyramid generation.
//!
//! This library parses and serializes IIIF Image API requests of the form
//! `/{prefix}/{identifier}/{region}/{size}/{rotation}/{quality}.{format}`,
//! plans the tile requests a deep-zoom viewer issues for an image, builds
//! the matching `info.json` document and renders requests to pixels.
//!
//! ## Features
//!
//! - **Request model**: Typed region, size, rotation, quality and format
//!   parameters with canonical string forms
//! - **Tile planning**: Every tile path of an image, derived from its
//!   dimensions alone
//! - **Image info**: `info.json` documents with profile, sizes, tiles and services
//! - **Rendering**: Crop, scale, mirror, rotate, gray/bitonal and encode via the `image` crate
//! - **Static tiles**: Concurrent generation of a complete tile set on disk
//!
//! ## Architecture
//!
//! - [`api`] - Request parameters and the full request
//! - [`tile`] - Scale factors, tile planning and tile set generation
//! - [`info`] - Image info documents and profiles
//! - [`raster`] - Pixel backend and encoders
//! - [`config`] - CLI and configuration types
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust
//! use iiif_tiler::{Region, Request, Size};
//!
//! let request = Request::parse("/iiif/abc/0,0,500,500/250,/0/default.jpg").unwrap();
//! assert_eq!(request.region(), &Region::pixels(0, 0, 500, 500).unwrap());
//! assert_eq!(request.size(), &Size::width_only(250).unwrap());
//!
//! let thumbnail = request.with_size(Size::confined(100, 100).unwrap());
//! assert_eq!(thumbnail.to_string(), "/iiif/abc/0,0,500,500/!100,100/0/default.jpg");
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod info;
pub mod raster;
pub mod tile;

// Re-export commonly used types
pub use api::{Coordinate, Format, Quality, Region, Request, Rotation, Size};
pub use config::{Cli, Command, InfoConfig, PlanConfig, RenderConfig, TilesConfig};
pub use error::{ImageError, InfoError, RequestError, TileError};
pub use info::{ComplianceLevel, Feature, ImageInfo, PhysicalDimService, Profile, Service, TileSet};
pub use raster::{RasterBackend, RasterImage};
pub use tile::{
    aspect_ratio, center, scale_factors, tile_paths, tile_requests, GenerationReport,
    TileGenerator,
};
