//! Tile pyramid planning and generation.
//!
//! Deep-zoom viewers request an image as a pyramid of tiles: at every
//! power-of-two reduction the image is cut into fixed-size squares, each
//! addressed by a canonical IIIF request. This module computes that pyramid
//! from the image dimensions alone and can render it to disk.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │     (width, height, tile size)          │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │               Planner                   │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │ scale_factors│  │  tile_paths     │  │
//! │  │ (1, 2, 4 …)  │  │ (coarsest first)│  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │     TileGenerator (RasterBackend)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`tile_paths`]: Every canonical tile request path for an image
//! - [`scale_factors`]: Reduction factors shared with the image info document
//! - [`center`] / [`aspect_ratio`]: Small dimension helpers
//! - [`TileGenerator`]: Renders the planned tiles and `info.json` to a directory
//!
//! # Example
//!
//! ```
//! use iiif_tiler::tile::{scale_factors, tile_paths};
//!
//! let paths = tile_paths("/iiif", "asdf", 500, 2000, 2000);
//! assert_eq!(paths.len(), 20);
//! assert_eq!(paths[0], "/iiif/asdf/1000,1000,1000,1000/500,/0/default.jpg");
//!
//! assert_eq!(scale_factors(2000, 2000, 500), vec![1, 2]);
//! ```

mod generator;
pub mod geometry;
mod planner;

pub use generator::{
    GenerationReport, TileGenerator, DEFAULT_CONCURRENCY, DEFAULT_SERVICE_PREFIX,
    DEFAULT_TILE_SIZE,
};
pub use geometry::{aspect_ratio, center, gcd, scale_factors};
pub use planner::{plan_level, tile_paths, tile_requests};
