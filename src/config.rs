//! Command-line configuration for the `iiif-tiler` binary.
//!
//! This module provides the CLI definition:
//! - Subcommands via clap derive
//! - Environment variables with `IIIF_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use iiif_tiler::config::{Cli, Command};
//!
//! let cli = Cli::parse();
//!
//! match cli.into_command() {
//!     Command::Plan(config) => println!("{} tiles", config.tile_size),
//!     _ => {}
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `IIIF_PREFIX` - Service prefix of generated paths (default: iiif)
//! - `IIIF_TILE_SIZE` - Tile edge in pixels (default: 256)
//! - `IIIF_BASE_URI` - Public base URI used for the info document `@id`
//! - `IIIF_LEVEL` - Compliance level advertised in info documents (default: 2)
//! - `IIIF_JPEG_QUALITY` - JPEG quality fraction (default: 0.9)
//! - `IIIF_CONCURRENCY` - Tiles rendered at once (default: 4)

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::api::{Format, Quality};
use crate::info::{ComplianceLevel, Feature, PhysicalDimService, Profile};
use crate::raster::{is_valid_quality, DEFAULT_JPEG_QUALITY};
use crate::tile::{DEFAULT_CONCURRENCY, DEFAULT_SERVICE_PREFIX, DEFAULT_TILE_SIZE};

// =============================================================================
// Default Values
// =============================================================================

/// Default compliance level of generated info documents.
pub const DEFAULT_LEVEL: u8 = 2;

/// Largest accepted tile edge.
pub const MAX_TILE_SIZE: u32 = 8192;

// =============================================================================
// CLI Arguments
// =============================================================================

/// IIIF Tiler - IIIF Image API request handling and static tile generation.
///
/// Plans tile pyramids, writes image info documents, renders single IIIF
/// requests and pre-generates complete tile sets for deep-zoom viewers.
#[derive(Parser, Debug, Clone)]
#[command(name = "iiif-tiler")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the tile request paths for an image of the given size.
    Plan(PlanConfig),

    /// Print the info.json document for an image.
    Info(InfoConfig),

    /// Render one IIIF request path against a source image.
    Render(RenderConfig),

    /// Pre-generate every tile of an image plus its info.json.
    Tiles(TilesConfig),
}

// =============================================================================
// Plan Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct PlanConfig {
    /// Image width in pixels.
    #[arg(long)]
    pub width: u32,

    /// Image height in pixels.
    #[arg(long)]
    pub height: u32,

    /// Image identifier used in the paths.
    #[arg(long)]
    pub id: String,

    /// Service prefix of the paths.
    #[arg(long, default_value = DEFAULT_SERVICE_PREFIX, env = "IIIF_PREFIX")]
    pub prefix: String,

    /// Tile edge in pixels.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, env = "IIIF_TILE_SIZE")]
    pub tile_size: u32,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl PlanConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("width and height must be greater than 0".to_string());
        }

        validate_id(&self.id)?;
        validate_tile_size(self.tile_size)
    }
}

// =============================================================================
// Info Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct InfoConfig {
    /// Source image; its dimensions are read from the file header.
    pub source: Option<PathBuf>,

    /// Image width, when no source image is given.
    #[arg(long, requires = "height")]
    pub width: Option<u32>,

    /// Image height, when no source image is given.
    #[arg(long, requires = "width")]
    pub height: Option<u32>,

    /// Image identifier (defaults to the source file stem).
    #[arg(long)]
    pub id: Option<String>,

    /// Service prefix.
    #[arg(long, default_value = DEFAULT_SERVICE_PREFIX, env = "IIIF_PREFIX")]
    pub prefix: String,

    /// Public base URI of the image service, e.g. `https://example.org`.
    #[arg(long, env = "IIIF_BASE_URI")]
    pub base_uri: Option<String>,

    /// Tile edge in pixels.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, env = "IIIF_TILE_SIZE")]
    pub tile_size: u32,

    /// Compliance level (0, 1 or 2).
    #[arg(long, default_value_t = DEFAULT_LEVEL, env = "IIIF_LEVEL")]
    pub level: u8,

    /// Physical size of one pixel, in `--physical-units`.
    #[arg(long, requires = "physical_units")]
    pub physical_scale: Option<f64>,

    /// Units of `--physical-scale` (e.g. `in`, `mm`).
    #[arg(long, requires = "physical_scale")]
    pub physical_units: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl InfoConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        match (&self.source, self.width, self.height) {
            (None, None, _) | (None, _, None) => {
                return Err("Either a source image or --width and --height is required".to_string());
            }
            (_, Some(0), _) | (_, _, Some(0)) => {
                return Err("width and height must be greater than 0".to_string());
            }
            _ => {}
        }

        if self.source.is_none() && self.id.is_none() {
            return Err("--id is required when no source image is given".to_string());
        }

        if let Some(id) = &self.id {
            validate_id(id)?;
        }

        validate_tile_size(self.tile_size)?;
        validate_level(self.level)?;

        if let Some(scale) = self.physical_scale {
            if !scale.is_finite() || scale <= 0.0 {
                return Err("physical_scale must be a positive number".to_string());
            }
        }

        Ok(())
    }

    /// The image identifier: `--id`, or the source file stem.
    pub fn image_id(&self) -> Option<String> {
        self.id
            .clone()
            .or_else(|| self.source.as_deref().and_then(file_stem))
    }

    /// The physical dimensions service, when configured.
    pub fn physical_service(&self) -> Option<PhysicalDimService> {
        match (self.physical_scale, &self.physical_units) {
            (Some(scale), Some(units)) => Some(PhysicalDimService::new(scale, units.clone())),
            _ => None,
        }
    }

    /// Profile advertised for the configured level.
    pub fn profile(&self) -> Profile {
        profile_for_level(self.level)
    }
}

// =============================================================================
// Render Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct RenderConfig {
    /// Source image.
    pub source: PathBuf,

    /// IIIF request path, e.g. `/iiif/abc/full/!512,512/0/default.jpg`.
    pub request: String,

    /// Output file (defaults to stdout).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JPEG quality, a fraction in (0, 1].
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "IIIF_JPEG_QUALITY")]
    pub jpeg_quality: f32,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl RenderConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.request.is_empty() {
            return Err("request path must not be empty".to_string());
        }

        validate_jpeg_quality(self.jpeg_quality)
    }
}

// =============================================================================
// Tiles Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct TilesConfig {
    /// Source image.
    pub source: PathBuf,

    /// Directory the tiles are written to.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Image identifier (defaults to the source file stem).
    #[arg(long)]
    pub id: Option<String>,

    /// Service prefix of the tile paths.
    #[arg(long, default_value = DEFAULT_SERVICE_PREFIX, env = "IIIF_PREFIX")]
    pub prefix: String,

    /// Public base URI of the image service, e.g. `https://example.org`.
    #[arg(long, env = "IIIF_BASE_URI")]
    pub base_uri: Option<String>,

    /// Tile edge in pixels.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, env = "IIIF_TILE_SIZE")]
    pub tile_size: u32,

    /// Number of tiles rendered at once.
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, env = "IIIF_CONCURRENCY")]
    pub concurrency: usize,

    /// JPEG quality, a fraction in (0, 1].
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "IIIF_JPEG_QUALITY")]
    pub jpeg_quality: f32,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl TilesConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(id) = &self.id {
            validate_id(id)?;
        }

        if self.image_id().is_none() {
            return Err("Cannot derive an identifier from the source; set --id".to_string());
        }

        validate_tile_size(self.tile_size)?;

        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".to_string());
        }

        validate_jpeg_quality(self.jpeg_quality)
    }

    /// The image identifier: `--id`, or the source file stem.
    pub fn image_id(&self) -> Option<String> {
        self.id.clone().or_else(|| file_stem(&self.source))
    }
}

// =============================================================================
// Shared Helpers
// =============================================================================

/// The `@id` of an info document: `{base}/{prefix}/{id}`, or
/// `/{prefix}/{id}` without a base URI. The identifier is percent-encoded.
pub fn info_id(base_uri: Option<&str>, prefix: &str, id: &str) -> String {
    format!(
        "{}/{}/{}",
        base_uri.unwrap_or("").trim_end_matches('/'),
        prefix.replace('/', ""),
        urlencoding::encode(id)
    )
}

/// Profile for a compliance level: level 0 advertises JPEG only, higher
/// levels every encodable format and quality.
pub fn profile_for_level(level: u8) -> Profile {
    let level = ComplianceLevel::from_number(level).unwrap_or_default();
    let profile = Profile::new(level);

    match level {
        ComplianceLevel::Zero => profile
            .with_formats([Format::Jpg])
            .with_qualities([Quality::Default]),
        ComplianceLevel::One => profile
            .with_formats([Format::Jpg, Format::Png])
            .with_qualities([Quality::Default, Quality::Color, Quality::Gray])
            .with_features([Feature::RegionByPx, Feature::SizeByW, Feature::SizeByH]),
        ComplianceLevel::Two => profile
            .with_formats([Format::Jpg, Format::Png, Format::Gif, Format::Tif, Format::Webp])
            .with_qualities(Quality::ALL)
            .with_features([
                Feature::Mirroring,
                Feature::RegionSquare,
                Feature::RotationArbitrary,
                Feature::SizeByConfinedWh,
            ]),
    }
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn validate_id(id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("identifier must not be empty".to_string());
    }
    if id == "." || id == ".." {
        return Err(format!("'{}' is not a usable identifier", id));
    }
    Ok(())
}

fn validate_tile_size(tile_size: u32) -> Result<(), String> {
    if tile_size == 0 || tile_size > MAX_TILE_SIZE {
        return Err(format!("tile_size must be between 1 and {}", MAX_TILE_SIZE));
    }
    Ok(())
}

fn validate_level(level: u8) -> Result<(), String> {
    if ComplianceLevel::from_number(level).is_none() {
        return Err("level must be 0, 1 or 2".to_string());
    }
    Ok(())
}

fn validate_jpeg_quality(quality: f32) -> Result<(), String> {
    if !is_valid_quality(quality) || quality == 0.0 {
        return Err("jpeg_quality must be greater than 0 and at most 1".to_string());
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
