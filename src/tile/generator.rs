//! Tile set pre-generation.
//!
//! Renders every tile of the planned pyramid, plus the image info document,
//! into a directory that can be served as static files.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          TileGenerator                            │
//! │  ┌────────────────────────────────────────────────────────────┐  │
//! │  │                      generate()                            │  │
//! │  │  1. Plan tile paths     4. Render on the blocking pool     │  │
//! │  │  2. Parse each path     5. Write <out>/<path>              │  │
//! │  │  3. Acquire a permit    6. Write info.json                 │  │
//! │  └────────────────────────────────────────────────────────────┘  │
//! │          │                      │                      │         │
//! │          ▼                      ▼                      ▼         │
//! │   ┌─────────────┐      ┌─────────────────┐     ┌─────────────┐  │
//! │   │ tile_paths  │      │  RasterBackend  │     │  ImageInfo  │  │
//! │   └─────────────┘      └─────────────────┘     └─────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A tile that fails to render or write is logged and counted in the
//! [`GenerationReport`]; it never stops the remaining tiles.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::planner::tile_paths;
use crate::api::{Format, Quality, Request};
use crate::error::{ImageError, TileError};
use crate::info::{ComplianceLevel, ImageInfo, Profile, Service, INFO_FILE_NAME};
use crate::raster::{RasterBackend, DEFAULT_JPEG_QUALITY};

/// Default tile edge in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Default number of tiles rendered at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default service prefix of generated paths.
pub const DEFAULT_SERVICE_PREFIX: &str = "iiif";

// =============================================================================
// Generation Report
// =============================================================================

/// Outcome of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Number of tiles in the plan
    pub planned: usize,

    /// Number of tiles written to disk
    pub written: usize,

    /// Number of tiles that failed to render or write
    pub failed: usize,

    /// Location of the written info document
    pub info_path: Option<PathBuf>,
}

impl GenerationReport {
    /// Whether every planned tile was written.
    pub fn is_complete(&self) -> bool {
        self.failed == 0 && self.written == self.planned
    }
}

// =============================================================================
// Tile Generator
// =============================================================================

/// Pre-generates the tiles of one source image.
///
/// # Type Parameters
///
/// * `B` - The raster backend holding the decoded source image
///
/// # Example
///
/// ```no_run
/// use iiif_tiler::raster::RasterImage;
/// use iiif_tiler::tile::TileGenerator;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let source = RasterImage::open("scan.tif")?;
/// let generator = TileGenerator::new(source, "iiif", "scan").with_tile_size(512);
///
/// let report = generator.generate("public").await?;
/// println!("{} of {} tiles written", report.written, report.planned);
/// # Ok(())
/// # }
/// ```
pub struct TileGenerator<B> {
    /// The decoded source image, shared by all rendering tasks
    source: Arc<B>,

    service_prefix: String,
    id: String,
    tile_size: u32,
    concurrency: usize,
    jpeg_quality: f32,

    /// `@id` of the info document; defaults to `/{prefix}/{id}`
    info_id: Option<String>,
    profile: Profile,
    services: Vec<Service>,
}

impl<B> TileGenerator<B>
where
    B: RasterBackend + Clone + Send + Sync + 'static,
{
    /// Create a generator with default settings.
    ///
    /// The default profile is level 0 with JPEG output, which is what a
    /// static tile set supports.
    pub fn new(source: B, service_prefix: &str, id: impl Into<String>) -> Self {
        Self {
            source: Arc::new(source),
            service_prefix: service_prefix.replace('/', ""),
            id: id.into(),
            tile_size: DEFAULT_TILE_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            info_id: None,
            profile: Profile::new(ComplianceLevel::Zero)
                .with_formats([Format::Jpg])
                .with_qualities([Quality::Default]),
            services: Vec::new(),
        }
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Maximum number of tiles rendered at once (at least one).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_jpeg_quality(mut self, quality: f32) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Set the `@id` written to the info document, usually the public URI of
    /// the image service.
    pub fn with_info_id(mut self, info_id: impl Into<String>) -> Self {
        self.info_id = Some(info_id.into());
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_service(mut self, service: impl Into<Service>) -> Self {
        self.services.push(service.into());
        self
    }

    /// The planned tile paths, coarsest tiles first.
    pub fn plan(&self) -> Vec<String> {
        let (width, height) = self.source.dimensions();
        tile_paths(&self.service_prefix, &self.id, self.tile_size, width, height)
    }

    /// The info document describing the generated tiles.
    pub fn image_info(&self) -> Result<ImageInfo, TileError> {
        let (width, height) = self.source.dimensions();
        let info_id = self.info_id.clone().unwrap_or_else(|| {
            format!(
                "/{}/{}",
                self.service_prefix,
                urlencoding::encode(&self.id)
            )
        });

        let info = ImageInfo::for_image(info_id, width, height, self.tile_size, self.profile.clone())?
            .with_services(self.services.clone());

        Ok(info)
    }

    /// Render one request path against the source image.
    pub fn render_tile(&self, path: &str) -> Result<Bytes, ImageError> {
        render_path(self.source.as_ref(), path, self.jpeg_quality)
    }

    /// Render every planned tile into `output_dir` and write the info
    /// document next to them.
    ///
    /// Each tile lands at `<output_dir>/<tile path>`. Individual tile
    /// failures are counted in the report; only failing to create the output
    /// directory or the info document returns an error.
    pub async fn generate(&self, output_dir: impl AsRef<Path>) -> Result<GenerationReport, TileError> {
        let output_dir = output_dir.as_ref();
        tokio::fs::create_dir_all(output_dir).await?;

        let paths = self.plan();
        let mut report = GenerationReport {
            planned: paths.len(),
            ..GenerationReport::default()
        };

        info!(
            id = %self.id,
            tiles = paths.len(),
            tile_size = self.tile_size,
            concurrency = self.concurrency,
            "Generating tiles"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for path in paths {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| TileError::Task(e.to_string()))?;

            let source = Arc::clone(&self.source);
            let quality = self.jpeg_quality;
            let target = tile_file(output_dir, &path);

            tasks.spawn(async move {
                let _permit = permit;
                let result = write_tile(source, &path, target, quality).await;
                (path, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((path, Ok(()))) => {
                    debug!(path = %path, "Tile written");
                    report.written += 1;
                }
                Ok((path, Err(e))) => {
                    warn!(path = %path, error = %e, "Tile failed");
                    report.failed += 1;
                }
                Err(e) => {
                    warn!(error = %e, "Tile task failed");
                    report.failed += 1;
                }
            }
        }

        report.info_path = Some(self.write_info(output_dir).await?);

        info!(
            id = %self.id,
            written = report.written,
            failed = report.failed,
            "Tile generation finished"
        );

        Ok(report)
    }

    /// Write the info document to `<output_dir>/<prefix>/<id>/info.json`.
    pub async fn write_info(&self, output_dir: impl AsRef<Path>) -> Result<PathBuf, TileError> {
        let relative = format!(
            "{}/{}/{}",
            self.service_prefix,
            urlencoding::encode(&self.id),
            INFO_FILE_NAME
        );
        let target = tile_file(output_dir.as_ref(), &relative)?;
        let json = self.image_info()?.to_json()?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, json).await?;

        debug!(path = %target.display(), "Info document written");
        Ok(target)
    }
}

fn render_path<B: RasterBackend + Clone>(
    source: &B,
    path: &str,
    quality: f32,
) -> Result<Bytes, ImageError> {
    let request = Request::parse(path)?;
    source.render_ref(&request, quality)
}

async fn write_tile<B>(
    source: Arc<B>,
    path: &str,
    target: Result<PathBuf, TileError>,
    quality: f32,
) -> Result<(), TileError>
where
    B: RasterBackend + Clone + Send + Sync + 'static,
{
    let target = target?;
    let owned_path = path.to_string();

    let data = tokio::task::spawn_blocking(move || render_path(source.as_ref(), &owned_path, quality))
        .await
        .map_err(|e| TileError::Task(e.to_string()))??;

    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&target, &data).await?;

    Ok(())
}

/// Map a request path to a file below `output_dir`.
///
/// Paths with `.` or `..` segments are rejected so an identifier cannot
/// escape the output directory.
fn tile_file(output_dir: &Path, path: &str) -> Result<PathBuf, TileError> {
    let relative = Path::new(path.trim_start_matches('/'));

    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(TileError::UnsafePath {
            path: path.to_string(),
        });
    }

    Ok(output_dir.join(relative))
}
