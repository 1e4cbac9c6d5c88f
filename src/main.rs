//! IIIF Tiler - IIIF Image API requests and static tile sets.
//!
//! This binary wires the CLI to the library: planning tile paths, printing
//! info documents, rendering single requests and generating tile sets.

use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iiif_tiler::{
    config::{
        info_id, profile_for_level, Cli, Command, InfoConfig, PlanConfig, RenderConfig,
        TilesConfig,
    },
    info::ImageInfo,
    raster::{RasterBackend, RasterImage},
    tile::{tile_paths, TileGenerator},
    Request,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Plan(config) => run_plan(config),
        Command::Info(config) => run_info(config),
        Command::Render(config) => run_render(config),
        Command::Tiles(config) => run_tiles(config).await,
    }
}

// =============================================================================
// Plan Command
// =============================================================================

fn run_plan(config: PlanConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let paths = tile_paths(
        &config.prefix,
        &config.id,
        config.tile_size,
        config.width,
        config.height,
    );
    debug!(tiles = paths.len(), "Planned tile paths");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for path in &paths {
        if writeln!(out, "{}", path).is_err() {
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Info Command
// =============================================================================

fn run_info(config: InfoConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let (width, height) = match (&config.source, config.width, config.height) {
        (_, Some(width), Some(height)) => (width, height),
        (Some(source), _, _) => match RasterImage::read_dimensions(source) {
            Ok(dimensions) => dimensions,
            Err(e) => {
                error!("Failed to read {}: {}", source.display(), e);
                return ExitCode::FAILURE;
            }
        },
        _ => {
            error!("No image dimensions available");
            return ExitCode::FAILURE;
        }
    };

    let Some(id) = config.image_id() else {
        error!("No image identifier available; set --id");
        return ExitCode::FAILURE;
    };

    let info = ImageInfo::for_image(
        info_id(config.base_uri.as_deref(), &config.prefix, &id),
        width,
        height,
        config.tile_size,
        config.profile(),
    );

    let info = match (info, config.physical_service()) {
        (Ok(info), Some(service)) => info.add_service(service),
        (Ok(info), None) => info,
        (Err(e), _) => {
            error!("Failed to build info document: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match info.to_json() {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize info document: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Render Command
// =============================================================================

fn run_render(config: RenderConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let request = match Request::parse(&config.request) {
        Ok(request) => request,
        Err(e) => {
            error!("Invalid request: {}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!(request = %request, "Parsed request");

    let source = match RasterImage::open(&config.source) {
        Ok(source) => source,
        Err(e) => {
            error!("Failed to open {}: {}", config.source.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let bytes = match source.render(&request, config.jpeg_quality) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Rendering failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let written = match &config.output {
        Some(path) => std::fs::write(path, &bytes).map(|_| {
            info!("Wrote {} bytes to {}", bytes.len(), path.display());
        }),
        None => std::io::stdout().lock().write_all(&bytes),
    };

    if let Err(e) = written {
        error!("Failed to write output: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Tiles Command
// =============================================================================

async fn run_tiles(config: TilesConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let Some(id) = config.image_id() else {
        error!("No image identifier available; set --id");
        return ExitCode::FAILURE;
    };

    let source_path = config.source.clone();
    let opened = tokio::task::spawn_blocking(move || RasterImage::open(source_path)).await;
    let source = match opened {
        Ok(Ok(source)) => source,
        Ok(Err(e)) => {
            error!("Failed to open {}: {}", config.source.display(), e);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            error!("Failed to open {}: {}", config.source.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let (width, height) = source.dimensions();
    info!("Configuration:");
    info!("  Source: {} ({}x{})", config.source.display(), width, height);
    info!("  Output: {}", config.output.display());
    info!("  Tile size: {}", config.tile_size);
    info!("  Concurrency: {}", config.concurrency);

    let generator = TileGenerator::new(source, &config.prefix, id.as_str())
        .with_tile_size(config.tile_size)
        .with_concurrency(config.concurrency)
        .with_jpeg_quality(config.jpeg_quality)
        .with_profile(profile_for_level(0))
        .with_info_id(info_id(config.base_uri.as_deref(), &config.prefix, &id));

    let report = match generator.generate(&config.output).await {
        Ok(report) => report,
        Err(e) => {
            error!("Tile generation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) = &report.info_path {
        info!("  Info: {}", path.display());
    }

    if report.is_complete() {
        info!("Wrote {} of {} tiles", report.written, report.planned);
        ExitCode::SUCCESS
    } else {
        warn!(
            "Wrote {} of {} tiles, {} failed",
            report.written, report.planned, report.failed
        );
        ExitCode::FAILURE
    }
}

/// Initialize the tracing/logging subsystem.
///
/// Logs go to stderr so command output on stdout stays clean.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "iiif_tiler=debug"
    } else {
        "iiif_tiler=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
