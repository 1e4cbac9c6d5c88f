//! Tile set generation integration tests.
//!
//! Tests verify:
//! - Every planned tile lands on disk at its request path
//! - The info document is written next to the tiles
//! - Concurrency does not change the output
//! - Tile failures are counted without aborting the run

use std::path::Path;

use bytes::Bytes;
use serde_json::Value;

use iiif_tiler::api::{Format, Quality, Region, Rotation, Size};
use iiif_tiler::info::PhysicalDimService;
use iiif_tiler::{ImageError, RasterBackend, TileGenerator};

use super::test_utils::{gradient_image, is_valid_jpeg};

fn read_info(path: &Path) -> Value {
    let data = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&data).unwrap()
}

fn relative(path: &str) -> &str {
    path.trim_start_matches('/')
}

// =============================================================================
// Output Layout
// =============================================================================

#[tokio::test]
async fn test_generate_writes_every_tile() {
    let dir = tempfile::tempdir().unwrap();
    let generator = TileGenerator::new(gradient_image(600, 300), "iiif", "img");
    let plan = generator.plan();

    let report = generator.generate(dir.path()).await.unwrap();

    assert!(report.is_complete());
    assert_eq!(report.planned, 8);
    assert_eq!(report.written, 8);

    for path in &plan {
        let tile = dir.path().join(relative(path));
        let data = std::fs::read(&tile).unwrap();
        assert!(is_valid_jpeg(&data), "{} is not a JPEG", path);
    }

    let edge = dir.path().join("iiif/img/512,0,88,300/44,/0/default.jpg");
    let tile = image::open(edge).unwrap();
    assert_eq!((tile.width(), tile.height()), (44, 150));
}

#[tokio::test]
async fn test_generate_writes_info_document() {
    let dir = tempfile::tempdir().unwrap();
    let generator = TileGenerator::new(gradient_image(600, 300), "iiif", "scan 01")
        .with_info_id("https://example.org/iiif/scan%2001")
        .with_service(PhysicalDimService::new(0.1, "mm"));

    let report = generator.generate(dir.path()).await.unwrap();

    let info_path = report.info_path.unwrap();
    assert_eq!(info_path, dir.path().join("iiif/scan%2001/info.json"));

    let info = read_info(&info_path);
    assert_eq!(info["@id"], "https://example.org/iiif/scan%2001");
    assert_eq!(info["width"], 600);
    assert_eq!(info["height"], 300);
    assert_eq!(info["tiles"][0]["width"], 256);
    assert_eq!(info["tiles"][0]["scaleFactors"], serde_json::json!([1, 2]));
    assert_eq!(info["service"]["physicalUnits"], "mm");

    // Tiles sit next to the info document
    assert!(dir
        .path()
        .join("iiif/scan%2001/0,0,256,256/256,/0/default.jpg")
        .exists());
}

#[tokio::test]
async fn test_concurrency_does_not_change_output() {
    let serial = tempfile::tempdir().unwrap();
    let parallel = tempfile::tempdir().unwrap();

    let report_serial = TileGenerator::new(gradient_image(700, 500), "iiif", "img")
        .with_tile_size(128)
        .with_concurrency(1)
        .generate(serial.path())
        .await
        .unwrap();

    let generator = TileGenerator::new(gradient_image(700, 500), "iiif", "img")
        .with_tile_size(128)
        .with_concurrency(16);
    let report_parallel = generator.generate(parallel.path()).await.unwrap();

    assert_eq!(report_serial.written, report_parallel.written);

    for path in generator.plan() {
        let a = std::fs::read(serial.path().join(relative(&path))).unwrap();
        let b = std::fs::read(parallel.path().join(relative(&path))).unwrap();
        assert_eq!(a, b, "tile {} differs", path);
    }
}

#[tokio::test]
async fn test_write_info_only() {
    let dir = tempfile::tempdir().unwrap();
    let generator = TileGenerator::new(gradient_image(100, 100), "/iiif/", "thumb");

    let path = generator.write_info(dir.path()).await.unwrap();

    assert_eq!(path, dir.path().join("iiif/thumb/info.json"));
    assert_eq!(read_info(&path)["@id"], "/iiif/thumb");
    assert!(!dir.path().join("iiif/thumb/full").exists());
}

// =============================================================================
// Failures
// =============================================================================

/// Backend whose encoder always fails.
#[derive(Clone)]
struct BrokenEncoder;

impl RasterBackend for BrokenEncoder {
    fn dimensions(&self) -> (u32, u32) {
        (600, 300)
    }

    fn extract(self, _region: &Region) -> Result<Self, ImageError> {
        Ok(self)
    }

    fn resize_to(self, _size: &Size) -> Result<Self, ImageError> {
        Ok(self)
    }

    fn rotate_to(self, _rotation: &Rotation) -> Result<Self, ImageError> {
        Ok(self)
    }

    fn adjust(self, _quality: Quality) -> Result<Self, ImageError> {
        Ok(self)
    }

    fn encode(&self, _format: Format, _quality: f32) -> Result<Bytes, ImageError> {
        Err(ImageError::Encode {
            message: "encoder offline".to_string(),
        })
    }
}

#[tokio::test]
async fn test_tile_failures_are_counted() {
    let dir = tempfile::tempdir().unwrap();
    let generator = TileGenerator::new(BrokenEncoder, "iiif", "img").with_concurrency(2);

    let report = generator.generate(dir.path()).await.unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.planned, 8);
    assert_eq!(report.written, 0);
    assert_eq!(report.failed, 8);

    // The info document does not depend on rendering
    assert!(report.info_path.unwrap().exists());
}

#[tokio::test]
async fn test_unusable_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("occupied");
    std::fs::write(&file, b"not a directory").unwrap();

    let generator = TileGenerator::new(gradient_image(64, 64), "iiif", "img");
    assert!(generator.generate(&file).await.is_err());
}
