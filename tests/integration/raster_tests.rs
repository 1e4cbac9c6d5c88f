//! Rendering integration tests.
//!
//! Tests verify:
//! - Requests render to the expected pixels and dimensions
//! - Mirroring and rotation move content where expected
//! - Gray and bitonal output
//! - Encoded output is decodable for every writable format
//! - Bad regions and unwritable formats fail with client errors
//! - Images can be read from disk

use image::{ColorType, GenericImageView};

use iiif_tiler::{Format, ImageError, RasterBackend, RasterImage, Request};

use super::test_utils::{
    decode, gradient_image, is_valid_jpeg, is_valid_png, split_image, transparent_image,
};

const RED: [u8; 3] = [255, 0, 0];
const BLUE: [u8; 3] = [0, 0, 255];

fn render(image: &RasterImage, path: &str) -> Result<Vec<u8>, ImageError> {
    let request = Request::parse(path)?;
    image.render_ref(&request, 0.9).map(|bytes| bytes.to_vec())
}

fn rgb_at(data: &[u8], x: u32, y: u32) -> [u8; 3] {
    decode(data).to_rgb8().get_pixel(x, y).0
}

// =============================================================================
// Region and Size
// =============================================================================

#[test]
fn test_full_request_is_lossless_in_png() {
    let image = split_image(40, 20);
    let data = render(&image, "/iiif/x/full/full/0/default.png").unwrap();

    assert!(is_valid_png(&data));
    assert_eq!(decode(&data).dimensions(), (40, 20));
    assert_eq!(rgb_at(&data, 0, 0), RED);
    assert_eq!(rgb_at(&data, 39, 19), BLUE);
}

#[test]
fn test_percent_region_selects_right_half() {
    let image = split_image(40, 20);
    let data = render(&image, "/iiif/x/pct:50,0,50,100/full/0/default.png").unwrap();

    let output = decode(&data).to_rgb8();
    assert_eq!(output.dimensions(), (20, 20));
    assert!(output.pixels().all(|p| p.0 == BLUE));
}

#[test]
fn test_region_past_edge_is_clipped() {
    let image = split_image(40, 20);
    let data = render(&image, "/iiif/x/30,10,100,100/full/0/default.png").unwrap();
    assert_eq!(decode(&data).dimensions(), (10, 10));
}

#[test]
fn test_sizes() {
    let image = gradient_image(200, 100);

    let cases = [
        ("full", (200, 100)),
        ("100,", (100, 50)),
        (",25", (50, 25)),
        ("pct:50", (100, 50)),
        ("!50,50", (50, 25)),
        ("60,70", (60, 70)),
        ("400,", (200, 100)),
    ];

    for (size, expected) in cases {
        let path = format!("/iiif/x/full/{}/0/default.png", size);
        let data = render(&image, &path).unwrap();
        assert_eq!(decode(&data).dimensions(), expected, "size {}", size);
    }
}

// =============================================================================
// Rotation and Mirroring
// =============================================================================

#[test]
fn test_mirroring_swaps_halves() {
    let image = split_image(40, 20);
    let data = render(&image, "/iiif/x/full/full/!0/default.png").unwrap();

    assert_eq!(rgb_at(&data, 0, 0), BLUE);
    assert_eq!(rgb_at(&data, 39, 0), RED);
}

#[test]
fn test_quarter_turns() {
    let image = split_image(40, 20);

    let data = render(&image, "/iiif/x/full/full/90/default.png").unwrap();
    assert_eq!(decode(&data).dimensions(), (20, 40));
    assert_eq!(rgb_at(&data, 10, 5), RED);
    assert_eq!(rgb_at(&data, 10, 35), BLUE);

    let data = render(&image, "/iiif/x/full/full/180/default.png").unwrap();
    assert_eq!(decode(&data).dimensions(), (40, 20));
    assert_eq!(rgb_at(&data, 0, 0), BLUE);

    let data = render(&image, "/iiif/x/full/full/360/default.png").unwrap();
    assert_eq!(rgb_at(&data, 0, 0), RED);
}

#[test]
fn test_arbitrary_rotation_enlarges_canvas() {
    let image = gradient_image(100, 100);
    let data = render(&image, "/iiif/x/full/full/45/default.png").unwrap();

    let output = decode(&data);
    assert_eq!(output.dimensions(), (141, 141));
    assert!(output.color().has_alpha());
    // Corners fall outside the rotated square
    assert_eq!(output.to_rgba8().get_pixel(0, 0).0[3], 0);
}

// =============================================================================
// Quality
// =============================================================================

#[test]
fn test_gray_quality() {
    let image = split_image(40, 20);
    let data = render(&image, "/iiif/x/full/full/0/gray.png").unwrap();
    assert_eq!(decode(&data).color(), ColorType::L8);
}

#[test]
fn test_bitonal_quality() {
    let image = gradient_image(256, 256);
    let data = render(&image, "/iiif/x/full/full/0/bitonal.png").unwrap();

    let output = decode(&data).to_luma8();
    assert!(output.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    assert!(output.pixels().any(|p| p.0[0] == 255));
}

#[test]
fn test_gray_tiff_after_arbitrary_rotation() {
    let image = gradient_image(40, 40);
    let data = render(&image, "/iiif/x/full/full/45/gray.tif").unwrap();

    let output = decode(&data);
    assert_eq!(output.dimensions(), (57, 57));
    assert!(output.color().has_alpha());
    assert_eq!(output.to_rgba8().get_pixel(0, 0).0[3], 0);

    // Gray content is stored as equal channels
    let [r, g, b, a] = output.to_rgba8().get_pixel(28, 28).0;
    assert!(r == g && g == b, "not gray: {:?}", [r, g, b]);
    assert_eq!(a, 255);
}

#[test]
fn test_gray_tiff_from_transparent_source() {
    let image = transparent_image(16, 12);
    let data = render(&image, "/iiif/x/full/full/0/gray.tif").unwrap();

    let output = decode(&data);
    assert_eq!(output.dimensions(), (16, 12));
    assert!(output.to_rgba8().pixels().all(|p| p.0[3] == 0));
}

// =============================================================================
// Formats
// =============================================================================

#[test]
fn test_every_writable_format_decodes() {
    let image = gradient_image(32, 24);

    for format in ["jpg", "png", "gif", "tif", "webp"] {
        let path = format!("/iiif/x/full/full/0/default.{}", format);
        let data = render(&image, &path).unwrap();
        assert_eq!(decode(&data).dimensions(), (32, 24), "format {}", format);
    }
}

#[test]
fn test_transparent_jpeg_is_flattened() {
    let image = transparent_image(16, 16);
    let data = render(&image, "/iiif/x/full/full/0/default.jpg").unwrap();

    assert!(is_valid_jpeg(&data));
    let pixel = rgb_at(&data, 8, 8);
    assert!(pixel.iter().all(|c| *c > 240), "expected white, got {:?}", pixel);
}

#[test]
fn test_unwritable_formats() {
    let image = gradient_image(8, 8);

    for format in [Format::Jp2, Format::Pdf] {
        let path = format!("/iiif/x/full/full/0/default.{}", format);
        let err = render(&image, &path).unwrap_err();
        assert!(matches!(err, ImageError::UnsupportedOutput { .. }));
        assert!(err.is_client_error());
    }
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_region_outside_image() {
    let image = split_image(40, 20);
    let err = render(&image, "/iiif/x/100,100,10,10/full/0/default.png").unwrap_err();

    assert!(matches!(
        err,
        ImageError::RegionOutOfBounds {
            width: 40,
            height: 20,
            ..
        }
    ));
    assert!(err.is_client_error());
}

#[test]
fn test_invalid_request_path() {
    let image = split_image(40, 20);
    let err = render(&image, "/iiif/x/full/full/0/default.bmp").unwrap_err();
    assert!(matches!(err, ImageError::Request(_)));
}

// =============================================================================
// Files
// =============================================================================

#[test]
fn test_open_and_read_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("source.png");

    let data = render(&split_image(40, 20), "/iiif/x/full/full/0/default.png").unwrap();
    std::fs::write(&path, &data).unwrap();

    assert_eq!(RasterImage::read_dimensions(&path).unwrap(), (40, 20));

    let opened = RasterImage::open(&path).unwrap();
    assert_eq!(opened.dimensions(), (40, 20));
    assert_eq!(opened.aspect_ratio(), "2:1");
}

#[test]
fn test_open_missing_and_corrupt_files() {
    let dir = tempfile::tempdir().unwrap();

    let missing = RasterImage::open(dir.path().join("missing.png")).unwrap_err();
    assert!(matches!(missing, ImageError::Io(_)));
    assert!(!missing.is_client_error());

    let corrupt = dir.path().join("corrupt.png");
    std::fs::write(&corrupt, b"not an image").unwrap();
    assert!(matches!(
        RasterImage::open(&corrupt),
        Err(ImageError::Decode { .. })
    ));
}
