//! Tile planner integration tests.
//!
//! Tests verify:
//! - Known pyramids produce the expected paths in order
//! - Planned paths are unique, in bounds and canonical (property based)
//! - Each level covers the full image exactly once

use std::collections::HashSet;

use proptest::prelude::*;

use iiif_tiler::tile::{plan_level, scale_factors, tile_paths, tile_requests};
use iiif_tiler::Request;

// =============================================================================
// Known Pyramids
// =============================================================================

#[test]
fn test_single_level_pyramid() {
    let paths = tile_paths("iiif", "page", 256, 300, 200);

    assert_eq!(
        paths,
        vec![
            "/iiif/page/256,0,44,200/44,/0/default.jpg",
            "/iiif/page/0,0,256,200/256,/0/default.jpg",
        ]
    );
}

#[test]
fn test_two_level_pyramid_order() {
    let paths = tile_paths("/iiif", "asdf", 500, 2000, 2000);

    assert_eq!(paths.len(), 20);

    // Coarsest level first: four 1000px regions scaled down to 500px
    for path in &paths[..4] {
        assert!(path.contains(",1000,1000/500,/"), "unexpected {}", path);
    }
    assert_eq!(paths[19], "/iiif/asdf/0,0,500,500/500,/0/default.jpg");
}

#[test]
fn test_image_smaller_than_tile() {
    let paths = tile_paths("iiif", "tiny", 512, 100, 40);
    assert_eq!(paths, vec!["/iiif/tiny/0,0,100,40/100,/0/default.jpg"]);
}

#[test]
fn test_requests_match_paths() {
    let requests = tile_requests("iiif", "img", 256, 1024, 768);
    let paths = tile_paths("iiif", "img", 256, 1024, 768);

    assert_eq!(requests.len(), paths.len());
    for (request, path) in requests.iter().zip(&paths) {
        assert_eq!(&request.to_canonical_string(), path);
    }
}

#[test]
fn test_degenerate_dimensions() {
    assert!(tile_paths("iiif", "x", 256, 0, 100).is_empty());
    assert!(tile_paths("iiif", "x", 256, 100, 0).is_empty());
    assert!(tile_paths("iiif", "x", 0, 100, 100).is_empty());
}

// =============================================================================
// Properties
// =============================================================================

fn dimensions() -> impl Strategy<Value = (u32, u32, u32)> {
    (1u32..2500, 1u32..2500, 64u32..1024)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// No tile path is planned twice.
    #[test]
    fn planned_paths_are_unique((width, height, tile) in dimensions()) {
        let paths = tile_paths("iiif", "img", tile, width, height);
        let unique: HashSet<&String> = paths.iter().collect();
        prop_assert_eq!(unique.len(), paths.len());
    }

    /// Every tile region lies inside the image and scales to at most one tile.
    #[test]
    fn planned_regions_are_in_bounds((width, height, tile) in dimensions()) {
        for path in tile_paths("iiif", "img", tile, width, height) {
            let request = Request::parse(&path).unwrap();
            let (x, y, w, h) = request.region().to_pixels(width, height);

            prop_assert!(w > 0 && h > 0, "empty region in {}", path);
            prop_assert!(x + w <= width, "{} exceeds width {}", path, width);
            prop_assert!(y + h <= height, "{} exceeds height {}", path, height);
            prop_assert!(request.size().width() <= tile, "{} exceeds tile {}", path, tile);
        }
    }

    /// Planned paths are already in canonical form.
    #[test]
    fn planned_paths_are_canonical((width, height, tile) in dimensions()) {
        for path in tile_paths("iiif", "img", tile, width, height) {
            let canonical = Request::parse(&path).unwrap().to_canonical_string();
            prop_assert_eq!(canonical, path);
        }
    }

    /// The last path is the top-left tile at full resolution.
    #[test]
    fn last_path_is_origin_tile((width, height, tile) in dimensions()) {
        let paths = tile_paths("iiif", "img", tile, width, height);
        let w = tile.min(width);
        let h = tile.min(height);
        let expected = format!("/iiif/img/0,0,{},{}/{},/0/default.jpg", w, h, w);
        prop_assert_eq!(paths.last(), Some(&expected));
    }

    /// Each scale factor's tiles cover the image area exactly.
    #[test]
    fn levels_cover_image((width, height, tile) in dimensions()) {
        for factor in scale_factors(width, height, tile) {
            let area: u64 = plan_level("iiif", "img", tile, width, height, factor)
                .iter()
                .map(|request| {
                    let (_, _, w, h) = request.region().to_pixels(width, height);
                    u64::from(w) * u64::from(h)
                })
                .sum();
            prop_assert_eq!(area, u64::from(width) * u64::from(height));
        }
    }
}
