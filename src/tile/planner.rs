//! Tile pyramid planning.
//!
//! Given only the pixel dimensions of an image, the planner enumerates the
//! canonical IIIF requests a deep-zoom viewer (such as OpenSeadragon) issues
//! for a tiled image, so the tiles can be pre-generated.
//!
//! # Algorithm
//!
//! For every scale factor `m` from [`scale_factors`], the image is cut into
//! squares of `m * tile_size` source pixels, walking columns left to right
//! and each column top to bottom. Tiles on the right and bottom edges are
//! clipped to the image. Each tile is requested at `ceil(extent / m)` pixels
//! wide, written in the width-only canonical form (`W,`) since tiles keep
//! their aspect ratio.
//!
//! The finished list is reversed so the most reduced tiles come first.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::geometry::scale_factors;
use crate::api::{Format, Quality, Region, Request, Rotation, Size};

/// Plan the tile requests for one scale factor, in emission order.
///
/// Levels are independent of each other, so they may be planned in parallel
/// and concatenated in ascending scale factor order.
pub fn plan_level(
    service: &str,
    id: &str,
    tile_size: u32,
    width: u32,
    height: u32,
    multiplier: u32,
) -> Vec<Request> {
    let template = Request::new(id, service)
        .with_rotation(Rotation::none())
        .with_quality(Quality::Default)
        .with_format(Format::Jpg);

    let step = u64::from(tile_size) * u64::from(multiplier);
    let (image_width, image_height) = (u64::from(width), u64::from(height));
    let mut tiles = Vec::new();

    if step == 0 {
        return tiles;
    }

    let mut emit = |x: u64, y: u64, tile_width: u64, tile_height: u64| {
        if tile_width == 0 || tile_height == 0 {
            return;
        }

        let scaled_width = tile_width.div_ceil(u64::from(multiplier));

        // Every value is bounded by the u32 image dimensions
        let region = Region::tile(x as u32, y as u32, tile_width as u32, tile_height as u32);
        let size = Size::tile_width(scaled_width as u32);

        tiles.push(template.clone().with_region(region).with_size(size));
    };

    let mut x = 0;
    while x < image_width {
        let tile_width = step.min(image_width - x);

        emit(x, 0, tile_width, step.min(image_height));

        let mut y = step;
        while y < image_height {
            emit(x, y, tile_width, step.min(image_height - y));
            y += step;
        }

        x += step;
    }

    tiles
}

/// Plan every tile request for an image, most reduced tiles first.
///
/// Duplicate requests are dropped with a warning.
pub fn tile_requests(
    service: &str,
    id: &str,
    tile_size: u32,
    width: u32,
    height: u32,
) -> Vec<Request> {
    debug!(id, tile_size, width, height, "Planning tile pyramid");

    if tile_size == 0 || width == 0 || height == 0 {
        warn!(id, tile_size, width, height, "Nothing to tile");
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut requests = Vec::new();

    for multiplier in scale_factors(width, height, tile_size) {
        debug!(multiplier, "Planning tiles for scale factor");

        for request in plan_level(service, id, tile_size, width, height, multiplier) {
            if seen.insert(request.clone()) {
                requests.push(request);
            } else {
                warn!(path = %request, "Duplicate tile request skipped");
            }
        }
    }

    debug!(count = requests.len(), id, "Planned tile requests");

    requests.reverse();
    requests
}

/// Plan every tile path for an image, most reduced tiles first.
///
/// The paths are canonical request paths (`/{service}/{id}/x,y,w,h/W,/0/default.jpg`)
/// with the identifier percent-encoded, usable directly as relative URIs.
pub fn tile_paths(service: &str, id: &str, tile_size: u32, width: u32, height: u32) -> Vec<String> {
    tile_requests(service, id, tile_size, width, height)
        .iter()
        .map(Request::to_canonical_string)
        .collect()
}
