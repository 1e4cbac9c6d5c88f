//! Derivations over image dimensions used by the tile planner and the image
//! info document. None of these touch pixel data.

use crate::api::Region;

/// Power-of-two scale factors `1, 2, 4, ...` for which `factor * tile_size`
/// is still shorter than the long side of the image.
///
/// Always contains at least `1`, even for images no larger than one tile.
pub fn scale_factors(width: u32, height: u32, tile_size: u32) -> Vec<u32> {
    let long_side = u64::from(width.max(height));
    let tile_size = u64::from(tile_size.max(1));
    let mut factors = Vec::new();
    let mut multiplier: u64 = 1;

    while multiplier * tile_size < long_side && multiplier <= u64::from(u32::MAX / 2) {
        factors.push(multiplier as u32);
        multiplier *= 2;
    }

    if factors.is_empty() {
        factors.push(1);
    }

    factors
}

/// The largest centred square of an image of the given dimensions.
///
/// Returns `None` for an image with no pixels.
pub fn center(width: u32, height: u32) -> Option<Region> {
    if width == 0 || height == 0 {
        return None;
    }

    let side = width.min(height);

    let region = if side == height {
        Region::tile((width - side) / 2, 0, side, side)
    } else {
        Region::tile(0, (height - side) / 2, side, side)
    };

    Some(region)
}

/// Aspect ratio in lowest terms, formatted as `width:height`.
pub fn aspect_ratio(width: u32, height: u32) -> String {
    let divisor = gcd(width, height);

    if divisor == 0 {
        return "0:0".to_string();
    }

    format!("{}:{}", width / divisor, height / divisor)
}

/// Greatest common divisor (Euclid).
pub fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
