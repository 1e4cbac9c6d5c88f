//! Region: the rectangular crop of the source image.
//!
//! A region is written in the request path as one of:
//!
//! - `full` - the whole image
//! - `pct:x,y,w,h` - a rectangle expressed as percentages of the image
//! - `x,y,w,h` - a rectangle in pixels (fractional values are truncated)

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::RequestError;

const FULL: &str = "full";
const PERCENT: &str = "pct:";

/// One of the four values that make up a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coordinate {
    X,
    Y,
    Width,
    Height,
}

/// An immutable IIIF image region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    is_percentage: bool,
    is_full_image: bool,
}

impl Region {
    /// The region covering the whole image.
    pub fn full() -> Self {
        Self {
            x: 100.0,
            y: 100.0,
            width: 100.0,
            height: 100.0,
            is_percentage: true,
            is_full_image: true,
        }
    }

    /// A region expressed as percentages of the image.
    ///
    /// The region is the full image when all four values are exactly 100.
    pub fn percent(x: f64, y: f64, width: f64, height: f64) -> Result<Self, RequestError> {
        let values = [x, y, width, height];
        validate(&values, true, &format_values(PERCENT, &values))?;

        Ok(Self {
            x: normalize(x),
            y: normalize(y),
            width: normalize(width),
            height: normalize(height),
            is_percentage: true,
            is_full_image: values.iter().all(|v| *v == 100.0),
        })
    }

    /// A region in pixels.
    pub fn pixels(x: u32, y: u32, width: u32, height: u32) -> Result<Self, RequestError> {
        let values = [x, y, width, height].map(f64::from);
        validate(&values, false, &format_values("", &values))?;

        Ok(Self {
            x: values[0],
            y: values[1],
            width: values[2],
            height: values[3],
            is_percentage: false,
            is_full_image: false,
        })
    }

    /// Pixel region of a planned tile. Extents are positive by construction.
    pub(crate) fn tile(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x: f64::from(x),
            y: f64::from(y),
            width: f64::from(width.max(1)),
            height: f64::from(height.max(1)),
            is_percentage: false,
            is_full_image: false,
        }
    }

    /// Parse the region segment of a request path.
    pub fn parse(value: &str) -> Result<Self, RequestError> {
        if value.is_empty() {
            return Err(invalid(value));
        }

        if value == FULL {
            return Ok(Region::full());
        }

        if let Some(rest) = value.strip_prefix(PERCENT) {
            let [x, y, w, h] = parse_dimensions(rest, value)?;
            return Region::percent(x, y, w, h);
        }

        let [x, y, w, h] = parse_dimensions(value, value)?;
        validate(&[x, y, w, h], false, value)?;

        // Pixel regions are whole pixels; fractional input is truncated
        Region::pixels(x as u32, y as u32, w as u32, h as u32)
    }

    /// The value of a coordinate as a float.
    pub fn get_float(&self, coordinate: Coordinate) -> f64 {
        match coordinate {
            Coordinate::X => self.x,
            Coordinate::Y => self.y,
            Coordinate::Width => self.width,
            Coordinate::Height => self.height,
        }
    }

    /// The value of a coordinate truncated to an integer.
    pub fn get_int(&self, coordinate: Coordinate) -> u32 {
        self.get_float(coordinate) as u32
    }

    /// Whether the values are percentages of the image.
    pub fn is_percentage(&self) -> bool {
        self.is_percentage
    }

    /// Whether the region covers the whole image.
    pub fn is_full_image(&self) -> bool {
        self.is_full_image
    }

    /// Resolve the region to a pixel rectangle `(x, y, width, height)` for an
    /// image of the given dimensions. No clipping is applied.
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> (u32, u32, u32, u32) {
        if self.is_full_image {
            return (0, 0, image_width, image_height);
        }

        if self.is_percentage {
            let scale = |pct: f64, dim: u32| ((pct / 100.0) * f64::from(dim)).round() as u32;
            (
                scale(self.x, image_width),
                scale(self.y, image_height),
                scale(self.width, image_width),
                scale(self.height, image_height),
            )
        } else {
            (
                self.x as u32,
                self.y as u32,
                self.width as u32,
                self.height as u32,
            )
        }
    }

    /// The canonical path segment for this region.
    pub fn to_canonical_string(&self) -> String {
        self.to_string()
    }
}

impl Default for Region {
    fn default() -> Self {
        Region::full()
    }
}

impl Eq for Region {}

impl Hash for Region {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for value in [self.x, self.y, self.width, self.height] {
            value.to_bits().hash(state);
        }
        self.is_percentage.hash(state);
        self.is_full_image.hash(state);
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_full_image {
            return f.write_str(FULL);
        }

        let prefix = if self.is_percentage { PERCENT } else { "" };
        f.write_str(&format_values(
            prefix,
            &[self.x, self.y, self.width, self.height],
        ))
    }
}

impl FromStr for Region {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::parse(s)
    }
}

fn invalid(token: &str) -> RequestError {
    RequestError::InvalidRegion {
        token: token.to_string(),
    }
}

fn parse_dimensions(value: &str, segment: &str) -> Result<[f64; 4], RequestError> {
    let parts: Vec<&str> = value.split(',').collect();

    if parts.len() != 4 {
        return Err(invalid(segment));
    }

    let mut dimensions = [0f64; 4];

    for (slot, part) in dimensions.iter_mut().zip(parts) {
        *slot = part
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid(part))?;
    }

    Ok(dimensions)
}

fn validate(values: &[f64; 4], percentage: bool, segment: &str) -> Result<(), RequestError> {
    if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(invalid(segment));
    }

    if percentage && values.iter().any(|v| *v > 100.0) {
        return Err(invalid(segment));
    }

    // Pixel values must stay exact once truncated to u32
    if !percentage && values.iter().any(|v| *v >= 4_294_967_296.0) {
        return Err(invalid(segment));
    }

    // Truncated pixel extents must still cover at least one pixel
    let empty = if percentage {
        values[2] <= 0.0 || values[3] <= 0.0
    } else {
        values[2] < 1.0 || values[3] < 1.0
    };

    if empty {
        return Err(invalid(segment));
    }

    Ok(())
}

/// Collapse `-0.0` to `0.0` so equal regions hash equally.
fn normalize(value: f64) -> f64 {
    value + 0.0
}

fn format_values(prefix: &str, values: &[f64; 4]) -> String {
    format!(
        "{}{},{},{},{}",
        prefix, values[0], values[1], values[2], values[3]
    )
}
