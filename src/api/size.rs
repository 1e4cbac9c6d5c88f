//! Size: the output dimensions of the extracted region.
//!
//! Accepted forms are `full`, `pct:N`, `W,`, `,H`, `W,H` and `!W,H`. The last
//! form asks for the largest image that fits inside `W x H` while keeping the
//! aspect ratio.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::RequestError;

const FULL: &str = "full";
const PERCENT: &str = "pct:";
const DELIM: char = ',';
const CONFINED: char = '!';

/// An immutable IIIF image size. A `width` or `height` of zero means unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    width: u32,
    height: u32,
    percentage: u32,
    is_percentage: bool,
    is_scalable: bool,
}

impl Size {
    /// The full size of the region.
    pub fn full() -> Self {
        Self {
            width: 0,
            height: 0,
            percentage: 100,
            is_percentage: true,
            is_scalable: false,
        }
    }

    /// A percentage of the region's size, between 1 and 100 inclusive.
    pub fn percent(percentage: u32) -> Result<Self, RequestError> {
        if !(1..=100).contains(&percentage) {
            return Err(RequestError::invalid_size(
                format!("{PERCENT}{percentage}"),
                "percentage must be between 1 and 100",
            ));
        }

        Ok(Self {
            percentage,
            ..Size::full()
        })
    }

    /// Scale to the given width, keeping the aspect ratio.
    pub fn width_only(width: u32) -> Result<Self, RequestError> {
        Size::dimensions(require("width", width)?, 0, false)
    }

    /// Scale to the given height, keeping the aspect ratio.
    pub fn height_only(height: u32) -> Result<Self, RequestError> {
        Size::dimensions(0, require("height", height)?, false)
    }

    /// Scale to exactly the given width and height.
    pub fn exact(width: u32, height: u32) -> Result<Self, RequestError> {
        Size::dimensions(require("width", width)?, require("height", height)?, false)
    }

    /// Best fit inside the given width and height.
    pub fn confined(width: u32, height: u32) -> Result<Self, RequestError> {
        Size::dimensions(require("width", width)?, require("height", height)?, true)
    }

    /// Width-only size of a planned tile.
    pub(crate) fn tile_width(width: u32) -> Self {
        Self {
            width: width.max(1),
            height: 0,
            percentage: 0,
            is_percentage: false,
            is_scalable: false,
        }
    }

    fn dimensions(width: u32, height: u32, is_scalable: bool) -> Result<Self, RequestError> {
        Ok(Self {
            width,
            height,
            percentage: 0,
            is_percentage: false,
            is_scalable,
        })
    }

    /// Parse the size segment of a request path.
    pub fn parse(value: &str) -> Result<Self, RequestError> {
        if value == FULL {
            return Ok(Size::full());
        }

        if let Some(rest) = value.strip_prefix(PERCENT) {
            let percentage = rest.parse::<u32>().map_err(|_| {
                RequestError::invalid_size(value, "percentage is not an integer")
            })?;
            return Size::percent(percentage);
        }

        if value.matches(DELIM).count() > 1 {
            return Err(RequestError::invalid_size(
                value,
                "more than one comma in size",
            ));
        }

        let Some((left, right)) = value.split_once(DELIM) else {
            return Err(RequestError::invalid_size(value, "unrecognized size syntax"));
        };

        if let Some(width) = left.strip_prefix(CONFINED) {
            let width = parse_dimension("width", width)?;
            let height = parse_dimension("height", right)?;
            return Size::confined(width, height);
        }

        match (left.is_empty(), right.is_empty()) {
            (true, true) => Err(RequestError::invalid_size(
                value,
                "neither width nor height given",
            )),
            (true, false) => Size::height_only(parse_dimension("height", right)?),
            (false, true) => Size::width_only(parse_dimension("width", left)?),
            (false, false) => {
                let width = parse_dimension("width", left)?;
                let height = parse_dimension("height", right)?;
                Size::exact(width, height)
            }
        }
    }

    /// Whether this is a percentage size.
    pub fn is_percentage(&self) -> bool {
        self.is_percentage
    }

    /// The requested percentage, or zero when not a percentage size.
    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    /// Whether this size asks for the full size of the region.
    pub fn is_full_size(&self) -> bool {
        self.is_percentage && self.percentage == 100
    }

    /// Whether a best-fit (confined) result is acceptable.
    pub fn is_scalable(&self) -> bool {
        self.is_scalable
    }

    /// Whether a width was requested.
    pub fn has_width(&self) -> bool {
        self.width != 0
    }

    /// Whether a height was requested.
    pub fn has_height(&self) -> bool {
        self.height != 0
    }

    /// The requested width, zero when unset.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The requested height, zero when unset.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Output height for an image of the given actual dimensions.
    ///
    /// With no requested height the actual height is scaled either by the
    /// percentage or by the ratio of requested to actual width (never above
    /// 1). With a requested height the smaller of requested and actual wins.
    /// Must be called with the same dimensions as [`Size::get_width`].
    pub fn get_height(&self, actual_height: u32, actual_width: u32) -> u32 {
        let height = if self.height == 0 {
            if self.is_percentage {
                scale_by_percentage(actual_height, self.percentage)
            } else {
                (scale(self.width, actual_width) * actual_height as f64).round() as u32
            }
        } else {
            actual_height.min(self.height)
        };

        debug!(height, actual_height, "Computed output height");
        height
    }

    /// Output width for an image of the given actual dimensions.
    ///
    /// Mirror image of [`Size::get_height`] over the width axis.
    pub fn get_width(&self, actual_width: u32, actual_height: u32) -> u32 {
        let width = if self.width == 0 {
            if self.is_percentage {
                scale_by_percentage(actual_width, self.percentage)
            } else {
                (scale(self.height, actual_height) * actual_width as f64).round() as u32
            }
        } else {
            actual_width.min(self.width)
        };

        debug!(width, actual_width, "Computed output width");
        width
    }

    /// Output `(width, height)` used when rendering an image of the given
    /// dimensions. Confined sizes fit inside the requested box without
    /// upscaling; every other form uses [`Size::get_width`] and
    /// [`Size::get_height`]. Both results are at least one pixel.
    pub fn resolve(&self, actual_width: u32, actual_height: u32) -> (u32, u32) {
        if self.is_full_size() {
            return (actual_width, actual_height);
        }

        let (width, height) = if self.is_scalable {
            let factor = (self.width as f64 / actual_width.max(1) as f64)
                .min(self.height as f64 / actual_height.max(1) as f64)
                .min(1.0);
            (
                (actual_width as f64 * factor).round() as u32,
                (actual_height as f64 * factor).round() as u32,
            )
        } else {
            (
                self.get_width(actual_width, actual_height),
                self.get_height(actual_height, actual_width),
            )
        };

        (width.max(1), height.max(1))
    }

    /// The canonical path segment for this size.
    pub fn to_canonical_string(&self) -> String {
        self.to_string()
    }
}

impl Default for Size {
    fn default() -> Self {
        Size::full()
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_full_size() {
            f.write_str(FULL)
        } else if self.is_percentage {
            write!(f, "{PERCENT}{}", self.percentage)
        } else if self.is_scalable {
            write!(f, "{CONFINED}{}{DELIM}{}", self.width, self.height)
        } else if self.has_width() && !self.has_height() {
            write!(f, "{}{DELIM}", self.width)
        } else if self.has_height() && !self.has_width() {
            write!(f, "{DELIM}{}", self.height)
        } else {
            write!(f, "{}{DELIM}{}", self.width, self.height)
        }
    }
}

impl FromStr for Size {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Size::parse(s)
    }
}

fn require(axis: &str, value: u32) -> Result<u32, RequestError> {
    if value == 0 {
        return Err(RequestError::invalid_size(
            "0",
            format!("{axis} must be greater than zero"),
        ));
    }
    Ok(value)
}

fn parse_dimension(axis: &str, token: &str) -> Result<u32, RequestError> {
    match token.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(RequestError::invalid_size(
            token,
            format!("{axis} is not a positive integer"),
        )),
    }
}

/// Ratio of requested to actual extent, capped at 1.
fn scale(requested: u32, actual: u32) -> f64 {
    if requested >= actual {
        1.0
    } else {
        requested as f64 / actual as f64
    }
}

fn scale_by_percentage(actual: u32, percentage: u32) -> u32 {
    (actual as f64 * percentage as f64 / 100.0).round() as u32
}
