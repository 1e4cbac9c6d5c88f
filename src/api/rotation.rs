//! Rotation: clockwise degrees with optional mirroring (`!` prefix).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::RequestError;

const MIRRORED: &str = "!";

/// An immutable IIIF rotation between 0 and 360 degrees inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    degrees: f32,
    mirrored: bool,
    multiple_of_90: bool,
}

impl Rotation {
    /// No rotation and no mirroring.
    pub fn none() -> Self {
        Self {
            degrees: 0.0,
            mirrored: false,
            multiple_of_90: true,
        }
    }

    /// Create a rotation, validating that the degrees lie in `[0, 360]`.
    pub fn new(degrees: f32, mirrored: bool) -> Result<Self, RequestError> {
        if !degrees.is_finite() || !(0.0..=360.0).contains(&degrees) {
            return Err(RequestError::InvalidRotation {
                token: degrees.to_string(),
            });
        }

        // -0.0 and 0.0 must compare and hash the same
        let degrees = degrees + 0.0;

        Ok(Self {
            degrees,
            mirrored,
            multiple_of_90: degrees % 90.0 == 0.0,
        })
    }

    /// Parse the rotation segment of a request path.
    pub fn parse(value: &str) -> Result<Self, RequestError> {
        let (mirrored, number) = match value.strip_prefix(MIRRORED) {
            Some(rest) => (true, rest),
            None => (false, value),
        };

        let degrees = number
            .parse::<f32>()
            .map_err(|_| RequestError::InvalidRotation {
                token: value.to_string(),
            })?;

        Rotation::new(degrees, mirrored).map_err(|_| RequestError::InvalidRotation {
            token: value.to_string(),
        })
    }

    /// Rotation in degrees.
    pub fn degrees(&self) -> f32 {
        self.degrees
    }

    /// Rotation in degrees, truncated to an integer.
    pub fn degrees_as_int(&self) -> u32 {
        self.degrees as u32
    }

    /// Whether the image is mirrored before rotation.
    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Whether any rotation is applied.
    pub fn is_rotated(&self) -> bool {
        self.degrees != 0.0
    }

    /// Whether the rotation is a whole number of quarter turns.
    pub fn is_multiple_of_90(&self) -> bool {
        self.multiple_of_90
    }

    /// The canonical path segment for this rotation.
    pub fn to_canonical_string(&self) -> String {
        self.to_string()
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::none()
    }
}

impl Eq for Rotation {}

impl Hash for Rotation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.degrees.to_bits().hash(state);
        self.mirrored.hash(state);
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Whole degrees print without a decimal point
        if self.mirrored {
            write!(f, "{MIRRORED}{}", self.degrees)
        } else {
            write!(f, "{}", self.degrees)
        }
    }
}

impl FromStr for Rotation {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rotation::parse(s)
    }
}
