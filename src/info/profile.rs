//! Compliance profile of an image service.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::api::{Format, Quality};

/// Level of the IIIF Image API an image service complies with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComplianceLevel {
    Zero,
    One,
    #[default]
    Two,
}

impl ComplianceLevel {
    /// Parse a numeric level (`0`, `1` or `2`).
    pub fn from_number(level: u8) -> Option<Self> {
        match level {
            0 => Some(ComplianceLevel::Zero),
            1 => Some(ComplianceLevel::One),
            2 => Some(ComplianceLevel::Two),
            _ => None,
        }
    }

    /// The URL identifying this level.
    pub fn url(&self) -> &'static str {
        match self {
            ComplianceLevel::Zero => "http://iiif.io/api/image/2/level0.json",
            ComplianceLevel::One => "http://iiif.io/api/image/2/level1.json",
            ComplianceLevel::Two => "http://iiif.io/api/image/2/level2.json",
        }
    }
}

impl fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url())
    }
}

/// Optional features a service may declare beyond its compliance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    BaseUriRedirect,
    CanonicalLinkHeader,
    Cors,
    JsonldMediaType,
    Mirroring,
    ProfileLinkHeader,
    RegionByPct,
    RegionByPx,
    RegionSquare,
    RotationArbitrary,
    RotationBy90s,
    SizeAboveFull,
    SizeByConfinedWh,
    SizeByDistortedWh,
    SizeByH,
    SizeByPct,
    SizeByW,
    SizeByWh,
}

/// Compliance level plus the formats, qualities and features supported on top
/// of it. Lists keep insertion order.
///
/// Serializes as the two element array `[levelURL, {formats, qualities, supports}]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Profile {
    level: ComplianceLevel,
    formats: Vec<Format>,
    qualities: Vec<Quality>,
    supports: Vec<Feature>,
}

#[derive(Serialize)]
struct ProfileDetails<'a> {
    #[serde(skip_serializing_if = "is_empty")]
    formats: &'a [Format],
    #[serde(skip_serializing_if = "is_empty")]
    qualities: &'a [Quality],
    #[serde(skip_serializing_if = "is_empty")]
    supports: &'a [Feature],
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

impl Profile {
    pub fn new(level: ComplianceLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Add supported formats.
    pub fn with_formats(mut self, formats: impl IntoIterator<Item = Format>) -> Self {
        self.formats.extend(formats);
        self
    }

    /// Add supported qualities.
    pub fn with_qualities(mut self, qualities: impl IntoIterator<Item = Quality>) -> Self {
        self.qualities.extend(qualities);
        self
    }

    /// Add supported features.
    pub fn with_features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.supports.extend(features);
        self
    }

    pub fn level(&self) -> ComplianceLevel {
        self.level
    }

    pub fn formats(&self) -> &[Format] {
        &self.formats
    }

    pub fn qualities(&self) -> &[Quality] {
        &self.qualities
    }

    pub fn supports(&self) -> &[Feature] {
        &self.supports
    }
}

impl Serialize for Profile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let details = ProfileDetails {
            formats: &self.formats,
            qualities: &self.qualities,
            supports: &self.supports,
        };

        (self.level.url(), details).serialize(serializer)
    }
}
