//! Auxiliary services advertised by an image info document.

use serde::Serialize;

/// JSON-LD context of the physical dimensions service.
pub const PHYSICAL_DIM_CONTEXT: &str = "http://iiif.io/api/annex/services/physdim/1/context.json";

/// Profile URL of the physical dimensions service.
pub const PHYSICAL_DIM_PROFILE: &str = "http://iiif.io/api/annex/services/physdim";

/// A service block attached to an image info document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Service {
    PhysicalDimensions(PhysicalDimService),
}

impl Service {
    /// The JSON-LD context of the service.
    pub fn context(&self) -> &'static str {
        match self {
            Service::PhysicalDimensions(_) => PHYSICAL_DIM_CONTEXT,
        }
    }
}

impl From<PhysicalDimService> for Service {
    fn from(service: PhysicalDimService) -> Self {
        Service::PhysicalDimensions(service)
    }
}

/// Relates pixels to real-world size: one pixel is `physical_scale`
/// `physical_units` (for example `0.0025` `in`).
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalDimService {
    physical_scale: f64,
    physical_units: String,
}

#[derive(Serialize)]
struct PhysicalDimJson<'a> {
    #[serde(rename = "@context")]
    context: &'static str,
    profile: &'static str,
    #[serde(rename = "physicalScale")]
    physical_scale: f64,
    #[serde(rename = "physicalUnits")]
    physical_units: &'a str,
}

impl PhysicalDimService {
    pub fn new(physical_scale: f64, physical_units: impl Into<String>) -> Self {
        Self {
            physical_scale,
            physical_units: physical_units.into(),
        }
    }

    pub fn physical_scale(&self) -> f64 {
        self.physical_scale
    }

    pub fn physical_units(&self) -> &str {
        &self.physical_units
    }
}

impl Serialize for PhysicalDimService {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PhysicalDimJson {
            context: PHYSICAL_DIM_CONTEXT,
            profile: PHYSICAL_DIM_PROFILE,
            physical_scale: self.physical_scale,
            physical_units: &self.physical_units,
        }
        .serialize(serializer)
    }
}
