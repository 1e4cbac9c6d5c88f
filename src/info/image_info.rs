//! The `info.json` document describing one image.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::debug;

use super::profile::Profile;
use super::service::Service;
use crate::error::InfoError;
use crate::tile::scale_factors;

/// File name of the image info document.
pub const INFO_FILE_NAME: &str = "info.json";

/// MIME type of the image info document.
pub const INFO_MIME_TYPE: &str = "application/json";

/// JSON-LD context of IIIF Image API 2 documents.
pub const CONTEXT_URI: &str = "http://iiif.io/api/image/2/context.json";

/// Protocol URI of the IIIF Image API.
pub const PROTOCOL_URI: &str = "http://iiif.io/api/image";

/// Value of the `@type` property.
pub const TYPE_VALUE: &str = "iiif:Image";

// =============================================================================
// Sizes and Tile Sets
// =============================================================================

/// A preferred output size, as listed under `sizes`. The height may be left
/// for the client to derive from the aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeEntry {
    pub width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl SizeEntry {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height: Some(height),
        }
    }

    pub fn width_only(width: u32) -> Self {
        Self {
            width,
            height: None,
        }
    }
}

/// A set of tiles sharing one tile size and a list of scale factors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSet {
    width: u32,
    height: u32,
    scale_factors: Vec<u32>,
}

impl TileSet {
    /// Square tiles.
    pub fn square(width: u32, scale_factors: Vec<u32>) -> Self {
        Self::new(width, width, scale_factors)
    }

    /// Rectangular tiles.
    pub fn new(width: u32, height: u32, scale_factors: Vec<u32>) -> Self {
        Self {
            width,
            height,
            scale_factors,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale_factors(&self) -> &[u32] {
        &self.scale_factors
    }
}

impl Serialize for TileSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let square = self.height == self.width;
        let mut state = serializer.serialize_struct("TileSet", if square { 2 } else { 3 })?;

        state.serialize_field("width", &self.width)?;
        if square {
            state.skip_field("height")?;
        } else {
            state.serialize_field("height", &self.height)?;
        }
        state.serialize_field("scaleFactors", &self.scale_factors)?;

        state.end()
    }
}

// =============================================================================
// Image Info
// =============================================================================

/// An image info document.
///
/// Built with the `with_*`/`add_*` methods; sizes, tile sets and services
/// keep insertion order. Serializes to the IIIF `info.json` shape:
///
/// ```
/// use iiif_tiler::info::{ComplianceLevel, ImageInfo, Profile};
///
/// let info = ImageInfo::for_image(
///     "http://example.org/iiif/abc",
///     2000,
///     1000,
///     512,
///     Profile::new(ComplianceLevel::Zero),
/// )
/// .unwrap();
///
/// let json = serde_json::to_value(&info).unwrap();
/// assert_eq!(json["tiles"][0]["scaleFactors"], serde_json::json!([1, 2]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    id: String,
    width: u32,
    height: u32,
    tile_size: u32,
    sizes: Vec<SizeEntry>,
    tiles: Vec<TileSet>,
    profile: Option<Profile>,
    services: Vec<Service>,
}

impl ImageInfo {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        debug!(id = %id, "Creating image info");

        Self {
            id,
            width: 0,
            height: 0,
            tile_size: 0,
            sizes: Vec::new(),
            tiles: Vec::new(),
            profile: None,
            services: Vec::new(),
        }
    }

    /// Derive a complete document from image dimensions.
    ///
    /// Adds one square tile set using [`scale_factors`] and one preferred size
    /// per scale factor, smallest first.
    pub fn for_image(
        id: impl Into<String>,
        width: u32,
        height: u32,
        tile_size: u32,
        profile: Profile,
    ) -> Result<Self, InfoError> {
        if width == 0 || height == 0 {
            return Err(InfoError::InvalidInfo {
                reason: format!("image dimensions must be positive, got {}x{}", width, height),
            });
        }

        if tile_size == 0 {
            return Err(InfoError::InvalidInfo {
                reason: "tile size must be positive".to_string(),
            });
        }

        let factors = scale_factors(width, height, tile_size);

        let mut info = ImageInfo::new(id)
            .with_dimensions(width, height)
            .with_tile_size(tile_size)
            .with_profile(profile);

        for factor in factors.iter().rev() {
            info = info.add_size(width.div_ceil(*factor), height.div_ceil(*factor));
        }

        Ok(info.add_tiles(TileSet::square(tile_size, factors)))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Tile size used when generating tiles; not serialized.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn add_size(mut self, width: u32, height: u32) -> Self {
        self.sizes.push(SizeEntry::new(width, height));
        self
    }

    /// Add a size given by width alone.
    pub fn add_width_size(mut self, width: u32) -> Self {
        self.sizes.push(SizeEntry::width_only(width));
        self
    }

    pub fn add_tiles(mut self, tiles: TileSet) -> Self {
        self.tiles.push(tiles);
        self
    }

    pub fn add_service(mut self, service: impl Into<Service>) -> Self {
        self.services.push(service.into());
        self
    }

    /// Replace all services.
    pub fn with_services(mut self, services: Vec<Service>) -> Self {
        self.services = services;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn sizes(&self) -> &[SizeEntry] {
        &self.sizes
    }

    pub fn tiles(&self) -> &[TileSet] {
        &self.tiles
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Render the document as pretty-printed JSON.
    ///
    /// A document needs a profile before it can be rendered.
    pub fn to_json(&self) -> Result<String, InfoError> {
        if self.profile.is_none() {
            return Err(InfoError::InvalidInfo {
                reason: format!("image info for '{}' has no profile", self.id),
            });
        }

        serde_json::to_string_pretty(self).map_err(|e| InfoError::InvalidInfo {
            reason: e.to_string(),
        })
    }
}

impl Serialize for ImageInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ImageInfo", 10)?;

        state.serialize_field("@context", CONTEXT_URI)?;
        state.serialize_field("@id", &self.id)?;
        state.serialize_field("@type", TYPE_VALUE)?;
        state.serialize_field("protocol", PROTOCOL_URI)?;
        state.serialize_field("width", &self.width)?;
        state.serialize_field("height", &self.height)?;

        if self.sizes.is_empty() {
            state.skip_field("sizes")?;
        } else {
            state.serialize_field("sizes", &self.sizes)?;
        }

        if self.tiles.is_empty() {
            state.skip_field("tiles")?;
        } else {
            state.serialize_field("tiles", &self.tiles)?;
        }

        match &self.profile {
            Some(profile) => state.serialize_field("profile", profile)?,
            None => state.skip_field("profile")?,
        }

        // A lone service is written as an object
        match self.services.as_slice() {
            [] => state.skip_field("service")?,
            [service] => state.serialize_field("service", service)?,
            services => state.serialize_field("service", services)?,
        }

        state.end()
    }
}
