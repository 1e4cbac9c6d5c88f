//! Image info documents (`info.json`).
//!
//! An image info document tells a client what derivatives an image service
//! can produce: the image dimensions, preferred sizes, the tile pyramid, the
//! compliance profile and any auxiliary services.
//!
//! ```text
//!   (width, height, tile size)
//!              │
//!              ▼
//!   ┌─────────────────────┐      ┌───────────┐
//!   │      ImageInfo      │◄─────│  Profile  │  level + formats/qualities
//!   │  sizes  │  tiles    │      └───────────┘
//!   └────┬─────────┬──────┘      ┌───────────┐
//!        │         │        ◄────│  Service  │  e.g. physical dimensions
//!        ▼         ▼             └───────────┘
//!   SizeEntry   TileSet { width, height, scaleFactors }
//! ```
//!
//! Documents are built in memory and serialized with `serde`.

mod image_info;
mod profile;
mod service;

pub use image_info::{
    ImageInfo, SizeEntry, TileSet, CONTEXT_URI, INFO_FILE_NAME, INFO_MIME_TYPE, PROTOCOL_URI,
    TYPE_VALUE,
};
pub use profile::{ComplianceLevel, Feature, Profile};
pub use service::{PhysicalDimService, Service, PHYSICAL_DIM_CONTEXT, PHYSICAL_DIM_PROFILE};
