//! IIIF Image API request model.
//!
//! Each segment of a request path has its own type with a strict parser and a
//! canonical serialization:
//!
//! ```text
//! /{prefix}/{id}/{region}/{size}/{rotation}/{quality}.{format}
//!                   │        │       │          │         │
//!                   ▼        ▼       ▼          ▼         ▼
//!                Region    Size  Rotation    Quality    Format
//! ```
//!
//! [`Request`] ties the segments together. All types are immutable values;
//! canonical serialization is idempotent, so
//! `Request::parse(&r.to_canonical_string()) == Ok(r)` for any parsed `r`.
//!
//! # Example
//!
//! ```
//! use iiif_tiler::api::{Quality, Request};
//!
//! let request = Request::parse("/iiif/abc/pct:100/400,/0/gray.png");
//! assert!(request.is_err()); // a percentage region needs four values
//!
//! let request = Request::parse("/iiif/abc/full/pct:100/0/gray.png").unwrap();
//! assert_eq!(request.quality(), Quality::Gray);
//! assert_eq!(request.to_canonical_string(), "/iiif/abc/full/full/0/gray.png");
//! ```

pub mod format;
pub mod quality;
pub mod region;
pub mod request;
pub mod rotation;
pub mod size;

pub use format::Format;
pub use quality::Quality;
pub use region::{Coordinate, Region};
pub use request::Request;
pub use rotation::Rotation;
pub use size::Size;
