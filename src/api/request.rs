//! A complete IIIF image request.
//!
//! Requests address a derivative through the path
//! `/{prefix}/{id}/{region}/{size}/{rotation}/{quality}.{format}`, where the
//! identifier is percent-encoded.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::format::{self, Format};
use super::quality::Quality;
use super::region::Region;
use super::rotation::Rotation;
use super::size::Size;
use crate::error::RequestError;

const DELIM: char = '/';

/// Number of path segments in a request, counting the service prefix.
const SEGMENTS: usize = 6;

/// An immutable IIIF image request.
///
/// Equality and hashing cover all seven fields. The `with_*` methods return a
/// new request rather than changing this one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Request {
    id: String,
    service_prefix: String,
    region: Region,
    size: Size,
    rotation: Rotation,
    quality: Quality,
    format: Format,
}

impl Request {
    /// A request for the full image at full size, unrotated, default quality, as JPEG.
    ///
    /// Slashes are removed from the service prefix.
    pub fn new(id: impl Into<String>, service_prefix: &str) -> Self {
        Self {
            id: id.into(),
            service_prefix: service_prefix.replace(DELIM, ""),
            region: Region::full(),
            size: Size::full(),
            rotation: Rotation::none(),
            quality: Quality::Default,
            format: Format::Jpg,
        }
    }

    /// Parse a request path such as `/iiif/abc/full/full/0/default.jpg`.
    ///
    /// Segments are parsed in the order region, size, rotation, quality,
    /// format and the first failure is returned.
    pub fn parse(path: &str) -> Result<Self, RequestError> {
        debug!(path, "Parsing IIIF request");

        let trimmed = path.strip_prefix(DELIM).unwrap_or(path);
        let components: Vec<&str> = trimmed.split(DELIM).collect();

        if components.len() != SEGMENTS {
            return Err(RequestError::MalformedPath {
                path: path.to_string(),
                reason: format!(
                    "expected {} segments, found {}",
                    SEGMENTS,
                    components.len()
                ),
            });
        }

        let file_name = components[5];
        let Some((quality, extension)) = file_name.rsplit_once('.') else {
            return Err(format::unsupported(file_name));
        };

        let id = urlencoding::decode(components[1]).map_err(|e| RequestError::MalformedPath {
            path: path.to_string(),
            reason: format!("identifier is not valid UTF-8: {}", e),
        })?;

        let region = Region::parse(components[2])?;
        let size = Size::parse(components[3])?;
        let rotation = Rotation::parse(components[4])?;
        let quality = Quality::parse(quality)?;
        let format = Format::parse_extension(extension)?;

        Ok(Self {
            id: id.into_owned(),
            service_prefix: components[0].to_string(),
            region,
            size,
            rotation,
            quality,
            format,
        })
    }

    /// The image identifier (decoded).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The service prefix, without slashes.
    pub fn prefix(&self) -> &str {
        &self.service_prefix
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn size(&self) -> &Size {
        &self.size
    }

    pub fn rotation(&self) -> &Rotation {
        &self.rotation
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn with_id(self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..self
        }
    }

    pub fn with_prefix(self, service_prefix: &str) -> Self {
        Self {
            service_prefix: service_prefix.replace(DELIM, ""),
            ..self
        }
    }

    pub fn with_region(self, region: Region) -> Self {
        Self { region, ..self }
    }

    pub fn with_size(self, size: Size) -> Self {
        Self { size, ..self }
    }

    pub fn with_rotation(self, rotation: Rotation) -> Self {
        Self { rotation, ..self }
    }

    pub fn with_quality(self, quality: Quality) -> Self {
        Self { quality, ..self }
    }

    pub fn with_format(self, format: Format) -> Self {
        Self { format, ..self }
    }

    /// The `{quality}.{format}` file name of the request.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.quality, self.format)
    }

    /// The derivative path relative to the image identifier:
    /// `{region}/{size}/{rotation}/{quality}.{format}`.
    pub fn path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.region,
            self.size,
            self.rotation,
            self.file_name()
        )
    }

    /// The full canonical request path, starting with a slash.
    ///
    /// Equivalent spellings of the same request (for example `pct:100` and
    /// `full`) produce the same canonical path.
    pub fn to_canonical_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/{}/{}/{}",
            self.service_prefix,
            urlencoding::encode(&self.id),
            self.path()
        )
    }
}

impl FromStr for Request {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Request::parse(s)
    }
}
