//! Output formats and their MIME types.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::RequestError;

/// An output image format, identified by its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    #[default]
    Jpg,
    Tif,
    Png,
    Gif,
    Jp2,
    Pdf,
    Webp,
}

/// Extension and MIME type of every format. The mapping is one-to-one.
const FORMATS: [(Format, &str, &str); 7] = [
    (Format::Jpg, "jpg", "image/jpeg"),
    (Format::Tif, "tif", "image/tiff"),
    (Format::Png, "png", "image/png"),
    (Format::Gif, "gif", "image/gif"),
    (Format::Jp2, "jp2", "image/jp2"),
    (Format::Pdf, "pdf", "application/pdf"),
    (Format::Webp, "webp", "image/webp"),
];

impl Format {
    /// All supported formats, in vocabulary order.
    pub const ALL: [Format; 7] = [
        Format::Jpg,
        Format::Tif,
        Format::Png,
        Format::Gif,
        Format::Jp2,
        Format::Pdf,
        Format::Webp,
    ];

    /// Parse a file extension, ignoring case and an optional leading dot.
    pub fn parse_extension(value: &str) -> Result<Self, RequestError> {
        let ext = value.strip_prefix('.').unwrap_or(value);

        FORMATS
            .iter()
            .find(|(_, candidate, _)| candidate.eq_ignore_ascii_case(ext))
            .map(|(format, _, _)| *format)
            .ok_or_else(|| unsupported(ext))
    }

    /// Parse an exact MIME type such as `image/jpeg`.
    pub fn parse_mime_type(value: &str) -> Result<Self, RequestError> {
        FORMATS
            .iter()
            .find(|(_, _, mime)| *mime == value)
            .map(|(format, _, _)| *format)
            .ok_or_else(|| unsupported(value))
    }

    /// Look up the MIME type registered for a file extension.
    pub fn mime_type_for_extension(ext: &str) -> Result<&'static str, RequestError> {
        Ok(Format::parse_extension(ext)?.mime_type())
    }

    /// Look up the file extension registered for a MIME type.
    pub fn extension_for_mime_type(mime: &str) -> Result<&'static str, RequestError> {
        Ok(Format::parse_mime_type(mime)?.extension())
    }

    /// The lowercase file extension of this format.
    pub fn extension(&self) -> &'static str {
        self.entry().1
    }

    /// The MIME type of this format.
    pub fn mime_type(&self) -> &'static str {
        self.entry().2
    }

    fn entry(&self) -> &'static (Format, &'static str, &'static str) {
        // FORMATS lists the variants in declaration order
        &FORMATS[*self as usize]
    }
}

pub(crate) fn unsupported(token: &str) -> RequestError {
    RequestError::UnsupportedFormat {
        token: token.to_string(),
        valid: FORMATS
            .iter()
            .map(|(_, ext, _)| *ext)
            .collect::<Vec<_>>()
            .join(" "),
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::parse_extension(s)
    }
}

impl Serialize for Format {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.extension())
    }
}
