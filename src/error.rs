use thiserror::Error;

/// Errors raised while parsing a IIIF request path or one of its segments.
///
/// Every variant is caused by client input and maps to a 4xx response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Region segment is not `full`, `pct:x,y,w,h` or `x,y,w,h`
    #[error("Invalid region: {token}")]
    InvalidRegion { token: String },

    /// Size segment is malformed or out of range
    #[error("Invalid size '{token}': {reason}")]
    InvalidSize { token: String, reason: String },

    /// Rotation is not a number between 0 and 360
    #[error("Invalid rotation: {token}")]
    InvalidRotation { token: String },

    /// Quality is not one of the supported vocabulary
    #[error("Unsupported quality '{token}' (expected one of: {valid})")]
    UnsupportedQuality { token: String, valid: String },

    /// Format extension or MIME type is not supported
    #[error("Unsupported format '{token}' (expected one of: {valid})")]
    UnsupportedFormat { token: String, valid: String },

    /// Path does not have the `{prefix}/{id}/{region}/{size}/{rotation}/{quality}.{format}` shape
    #[error("Malformed request path '{path}': {reason}")]
    MalformedPath { path: String, reason: String },
}

impl RequestError {
    pub(crate) fn invalid_size(token: impl Into<String>, reason: impl Into<String>) -> Self {
        RequestError::InvalidSize {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the client (always true for request errors).
    pub fn is_client_error(&self) -> bool {
        true
    }
}

/// Errors raised while building an image info document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InfoError {
    /// Dimensions or tile settings are inconsistent
    #[error("Invalid image info: {reason}")]
    InvalidInfo { reason: String },
}

/// Errors raised by a raster backend while rendering a derivative.
#[derive(Debug, Clone, Error)]
pub enum ImageError {
    /// The request itself was invalid
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Source image could not be decoded
    #[error("Failed to decode image: {message}")]
    Decode { message: String },

    /// Derivative could not be encoded
    #[error("Failed to encode image: {message}")]
    Encode { message: String },

    /// No encoder is available for the requested output format
    #[error("No encoder available for format: {format}")]
    UnsupportedOutput { format: String },

    /// Requested region starts outside the image
    #[error("Region {region} lies outside the {width}x{height} image")]
    RegionOutOfBounds {
        region: String,
        width: u32,
        height: u32,
    },

    /// A transform step would produce an image with no pixels
    #[error("Transform produced an empty image: {reason}")]
    EmptyResult { reason: String },

    /// File system error while reading or writing images
    #[error("I/O error: {0}")]
    Io(String),
}

impl ImageError {
    /// Whether the error should be reported as a client error (4xx) rather than
    /// a server error (5xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ImageError::Request(_)
                | ImageError::RegionOutOfBounds { .. }
                | ImageError::EmptyResult { .. }
                | ImageError::UnsupportedOutput { .. }
        )
    }
}

impl From<std::io::Error> for ImageError {
    fn from(err: std::io::Error) -> Self {
        ImageError::Io(err.to_string())
    }
}

/// Errors raised while pre-generating a tile set.
///
/// Failures of individual tiles are counted, not returned; these errors abort
/// the whole run.
#[derive(Debug, Clone, Error)]
pub enum TileError {
    /// Source image could not be read or decoded
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// Image info document could not be built
    #[error("Info error: {0}")]
    Info(#[from] InfoError),

    /// A planned tile does not map to a file below the output directory
    #[error("Refusing to write tile outside output directory: {path}")]
    UnsafePath { path: String },

    /// Output directory or file could not be written
    #[error("I/O error: {0}")]
    Io(String),

    /// A rendering task panicked or was cancelled
    #[error("Tile task failed: {0}")]
    Task(String),
}

impl From<std::io::Error> for TileError {
    fn from(err: std::io::Error) -> Self {
        TileError::Io(err.to_string())
    }
}
