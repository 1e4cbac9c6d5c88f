//! Output quality (color rendering mode).

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::RequestError;

/// Color rendering mode of a derivative image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quality {
    #[default]
    Default,
    Color,
    Gray,
    Bitonal,
}

/// Lookup table of every quality and its URI token.
const QUALITIES: [(Quality, &str); 4] = [
    (Quality::Default, "default"),
    (Quality::Color, "color"),
    (Quality::Gray, "gray"),
    (Quality::Bitonal, "bitonal"),
];

impl Quality {
    /// All supported qualities, in vocabulary order.
    pub const ALL: [Quality; 4] = [
        Quality::Default,
        Quality::Color,
        Quality::Gray,
        Quality::Bitonal,
    ];

    /// Parse a quality token. Matching is case-sensitive.
    pub fn parse(value: &str) -> Result<Self, RequestError> {
        QUALITIES
            .iter()
            .find(|(_, token)| *token == value)
            .map(|(quality, _)| *quality)
            .ok_or_else(|| RequestError::UnsupportedQuality {
                token: value.to_string(),
                valid: valid_values(),
            })
    }

    /// The URI token for this quality.
    pub fn as_str(&self) -> &'static str {
        QUALITIES[*self as usize].1
    }
}

fn valid_values() -> String {
    QUALITIES
        .iter()
        .map(|(_, token)| *token)
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quality::parse(s)
    }
}

impl Serialize for Quality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
