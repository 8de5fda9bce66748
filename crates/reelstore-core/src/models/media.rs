//! Asset classes, validated media types and video orientation.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Kind of asset being attached to a video record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Thumbnail,
    Video,
}

impl AssetClass {
    /// Multipart form field carrying the file for this asset class.
    pub fn form_field(&self) -> &'static str {
        match self {
            AssetClass::Thumbnail => "thumbnail",
            AssetClass::Video => "video",
        }
    }
}

impl Display for AssetClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AssetClass::Thumbnail => write!(f, "thumbnail"),
            AssetClass::Video => write!(f, "video"),
        }
    }
}

/// A content type that passed the allow-list for its asset class.
///
/// `essence` is the bare `type/subtype` (parameters stripped, lowercased) and is
/// what gets recorded as the stored object's content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    pub essence: String,
    pub extension: String,
}

impl MediaType {
    pub fn new(essence: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            essence: essence.into(),
            extension: extension.into(),
        }
    }
}

/// Coarse geometry class used as the storage namespace for videos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Other,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Other => "other",
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
