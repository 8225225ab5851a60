use std::fmt::{self, Display};
use std::path::PathBuf;

use crate::{ExternalIds, ReleaseYear};

/// Stable per-item key used to fetch metadata (e.g. a media-server rating key).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LookupKey(pub String);

impl LookupKey {
    pub fn new(key: impl Into<String>) -> Self {
        LookupKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trusted metadata for one item, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CanonicalRecord {
    pub title: String,
    pub year: Option<ReleaseYear>,
    pub ids: ExternalIds,
}

impl CanonicalRecord {
    pub fn new(
        title: impl Into<String>,
        year: Option<ReleaseYear>,
        ids: ExternalIds,
    ) -> Self {
        Self {
            title: title.into(),
            year,
            ids,
        }
    }
}

/// One entry of a library listing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaItem {
    pub path: PathBuf,
    pub key: LookupKey,
}

impl MediaItem {
    pub fn new(path: impl Into<PathBuf>, key: LookupKey) -> Self {
        Self {
            path: path.into(),
            key,
        }
    }

    /// On-disk basename as observed, if the path has one.
    pub fn raw_filename(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}
