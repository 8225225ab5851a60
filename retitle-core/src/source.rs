//! Collaborator seams: where items and their metadata come from.
//!
//! The engine only needs a listing of `(path, lookup key)` pairs and a way to
//! resolve a key into a [`CanonicalRecord`]. [`ManifestSource`] provides both
//! from a local JSON or TOML file so the pipeline can run without a media
//! server.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use retitle_model::{CanonicalRecord, ExternalIds, LookupKey, MediaItem, ReleaseYear};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::SourceError;

/// Bulk listing of items to process.
pub trait ItemListing {
    fn items(&self) -> Result<Vec<MediaItem>, SourceError>;
}

/// Resolves a lookup key into trusted metadata.
pub trait MetadataSource {
    /// `Ok(None)` when the source has no record for `key`.
    fn lookup(&self, key: &LookupKey) -> Result<Option<CanonicalRecord>, SourceError>;
}

#[derive(Debug, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    items: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    path: PathBuf,
    #[serde(default)]
    key: Option<Scalar>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    year: Option<Scalar>,
    #[serde(default)]
    imdb: Option<String>,
    #[serde(default)]
    tmdb: Option<Scalar>,
}

/// Manifest values that may be written as a number or a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(i64),
    Text(String),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ManifestFormat {
    Toml,
    Json,
}

/// Items and records read from a manifest file.
#[derive(Debug, Clone, Default)]
pub struct ManifestSource {
    items: Vec<MediaItem>,
    records: HashMap<LookupKey, CanonicalRecord>,
}

impl ManifestSource {
    /// Read a manifest, choosing the format by extension (`.toml`/`.json`)
    /// and trying both otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).map_err(|source| SourceError::ManifestIo {
                path: path.to_path_buf(),
                source,
            })?;

        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("toml") => Self::parse(&contents, ManifestFormat::Toml, path),
            Some("json") => Self::parse(&contents, ManifestFormat::Json, path),
            _ => Self::parse(&contents, ManifestFormat::Toml, path)
                .or_else(|_| Self::parse(&contents, ManifestFormat::Json, path)),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, SourceError> {
        Self::parse(contents, ManifestFormat::Toml, Path::new("<inline>"))
    }

    pub fn from_json_str(contents: &str) -> Result<Self, SourceError> {
        Self::parse(contents, ManifestFormat::Json, Path::new("<inline>"))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn parse(
        contents: &str,
        format: ManifestFormat,
        origin: &Path,
    ) -> Result<Self, SourceError> {
        let file: ManifestFile = match format {
            ManifestFormat::Toml => toml::from_str(contents).map_err(|err| {
                SourceError::ManifestFormat {
                    path: origin.to_path_buf(),
                    reason: err.to_string(),
                }
            })?,
            ManifestFormat::Json => serde_json::from_str(contents).map_err(|err| {
                SourceError::ManifestFormat {
                    path: origin.to_path_buf(),
                    reason: err.to_string(),
                }
            })?,
        };

        let mut source = ManifestSource::default();
        for entry in file.items {
            source.push_entry(entry);
        }
        debug!(
            "loaded {} items ({} records) from {:?}",
            source.items.len(),
            source.records.len(),
            origin
        );
        Ok(source)
    }

    fn push_entry(&mut self, entry: ManifestEntry) {
        let key = entry
            .key
            .map(Scalar::into_text)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| entry.path.to_string_lossy().into_owned());
        let key = LookupKey::new(key);

        if let Some(title) = entry.title {
            let year = entry.year.and_then(|raw| parse_year(raw, &entry.path));
            let tmdb = entry.tmdb.map(Scalar::into_text);
            let ids = ExternalIds::from_raw(entry.imdb.as_deref(), tmdb.as_deref());
            let record = CanonicalRecord::new(title, year, ids);
            if self.records.insert(key.clone(), record).is_some() {
                warn!("manifest key '{key}' appears more than once; last entry wins");
            }
        }

        self.items.push(MediaItem::new(entry.path, key));
    }
}

fn parse_year(raw: Scalar, path: &Path) -> Option<ReleaseYear> {
    let parsed = match &raw {
        Scalar::Number(n) => u16::try_from(*n).ok().map(ReleaseYear::new),
        Scalar::Text(s) if s.trim().is_empty() => return None,
        Scalar::Text(s) => s.parse::<ReleaseYear>().ok(),
    };
    if parsed.is_none() {
        warn!("ignoring malformed year {raw:?} for {:?}", path);
    }
    parsed
}

impl ItemListing for ManifestSource {
    fn items(&self) -> Result<Vec<MediaItem>, SourceError> {
        Ok(self.items.clone())
    }
}

impl MetadataSource for ManifestSource {
    fn lookup(&self, key: &LookupKey) -> Result<Option<CanonicalRecord>, SourceError> {
        Ok(self.records.get(key).cloned())
    }
}
