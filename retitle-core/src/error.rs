use std::fmt::{self, Display};
use std::path::PathBuf;

use retitle_model::LookupKey;
use thiserror::Error;

/// Failures raised by listing and metadata collaborators.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read manifest {path}")]
    ManifestIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid manifest {path}: {reason}")]
    ManifestFormat { path: PathBuf, reason: String },
    #[error("metadata lookup for '{key}' failed: {reason}")]
    Lookup { key: LookupKey, reason: String },
}

/// Pipeline stage an item failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStage {
    Lookup,
    Normalize,
    Decide,
    Execute,
}

impl Display for ItemStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemStage::Lookup => write!(f, "lookup"),
            ItemStage::Normalize => write!(f, "normalize"),
            ItemStage::Decide => write!(f, "decide"),
            ItemStage::Execute => write!(f, "execute"),
        }
    }
}

/// Per-item failure. Recorded in the batch report; never aborts the batch.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("metadata lookup failed for {path}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: SourceError,
    },
    #[error("no metadata record for {path} (key '{key}')")]
    MissingRecord { path: PathBuf, key: LookupKey },
    #[error("path has no usable file name: {path}")]
    InvalidPath { path: PathBuf },
    #[error("processing {path} panicked during {stage}: {message}")]
    Panicked {
        path: PathBuf,
        stage: ItemStage,
        message: String,
    },
}

impl ItemError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ItemError::Metadata { path, .. }
            | ItemError::MissingRecord { path, .. }
            | ItemError::InvalidPath { path }
            | ItemError::Panicked { path, .. } => path,
        }
    }

    pub fn stage(&self) -> ItemStage {
        match self {
            ItemError::Metadata { .. } | ItemError::MissingRecord { .. } => {
                ItemStage::Lookup
            }
            ItemError::InvalidPath { .. } => ItemStage::Normalize,
            ItemError::Panicked { stage, .. } => *stage,
        }
    }
}
