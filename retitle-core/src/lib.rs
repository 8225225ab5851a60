//! # retitle core
//!
//! Filename identity resolution and rename decisions for a personal media
//! library.
//!
//! For each item the caller supplies a file path and a trusted
//! [`CanonicalRecord`](retitle_model::CanonicalRecord). The engine then
//!
//! - cleans the on-disk filename into a comparable title ([`normalize()`]),
//! - extracts a release year from the untouched filename ([`extract_year()`]),
//! - scores the cleaned title against the canonical one ([`similarity()`]),
//! - decides between auto-rename, asking, or skipping ([`decide()`]),
//! - and performs the rename, recording an audit entry ([`RenameExecutor`]).
//!
//! [`Reconciler`] drives that pipeline over a whole listing, one item at a
//! time, isolating per-item failures.
//!
//! ```
//! use retitle_core::{NoiseWords, extract_year, normalize};
//!
//! let noise = NoiseWords::new(["1080p", "bluray", "x264"]);
//! let raw = "Movie.Name.2019.1080p.BluRay.x264-GROUP.mkv";
//! assert_eq!(normalize(raw, &noise).as_str(), "Movie Name");
//! assert_eq!(extract_year(raw).map(|y| y.get()), Some(2019));
//! ```

#![allow(missing_docs)]

pub mod confirm;
pub mod decision;
pub mod error;
pub mod normalize;
pub mod reconcile;
pub mod rename;
pub mod similarity;
pub mod source;
pub mod tags;
pub mod year;

pub use confirm::{
    AlwaysAccept, AlwaysDecline, ConfirmRequest, ConfirmationProvider,
    ScriptedAnswers,
};
pub use decision::{
    MatchInput, Thresholds, decide, evaluate, proposed_name, sanitize_name,
};
pub use error::{ItemError, ItemStage, SourceError};
pub use normalize::{DEFAULT_NOISE_WORDS, NoiseWords, NormalizedTitle, normalize};
pub use reconcile::{
    BatchReport, BatchSummary, EngineSettings, ItemReport, Reconciler,
    RunOptions,
};
pub use rename::{AuditLog, RenameExecutor, RenameFs, StdFs};
pub use similarity::similarity;
pub use source::{ItemListing, ManifestSource, MetadataSource};
pub use tags::{IdentifierOverride, detect_override, has_standard_tag};
pub use year::extract_year;
