//! Core data model definitions shared across retitle crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod decision;
pub mod ids;
pub mod outcome;
pub mod record;
pub mod year;

// Intentionally curated re-exports for downstream consumers.
pub use decision::{MatchAction, MatchDecision, ReasonCode};
pub use ids::{ExternalIds, IdentifierTag, ImdbId, TmdbId};
pub use outcome::{RenameOutcome, RenameStatus};
pub use record::{CanonicalRecord, LookupKey, MediaItem};
pub use year::ReleaseYear;
