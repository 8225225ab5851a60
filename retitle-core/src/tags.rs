//! Identifier markers embedded in filenames.
//!
//! Two kinds are recognized. A *standard tag* (`{imdb-tt0133093}`,
//! `{tmdb-603}`) means the file was already renamed. An *explicit
//! override* (`tmdbid=603`, `tmdbid-603`, `tmdb-603`) means the user
//! pinned the identity by hand and it wins over similarity scoring.

use once_cell::sync::Lazy;
use regex::Regex;
use retitle_model::TmdbId;

static STANDARD_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\{imdb-tt\d+\}|\{tmdb-\d+\}")
        .expect("standard tag regex should compile")
});

static OVERRIDE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:tmdbid\s*[=\-]\s*|tmdb-)(\d+)")
        .expect("override id regex should compile")
});

static OVERRIDE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)tmdbid|tmdb-")
        .expect("override marker regex should compile")
});

/// Whether the filename already carries a standard identifier tag.
pub fn has_standard_tag(raw_filename: &str) -> bool {
    STANDARD_TAG.is_match(raw_filename)
}

/// User-supplied identity marker found in a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierOverride {
    /// A TMDb id could be read from the marker.
    Explicit(TmdbId),
    /// A marker is present but carries no usable id.
    Marker,
}

impl IdentifierOverride {
    pub fn tmdb(&self) -> Option<&TmdbId> {
        match self {
            IdentifierOverride::Explicit(id) => Some(id),
            IdentifierOverride::Marker => None,
        }
    }
}

/// Look for an explicit TMDb override marker.
///
/// Standard tags are checked first by callers, so `{tmdb-603}` never
/// reaches this as an override in practice.
pub fn detect_override(raw_filename: &str) -> Option<IdentifierOverride> {
    if let Some(caps) = OVERRIDE_ID.captures(raw_filename)
        && let Some(id) = TmdbId::parse(&caps[1])
    {
        return Some(IdentifierOverride::Explicit(id));
    }

    OVERRIDE_MARKER
        .is_match(raw_filename)
        .then_some(IdentifierOverride::Marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tags() {
        assert!(has_standard_tag("The Matrix (1999) {imdb-tt0133093}.mkv"));
        assert!(has_standard_tag("The Matrix (1999) {tmdb-603}.mkv"));
        assert!(has_standard_tag("The Matrix {IMDB-TT0133093}.mkv"));
        assert!(!has_standard_tag("The Matrix (1999).mkv"));
        assert!(!has_standard_tag("The Matrix {imdb-0133093}.mkv"));
        assert!(!has_standard_tag("The Matrix imdb-tt0133093.mkv"));
    }

    #[test]
    fn explicit_override_forms() {
        for raw in [
            "Some File tmdbid=603.mkv",
            "Some File tmdbid = 603.mkv",
            "Some File [tmdbid-603].mkv",
            "Some File tmdb-603.mkv",
            "Some File TMDBID=603.mkv",
        ] {
            let found = detect_override(raw);
            assert_eq!(
                found.as_ref().and_then(|o| o.tmdb()).map(|id| id.as_str()),
                Some("603"),
                "{raw}"
            );
        }
    }

    #[test]
    fn marker_without_digits() {
        assert_eq!(
            detect_override("Some File tmdbid.mkv"),
            Some(IdentifierOverride::Marker)
        );
    }

    #[test]
    fn no_marker() {
        assert_eq!(detect_override("Some File (2019).mkv"), None);
    }
}
