//! Rename decision engine.
//!
//! Rules are evaluated in a fixed precedence order and the first match wins:
//!
//! 1. standard identifier tag already present: skip,
//! 2. no usable identifier: skip,
//! 3. explicit identifier override in the filename: auto-rename,
//! 4. otherwise score the titles and compare years,
//! 5. auto-rename when score, year and word-count gates all pass,
//! 6. ask when the score clears the ask threshold,
//! 7. skip for insufficient similarity.

use once_cell::sync::Lazy;
use regex::Regex;
use retitle_model::{
    CanonicalRecord, ExternalIds, IdentifierTag, MatchAction, MatchDecision,
    ReasonCode, ReleaseYear,
};
use sanitize_filename::Options;
use tracing::debug;

use crate::similarity::similarity;
use crate::tags::{detect_override, has_standard_tag};

static COLLAPSE_WHITESPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("whitespace regex should compile")
});

/// Similarity cutoffs and year tolerance, validated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Minimum score for an automatic rename.
    pub auto: u8,
    /// Scores strictly above this ask for confirmation.
    pub ask: u8,
    /// Largest year distance still considered a match.
    pub year_tolerance: u16,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            auto: 100,
            ask: 85,
            year_tolerance: 1,
        }
    }
}

impl Thresholds {
    /// `ask > auto` is tolerated but leaves the ask band empty.
    pub fn is_inverted(&self) -> bool {
        self.ask > self.auto
    }
}

/// Everything the engine needs to judge one file.
#[derive(Debug, Clone, Copy)]
pub struct MatchInput<'a> {
    /// Untouched on-disk basename.
    pub raw_filename: &'a str,
    pub normalized_title: &'a str,
    pub filename_year: Option<ReleaseYear>,
    pub canonical_title: &'a str,
    pub canonical_year: Option<ReleaseYear>,
    pub ids: &'a ExternalIds,
}

impl<'a> MatchInput<'a> {
    pub fn new(
        raw_filename: &'a str,
        normalized_title: &'a str,
        filename_year: Option<ReleaseYear>,
        record: &'a CanonicalRecord,
    ) -> Self {
        Self {
            raw_filename,
            normalized_title,
            filename_year,
            canonical_title: &record.title,
            canonical_year: record.year,
            ids: &record.ids,
        }
    }
}

/// Score the titles and decide.
pub fn decide(input: &MatchInput<'_>, thresholds: &Thresholds) -> MatchDecision {
    let score = similarity(input.normalized_title, input.canonical_title);
    evaluate(input, score, thresholds)
}

/// Decide with an already computed similarity score.
///
/// The score is only consulted once rules 1-3 have passed, and only then
/// recorded in the decision.
pub fn evaluate(
    input: &MatchInput<'_>,
    score: f64,
    thresholds: &Thresholds,
) -> MatchDecision {
    if has_standard_tag(input.raw_filename) {
        debug!(file = input.raw_filename, "standard identifier tag present");
        return MatchDecision::skip(ReasonCode::AlreadyTagged);
    }

    if input.canonical_title.trim().is_empty() {
        debug!(file = input.raw_filename, "canonical title is empty");
        return MatchDecision::skip(ReasonCode::InvalidInput);
    }

    let override_marker = detect_override(input.raw_filename);
    let ids = input
        .ids
        .clone()
        .with_tmdb(override_marker.as_ref().and_then(|o| o.tmdb()).cloned());

    let Some(tag) = ids.preferred() else {
        debug!(file = input.raw_filename, "no usable identifier");
        return MatchDecision::skip(ReasonCode::NoIdentifier);
    };

    let year_match = years_match(
        input.filename_year,
        input.canonical_year,
        thresholds.year_tolerance,
    );
    let name = proposed_name(input.canonical_title, input.canonical_year, &tag);

    if override_marker.is_some() {
        debug!(file = input.raw_filename, %tag, "explicit identifier override");
        return MatchDecision {
            action: MatchAction::AutoRename,
            score: None,
            year_match,
            reason: ReasonCode::ExplicitIdentifierOverride,
            proposed_name: Some(name),
        };
    }

    let score = score.clamp(0.0, 100.0);
    let reaches_auto = score >= f64::from(thresholds.auto);
    let words_ok =
        word_gate_passes(input.canonical_title, input.normalized_title);

    let (action, reason) = if reaches_auto && year_match && words_ok {
        (MatchAction::AutoRename, ReasonCode::SimilarityAndYearMatch)
    } else if score > f64::from(thresholds.ask) {
        let reason = if !reaches_auto {
            ReasonCode::BelowAutoThreshold
        } else if !year_match {
            ReasonCode::YearMismatch
        } else {
            ReasonCode::SingleWordTitle
        };
        (MatchAction::AskConfirm, reason)
    } else {
        (MatchAction::Skip, ReasonCode::InsufficientSimilarity)
    };

    debug!(
        file = input.raw_filename,
        score,
        year_match,
        %action,
        %reason,
        "scored candidate"
    );

    MatchDecision {
        action,
        score: Some(score),
        year_match,
        reason,
        proposed_name: (action != MatchAction::Skip).then_some(name),
    }
}

/// Missing either year never matches.
fn years_match(
    filename_year: Option<ReleaseYear>,
    canonical_year: Option<ReleaseYear>,
    tolerance: u16,
) -> bool {
    match (filename_year, canonical_year) {
        (Some(a), Some(b)) => a.abs_diff(b) <= tolerance,
        _ => false,
    }
}

/// Multi-word canonical titles pass; a single-word canonical title only
/// passes against a single-word candidate.
fn word_gate_passes(canonical_title: &str, candidate: &str) -> bool {
    match canonical_title.split_whitespace().count() {
        0 => false,
        1 => candidate.split_whitespace().count() == 1,
        _ => true,
    }
}

/// Longest basename a rename may produce, extension included.
pub const MAX_NAME_BYTES: usize = 255;

/// Room kept free for the extension the executor appends.
const EXTENSION_RESERVE: usize = 16;

/// New basename (without extension) for a canonical record.
///
/// Over-long titles are cut at a character boundary; the ` (year) {tag}`
/// suffix is always kept whole.
pub fn proposed_name(
    title: &str,
    year: Option<ReleaseYear>,
    tag: &IdentifierTag,
) -> String {
    let suffix = match year {
        Some(year) => format!(" ({year}) {tag}"),
        None => format!(" {tag}"),
    };
    let name = sanitize_name(&format!("{title}{suffix}"));

    let budget = MAX_NAME_BYTES - EXTENSION_RESERVE;
    if name.len() <= budget {
        return name;
    }
    let Some(title) = name.strip_suffix(suffix.as_str()) else {
        return name;
    };
    let title = truncate_at_char(title, budget.saturating_sub(suffix.len()));
    format!("{}{suffix}", title.trim_end())
}

/// Strip characters illegal in filenames and collapse whitespace.
pub fn sanitize_name(name: &str) -> String {
    let cleaned = sanitize_filename::sanitize_with_options(
        name,
        Options {
            windows: true,
            truncate: false,
            replacement: "",
        },
    );
    COLLAPSE_WHITESPACE
        .replace_all(cleaned.trim(), " ")
        .into_owned()
}

fn truncate_at_char(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let end = text
        .char_indices()
        .map(|(idx, _)| idx)
        .take_while(|&idx| idx <= max_bytes)
        .last()
        .unwrap_or(0);
    &text[..end]
}
