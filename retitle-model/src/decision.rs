use std::fmt::{self, Display};

/// What the engine wants done with one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum MatchAction {
    AutoRename,
    AskConfirm,
    Skip,
}

impl Display for MatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchAction::AutoRename => write!(f, "AUTO_RENAME"),
            MatchAction::AskConfirm => write!(f, "ASK_CONFIRM"),
            MatchAction::Skip => write!(f, "SKIP"),
        }
    }
}

/// Why a decision was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReasonCode {
    /// Filename already carries a standard `{imdb-..}`/`{tmdb-..}` tag.
    AlreadyTagged,
    /// Neither an IMDb nor a TMDb id is available.
    NoIdentifier,
    /// Filename embeds a TMDb id marker; it is treated as ground truth.
    ExplicitIdentifierOverride,
    SimilarityAndYearMatch,
    /// Similar enough for auto-rename, but the years disagree or are missing.
    YearMismatch,
    /// Single-word canonical title against a multi-word filename.
    SingleWordTitle,
    BelowAutoThreshold,
    InsufficientSimilarity,
    /// Caller handed in something the engine cannot judge.
    InvalidInput,
}

impl ReasonCode {
    pub fn describe(self) -> &'static str {
        match self {
            ReasonCode::AlreadyTagged => "already tagged",
            ReasonCode::NoIdentifier => "no identifier",
            ReasonCode::ExplicitIdentifierOverride => {
                "explicit identifier override"
            }
            ReasonCode::SimilarityAndYearMatch => {
                "similarity and year match"
            }
            ReasonCode::YearMismatch => "year mismatch or missing year",
            ReasonCode::SingleWordTitle => {
                "single-word title needs confirmation"
            }
            ReasonCode::BelowAutoThreshold => "below auto-rename threshold",
            ReasonCode::InsufficientSimilarity => "insufficient similarity",
            ReasonCode::InvalidInput => "invalid input",
        }
    }
}

impl Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Per-item verdict. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchDecision {
    pub action: MatchAction,
    /// Similarity in `[0, 100]`; absent when the verdict came before scoring.
    pub score: Option<f64>,
    pub year_match: bool,
    pub reason: ReasonCode,
    /// Sanitized new basename (without extension), set unless skipping.
    pub proposed_name: Option<String>,
}

impl MatchDecision {
    pub fn skip(reason: ReasonCode) -> Self {
        Self {
            action: MatchAction::Skip,
            score: None,
            year_match: false,
            reason,
            proposed_name: None,
        }
    }

    pub fn is_skip(&self) -> bool {
        self.action == MatchAction::Skip
    }
}

impl Display for MatchDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.action, self.reason)?;
        if let Some(score) = self.score {
            write!(f, " score={score:.2}")?;
        }
        Ok(())
    }
}
