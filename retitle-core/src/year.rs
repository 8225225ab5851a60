use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use retitle_model::ReleaseYear;

/// Four-digit years in 1900..=2200, without word-boundary anchors.
pub(crate) const YEAR_ALTERNATION: &str = r"(19\d{2}|20\d{2}|21\d{2}|2200)";

static YEAR_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b{YEAR_ALTERNATION}\b"))
        .expect("year token regex should compile")
});

static YEAR_EXACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{YEAR_ALTERNATION}$"))
        .expect("exact year regex should compile")
});

/// First plausible release year in the raw filename.
///
/// Only the basename is searched, and never a cleaned version of it: noise
/// removal must not be able to hide the year used for corroboration.
pub fn extract_year(raw_filename: &str) -> Option<ReleaseYear> {
    let name = Path::new(raw_filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(raw_filename);

    YEAR_TOKEN
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u16>().ok())
        .and_then(ReleaseYear::plausible)
}

/// Whether `token` is exactly one in-range year.
pub(crate) fn is_year_token(token: &str) -> bool {
    YEAR_EXACT.is_match(token)
}

pub(crate) fn year_token_regex() -> &'static Regex {
    &YEAR_TOKEN
}
