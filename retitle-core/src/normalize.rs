//! Filename cleaning into a comparable title.
//!
//! Pipeline, each step working on the output of the previous one:
//!
//! 1. strip the extension (and any trailing scene release group),
//! 2. drop `[...]` segments,
//! 3. drop configured noise words,
//! 4. swap parenthesized years for positional placeholders,
//! 5. drop the remaining `(...)` groups,
//! 6. drop bare years not touching a parenthesis,
//! 7. restore the placeholders as `(year)`,
//! 8. drop the restored `(year)` groups,
//! 9. turn dots into spaces and collapse whitespace.
//!
//! The placeholder round trip keeps "this group was a year" distinguishable
//! from "this group was arbitrary metadata" while generic parenthesis removal
//! runs.

use std::fmt::{self, Display};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::year::{YEAR_ALTERNATION, is_year_token, year_token_regex};

/// Quality, encoding and cut labels stripped unless configured otherwise.
pub const DEFAULT_NOISE_WORDS: &[&str] = &[
    "720p",
    "1080p",
    "2160p",
    "4k",
    "480p",
    "dvd",
    "xvid",
    "mp3",
    "ac3",
    "6ch",
    "5.1",
    "bluray",
    "web-dl",
    "webrip",
    "hdtv",
    "hdrip",
    "x264",
    "h264",
    "x265",
    "hevc",
    "extended",
    "uncut",
    "remastered",
    "director's cut",
    "final cut",
    "multi",
    "dual",
];

/// Stand-in for a protected `(year)`; private-use and digit-free.
const YEAR_PLACEHOLDER: char = '\u{E000}';

static BRACKETED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[.*?\]").expect("bracket regex should compile")
});

static PARENTHESIZED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\((.*?)\)").expect("parenthesis regex should compile")
});

static PAREN_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\s*\({YEAR_ALTERNATION}\)\s*"))
        .expect("parenthesized year regex should compile")
});

static RELEASE_GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<head>\S+)-[A-Za-z0-9]+$")
        .expect("release group regex should compile")
});

static COLLAPSE_WHITESPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("whitespace regex should compile")
});

/// Ordered, immutable list of noise words with their compiled matchers.
#[derive(Debug, Clone)]
pub struct NoiseWords {
    words: Vec<String>,
    patterns: Vec<Regex>,
}

impl NoiseWords {
    /// Compile a noise list. Blank entries are ignored; order is preserved.
    ///
    /// Words of a multi-word phrase match across spaces or dots, so
    /// `director's cut` also removes `Director's.Cut`.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept = Vec::new();
        let mut patterns = Vec::new();

        for word in words {
            let word = word.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            let phrase = word
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"[\s.]+");
            let pattern = format!(r"(?i)\b{phrase}\b");
            match Regex::new(&pattern) {
                Ok(regex) => {
                    kept.push(word.to_string());
                    patterns.push(regex);
                }
                Err(err) => {
                    warn!("ignoring noise word {word:?}: {err}");
                }
            }
        }

        Self {
            words: kept,
            patterns,
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Case-insensitive membership test for a single token.
    pub fn contains(&self, token: &str) -> bool {
        self.words
            .iter()
            .any(|word| word.eq_ignore_ascii_case(token))
    }

    fn strip(&self, text: &str) -> String {
        self.patterns
            .iter()
            .fold(text.to_string(), |acc, pattern| {
                pattern.replace_all(&acc, "").into_owned()
            })
    }
}

impl Default for NoiseWords {
    fn default() -> Self {
        NoiseWords::new(DEFAULT_NOISE_WORDS)
    }
}

/// Comparable title derived from a raw filename. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedTitle(String);

impl NormalizedTitle {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NormalizedTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Clean a raw filename (or path) into a comparable title.
///
/// Deterministic in `(raw_filename, noise)`. If every character is
/// stripped, the extension-less basename is returned instead, with dots
/// turned into spaces.
pub fn normalize(raw_filename: &str, noise: &NoiseWords) -> NormalizedTitle {
    let basename = Path::new(raw_filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(raw_filename);
    let stem = Path::new(basename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(basename);

    let name = strip_release_group(stem, noise);
    let name = BRACKETED.replace_all(&name, "").into_owned();
    let name = noise.strip(&name);

    let (name, years) = protect_paren_years(&name);
    let name = PARENTHESIZED.replace_all(&name, "").into_owned();
    let name = strip_bare_years(&name);
    let name = restore_paren_years(&name, &years);
    let name = PAREN_YEAR.replace_all(&name, " ").into_owned();

    let cleaned = spaced(&name);
    if cleaned.is_empty() {
        NormalizedTitle(spaced(stem))
    } else {
        NormalizedTitle(cleaned)
    }
}

/// Dots to spaces, whitespace collapsed. Output never contains a dot, so a
/// second pass cannot mistake part of it for an extension.
fn spaced(text: &str) -> String {
    let text = text.replace('.', " ");
    COLLAPSE_WHITESPACE
        .replace_all(text.trim(), " ")
        .into_owned()
}

/// Drop a scene `-GROUP` suffix hanging off a noise word or year, as in
/// `x264-GROUP` or `WEB-DL-GROUP`. Hyphenated title words (`Spider-Man`)
/// are left alone.
fn strip_release_group(stem: &str, noise: &NoiseWords) -> String {
    let split = stem.rfind(['.', ' ']).map(|idx| idx + 1).unwrap_or(0);
    let (prefix, last) = stem.split_at(split);

    let Some(caps) = RELEASE_GROUP.captures(last) else {
        return stem.to_string();
    };
    let head = &caps["head"];
    if noise.contains(head) || is_year_token(head) {
        format!("{prefix}{head}")
    } else {
        stem.to_string()
    }
}

fn protect_paren_years(text: &str) -> (String, Vec<String>) {
    let mut years = Vec::new();
    let protected = PARENTHESIZED.replace_all(text, |caps: &regex::Captures| {
        let inner = &caps[1];
        if is_year_token(inner) {
            years.push(inner.to_string());
            YEAR_PLACEHOLDER.to_string()
        } else {
            caps[0].to_string()
        }
    });
    (protected.into_owned(), years)
}

/// Remove in-range years that neither follow `(` nor precede `)`.
fn strip_bare_years(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in year_token_regex().find_iter(text) {
        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        if before == Some('(') || after == Some(')') {
            continue;
        }
        out.push_str(&text[last..m.start()]);
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

fn restore_paren_years(text: &str, years: &[String]) -> String {
    let mut remaining = years.iter();
    let mut out = String::with_capacity(text.len() + years.len() * 6);
    for ch in text.chars() {
        if ch == YEAR_PLACEHOLDER {
            if let Some(year) = remaining.next() {
                out.push('(');
                out.push_str(year);
                out.push(')');
            }
        } else {
            out.push(ch);
        }
    }
    out
}
