use std::fmt::{self, Display};

/// Placeholder values metadata providers emit instead of a real id.
fn is_placeholder(raw: &str) -> bool {
    raw.is_empty()
        || raw.eq_ignore_ascii_case("na")
        || raw.eq_ignore_ascii_case("n/a")
}

/// IMDb title id (`tt` followed by digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImdbId(String);

impl ImdbId {
    /// Parse a provider value. Placeholders and malformed ids are absent.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if is_placeholder(raw) {
            return None;
        }
        let digits = raw
            .strip_prefix("tt")
            .or_else(|| raw.strip_prefix("TT"))?;
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(ImdbId(format!("tt{digits}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ImdbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// TMDb numeric id, kept as text to preserve the provider's spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TmdbId(String);

impl TmdbId {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if is_placeholder(raw) || !raw.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(TmdbId(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TmdbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// External identifiers known for one item. IMDb is primary, TMDb the
/// secondary fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExternalIds {
    pub imdb: Option<ImdbId>,
    pub tmdb: Option<TmdbId>,
}

impl ExternalIds {
    pub fn new(imdb: Option<ImdbId>, tmdb: Option<TmdbId>) -> Self {
        Self { imdb, tmdb }
    }

    /// Build from raw provider strings, dropping placeholders.
    pub fn from_raw(imdb: Option<&str>, tmdb: Option<&str>) -> Self {
        Self {
            imdb: imdb.and_then(ImdbId::parse),
            tmdb: tmdb.and_then(TmdbId::parse),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.imdb.is_none() && self.tmdb.is_none()
    }

    /// Tag for the preferred identifier, if any.
    pub fn preferred(&self) -> Option<IdentifierTag> {
        self.imdb
            .clone()
            .map(IdentifierTag::Imdb)
            .or_else(|| self.tmdb.clone().map(IdentifierTag::Tmdb))
    }

    /// Same ids with the TMDb slot replaced.
    pub fn with_tmdb(mut self, tmdb: Option<TmdbId>) -> Self {
        if tmdb.is_some() {
            self.tmdb = tmdb;
        }
        self
    }
}

impl Display for ExternalIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let imdb = self.imdb.as_ref().map(ImdbId::as_str).unwrap_or("N/A");
        let tmdb = self.tmdb.as_ref().map(TmdbId::as_str).unwrap_or("N/A");
        write!(f, "IMDb: {imdb} / TMDB: {tmdb}")
    }
}

/// Standard bracketed marker embedding an external id in a filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentifierTag {
    Imdb(ImdbId),
    Tmdb(TmdbId),
}

impl Display for IdentifierTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierTag::Imdb(id) => write!(f, "{{imdb-{id}}}"),
            IdentifierTag::Tmdb(id) => write!(f, "{{tmdb-{id}}}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_absent() {
        for raw in ["", "NA", "n/a", "N/A", "  "] {
            assert!(ImdbId::parse(raw).is_none(), "{raw:?}");
            assert!(TmdbId::parse(raw).is_none(), "{raw:?}");
        }
    }

    #[test]
    fn malformed_ids_are_absent() {
        assert!(ImdbId::parse("0133093").is_none());
        assert!(ImdbId::parse("tt").is_none());
        assert!(ImdbId::parse("tt12a").is_none());
        assert!(TmdbId::parse("603x").is_none());
    }

    #[test]
    fn preferred_falls_back_to_tmdb() {
        let both = ExternalIds::from_raw(Some("tt0133093"), Some("603"));
        assert_eq!(both.preferred().unwrap().to_string(), "{imdb-tt0133093}");

        let tmdb_only = ExternalIds::from_raw(Some("n/a"), Some("603"));
        assert_eq!(tmdb_only.preferred().unwrap().to_string(), "{tmdb-603}");

        assert!(ExternalIds::from_raw(None, Some("na")).preferred().is_none());
    }

    #[test]
    fn with_tmdb_keeps_existing_when_none() {
        let ids = ExternalIds::from_raw(None, Some("603"));
        assert_eq!(ids.clone().with_tmdb(None), ids);
        let replaced = ids.with_tmdb(TmdbId::parse("77"));
        assert_eq!(replaced.tmdb.unwrap().as_str(), "77");
    }
}
