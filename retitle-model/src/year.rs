use std::fmt::{self, Display};
use std::str::FromStr;

/// A release year, as given by metadata or read from a filename.
///
/// Canonical years are taken as supplied; only years found in filenames are
/// held to the [`ReleaseYear::PLAUSIBLE_MIN`]..=[`ReleaseYear::PLAUSIBLE_MAX`]
/// window (see [`ReleaseYear::plausible`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ReleaseYear(u16);

impl ReleaseYear {
    pub const PLAUSIBLE_MIN: u16 = 1900;
    pub const PLAUSIBLE_MAX: u16 = 2200;

    pub fn new(value: u16) -> Self {
        ReleaseYear(value)
    }

    /// Returns `None` outside 1900..=2200, the range a filename token must
    /// fall in to count as a year.
    pub fn plausible(value: u16) -> Option<Self> {
        (Self::PLAUSIBLE_MIN..=Self::PLAUSIBLE_MAX)
            .contains(&value)
            .then_some(ReleaseYear(value))
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Absolute distance in years.
    pub fn abs_diff(self, other: ReleaseYear) -> u16 {
        self.0.abs_diff(other.0)
    }
}

impl Display for ReleaseYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for ReleaseYear {
    fn from(value: u16) -> Self {
        ReleaseYear(value)
    }
}

impl From<ReleaseYear> for u16 {
    fn from(year: ReleaseYear) -> Self {
        year.0
    }
}

impl FromStr for ReleaseYear {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u16>()
            .map(ReleaseYear)
            .map_err(|_| format!("'{s}' is not a year"))
    }
}
