//! Strand orientation for genomic features.

use std::fmt;

use crate::error::Error;

/// Strand orientation of a genomic feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    /// Parse an annotation strand column. "-" is reverse, "+" is forward.
    pub fn from_symbol(s: &str) -> Result<Self, Error> {
        match s {
            "+" => Ok(Self::Forward),
            "-" => Ok(Self::Reverse),
            _ => Err(Error::Parse(format!("invalid strand symbol: '{s}'"))),
        }
    }

    #[must_use]
    pub fn is_reverse(self) -> bool {
        self == Self::Reverse
    }

    /// Signed representation: +1 forward, -1 reverse.
    #[must_use]
    pub fn sign(self) -> i8 {
        match self {
            Self::Forward => 1,
            Self::Reverse => -1,
        }
    }

    /// Genomic position of the base `offset` bases into `[start, end]`, counted in
    /// transcription direction (0-based).
    #[must_use]
    pub fn genomic_at(self, start: i64, end: i64, offset: i64) -> i64 {
        match self {
            Self::Forward => start + offset,
            Self::Reverse => end - offset,
        }
    }

    /// Inverse of [`Strand::genomic_at`]: 0-based offset of `pos` inside `[start, end]`
    /// in transcription direction.
    #[must_use]
    pub fn offset_of(self, start: i64, end: i64, pos: i64) -> i64 {
        match self {
            Self::Forward => pos - start,
            Self::Reverse => end - pos,
        }
    }
}

impl TryFrom<i8> for Strand {
    type Error = Error;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Forward),
            -1 => Ok(Self::Reverse),
            _ => Err(Error::InvalidArgument(format!(
                "invalid strand: {value} (expected 1 or -1)"
            ))),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "+"),
            Self::Reverse => write!(f, "-"),
        }
    }
}
