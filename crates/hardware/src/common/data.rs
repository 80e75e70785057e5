//! Memory Access Types.
//!
//! This module defines the classification of trace operations. These types are used for:
//! 1. **Trace Parsing:** Mapping the `R`/`W` operation column of a trace line.
//! 2. **Statistics Tracking:** Routing each access to the read or write counters.

use std::fmt;
use std::str::FromStr;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Data read access (`R` or `r` in a trace).
    Read,

    /// Data write access (`W` or `w` in a trace).
    Write,
}

impl AccessType {
    /// Maps a trace operation character, case-insensitively.
    ///
    /// # Returns
    ///
    /// `Some(AccessType)` for `R`, `r`, `W`, or `w`; `None` otherwise.
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'R' | 'r' => Some(Self::Read),
            'W' | 'w' => Some(Self::Write),
            _ => None,
        }
    }

    /// The canonical trace character for this operation.
    pub const fn as_char(self) -> char {
        match self {
            Self::Read => 'R',
            Self::Write => 'W',
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("Read"),
            Self::Write => f.write_str("Write"),
        }
    }
}

/// Error returned when a trace operation column is not `R` or `W`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown access type {0:?} (expected R or W)")]
pub struct ParseAccessTypeError(pub String);

impl FromStr for AccessType {
    type Err = ParseAccessTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or_else(|| ParseAccessTypeError(s.to_owned())),
            _ => Err(ParseAccessTypeError(s.to_owned())),
        }
    }
}
