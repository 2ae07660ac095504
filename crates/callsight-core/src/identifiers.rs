//! Validated identifier types shared across the Callsight crates.
//!
//! Record identifiers (`TranscriptId`, `AnalysisId`) are SQLite rowids and
//! wrap `i64` directly. `CustomerId` carries caller-supplied text and goes
//! through `parse()` so an empty or malformed id is rejected at the boundary
//! instead of deep inside a query.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Validation failure for a textual identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdValidationError {
    #[error("identifier cannot be empty")]
    Empty,

    #[error("identifier too long: {length} characters (max {max})")]
    TooLong { length: usize, max: usize },

    #[error("identifier contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

/// Rowid of a stored call transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranscriptId(i64);

/// Rowid of a stored analysis result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(i64);

macro_rules! rowid_newtype {
    ($name:ident) => {
        impl $name {
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

rowid_newtype!(TranscriptId);
rowid_newtype!(AnalysisId);

/// Validated customer identifier.
///
/// Rules: non-empty, at most 64 characters, no surrounding whitespace, and
/// only alphanumeric characters, hyphens and underscores. These are the same
/// constraints the seed dataset's `CUST001`-style ids satisfy, and they keep
/// customer ids safe to embed in queries and log lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerId(String);

impl CustomerId {
    pub const MAX_LENGTH: usize = 64;

    /// Parse and validate a customer id from a string.
    pub fn parse(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
        let id = id.as_ref();

        if id.is_empty() {
            return Err(IdValidationError::Empty);
        }

        if id.len() > Self::MAX_LENGTH {
            return Err(IdValidationError::TooLong {
                length: id.len(),
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(character) = id
            .chars()
            .find(|c| !(c.is_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(IdValidationError::InvalidCharacter { character });
        }

        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create a customer id without validation.
    ///
    /// Only for values already known to be valid, such as rows read back
    /// from the database. User input must go through `parse()`.
    #[doc(hidden)]
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CustomerId {
    type Err = IdValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CustomerId {
    type Error = IdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CustomerId> for String {
    fn from(id: CustomerId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_customer_ids_parse() {
        for id in ["CUST001", "cust-42", "a", "customer_9"] {
            assert!(CustomerId::parse(id).is_ok(), "expected '{id}' to parse");
        }
    }

    #[test]
    fn empty_customer_id_is_rejected() {
        assert_eq!(CustomerId::parse(""), Err(IdValidationError::Empty));
    }

    #[test]
    fn whitespace_and_symbols_are_rejected() {
        assert!(matches!(
            CustomerId::parse("CUST 001"),
            Err(IdValidationError::InvalidCharacter { character: ' ' })
        ));
        assert!(matches!(
            CustomerId::parse("cust/1"),
            Err(IdValidationError::InvalidCharacter { character: '/' })
        ));
    }

    #[test]
    fn overlong_customer_id_is_rejected() {
        let id = "x".repeat(65);
        assert!(matches!(
            CustomerId::parse(&id),
            Err(IdValidationError::TooLong { length: 65, max: 64 })
        ));
    }

    #[test]
    fn rowid_newtypes_round_trip_through_serde() {
        let id = TranscriptId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let back: TranscriptId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
