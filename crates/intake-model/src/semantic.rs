//! Coarse semantic classification of observed values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Shape of a value as inferred from its text.
///
/// The enricher only produces `Boolean`, `Date`, `Number`, `NumbersAndLetters`,
/// `Letters` and `Unknown`. `Email` and `Text` exist because canonical fields
/// declare them; an observation never matches those entries unless the
/// caller supplies the richer type itself.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Boolean,
    Date,
    Number,
    NumbersAndLetters,
    Letters,
    Email,
    #[serde(rename = "string")]
    Text,
    #[default]
    Unknown,
}

impl SemanticType {
    /// Every variant, in declaration order.
    pub const ALL: [SemanticType; 8] = [
        SemanticType::Boolean,
        SemanticType::Date,
        SemanticType::Number,
        SemanticType::NumbersAndLetters,
        SemanticType::Letters,
        SemanticType::Email,
        SemanticType::Text,
        SemanticType::Unknown,
    ];

    /// Wire name, as used in JSON artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Boolean => "boolean",
            SemanticType::Date => "date",
            SemanticType::Number => "number",
            SemanticType::NumbersAndLetters => "numbers_and_letters",
            SemanticType::Letters => "letters",
            SemanticType::Email => "email",
            SemanticType::Text => "string",
            SemanticType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        SemanticType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownSemanticType(s.to_string()))
    }
}

/// JSON shape of the source value before stringification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservedType {
    String,
    Number,
    Boolean,
    Null,
}
