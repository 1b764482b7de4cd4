//! Canonical application field definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::semantic::SemanticType;

/// Inclusive expected value-length range, serialized as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct LengthRange {
    pub min: usize,
    pub max: usize,
}

impl LengthRange {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, length: usize) -> bool {
        length >= self.min && length <= self.max
    }

    /// True when `min <= max`.
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }
}

impl From<(usize, usize)> for LengthRange {
    fn from((min, max): (usize, usize)) -> Self {
        Self { min, max }
    }
}

impl From<LengthRange> for (usize, usize) {
    fn from(range: LengthRange) -> Self {
        (range.min, range.max)
    }
}

impl fmt::Display for LengthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// One canonical field of the intake form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalFieldDefinition {
    /// Canonical identifier, unique across the registry.
    pub key: String,
    /// Expected semantic type of the value.
    #[serde(rename = "type")]
    pub field_type: SemanticType,
    /// Expected value-length range.
    pub expected_length: LengthRange,
    /// Topic tags describing the field.
    pub tags: Vec<String>,
    /// Alternative natural-language names, most canonical first.
    pub synonyms: Vec<String>,
}

impl InternalFieldDefinition {
    pub fn new(
        key: impl Into<String>,
        field_type: SemanticType,
        expected_length: LengthRange,
    ) -> Self {
        Self {
            key: key.into(),
            field_type,
            expected_length,
            tags: Vec::new(),
            synonyms: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_range_round_trips_as_pair() {
        let json = serde_json::to_string(&LengthRange::new(10, 200)).unwrap();
        assert_eq!(json, "[10,200]");
        let parsed: LengthRange = serde_json::from_str("[5, 8]").unwrap();
        assert!(parsed.contains(5));
        assert!(parsed.contains(8));
        assert!(!parsed.contains(9));
    }

    #[test]
    fn definition_uses_type_on_the_wire() {
        let json = r#"{
            "key": "postcode",
            "type": "string",
            "expected_length": [5, 8],
            "tags": ["address", "postcode"],
            "synonyms": ["postcode", "zip code", "postal code"]
        }"#;
        let field: InternalFieldDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(field.field_type, SemanticType::Text);
        assert_eq!(field.expected_length, LengthRange::new(5, 8));
        assert_eq!(field.synonyms.len(), 3);
    }
}
