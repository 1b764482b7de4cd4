//! Externally observed form fields.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::semantic::{ObservedType, SemanticType};

/// Observations keyed by their external field key, in document order.
pub type Observations = IndexMap<String, ExternalFieldObservation>;

/// One flattened field from an external record.
///
/// Field names on the wire follow the enriched-data artifact
/// (`raw_field_name`, `normalized_field_name`, `length`); the shorter names
/// are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalFieldObservation {
    /// Original field identifier.
    #[serde(rename = "raw_field_name", alias = "raw_name")]
    pub raw_name: String,
    /// Lower-cased, separator-collapsed form of `raw_name`.
    #[serde(
        rename = "normalized_field_name",
        alias = "normalized_name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub normalized_name: Option<String>,
    /// Stringified observed value. Diagnostic only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Character count of the stringified value.
    #[serde(rename = "length", alias = "value_length", default)]
    pub value_length: usize,
    /// JSON shape of the source value. Diagnostic only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_type: Option<ObservedType>,
    /// Coarse classification of the value's shape.
    #[serde(default)]
    pub semantic_type: SemanticType,
    /// Topic tags assigned by a classifier; empty when untagged.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Dotted location in the source structure. Diagnostic only.
    #[serde(default)]
    pub path: String,
}

impl ExternalFieldObservation {
    pub fn new(
        raw_name: impl Into<String>,
        semantic_type: SemanticType,
        value_length: usize,
    ) -> Self {
        Self {
            raw_name: raw_name.into(),
            normalized_name: None,
            value: None,
            value_length,
            observed_type: None,
            semantic_type,
            tags: BTreeSet::new(),
            path: String::new(),
        }
    }

    #[must_use]
    pub fn with_normalized_name(mut self, name: impl Into<String>) -> Self {
        self.normalized_name = Some(name.into());
        self
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
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>, observed_type: ObservedType) -> Self {
        self.value = Some(value.into());
        self.observed_type = Some(observed_type);
        self
    }

    /// Name used for matching: the normalized name, or `raw_name` when the
    /// normalized name is missing or blank.
    pub fn name_for_matching(&self) -> &str {
        match self.normalized_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.raw_name,
        }
    }
}
