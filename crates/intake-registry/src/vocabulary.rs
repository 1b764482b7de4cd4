//! Fixed topic-tag vocabulary shared by classifiers and the registry.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::embedded::TAGS_JSON;
use crate::error::RegistryError;

/// Ordered, duplicate-free list of allowed topic tags.
///
/// Every registry entry's tags must come from this vocabulary, otherwise a
/// full-coverage tag match against that entry would be unreachable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TagVocabulary {
    tags: Vec<String>,
    index: BTreeSet<String>,
}

impl TagVocabulary {
    /// Builds a vocabulary, trimming tags and dropping blanks and duplicates
    /// while keeping first-seen order.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocabulary = Self::default();
        for tag in tags {
            let tag = tag.as_ref().trim();
            if tag.is_empty() || vocabulary.index.contains(tag) {
                continue;
            }
            vocabulary.index.insert(tag.to_string());
            vocabulary.tags.push(tag.to_string());
        }
        vocabulary
    }

    /// Loads the embedded default vocabulary.
    pub fn load_default() -> Result<Self, RegistryError> {
        Self::from_json(TAGS_JSON, "embedded tag vocabulary")
    }

    /// Parses a JSON array of tag strings.
    pub fn from_json(json: &str, what: &str) -> Result<Self, RegistryError> {
        let tags: Vec<String> =
            serde_json::from_str(json).map_err(|e| RegistryError::json(what, e))?;
        let vocabulary = Self::new(tags);
        if vocabulary.is_empty() {
            return Err(RegistryError::EmptyVocabulary);
        }
        Ok(vocabulary)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.index.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Keeps only the tags present in the vocabulary.
    pub fn retain_known<I, S>(&self, tags: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tags.into_iter()
            .map(|tag| tag.as_ref().trim().to_string())
            .filter(|tag| self.contains(tag))
            .collect()
    }
}

impl From<Vec<String>> for TagVocabulary {
    fn from(tags: Vec<String>) -> Self {
        Self::new(tags)
    }
}

impl From<TagVocabulary> for Vec<String> {
    fn from(vocabulary: TagVocabulary) -> Self {
        vocabulary.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupes_and_keeps_order() {
        let vocabulary = TagVocabulary::new(["income", " credit ", "income", ""]);
        assert_eq!(vocabulary.as_slice(), &["income", "credit"]);
        assert!(vocabulary.contains("credit"));
        assert!(!vocabulary.contains(" credit "));
    }

    #[test]
    fn default_vocabulary_loads() {
        let vocabulary = TagVocabulary::load_default().unwrap();
        assert_eq!(vocabulary.len(), 104);
        assert_eq!(vocabulary.iter().next(), Some("identity"));
        assert!(vocabulary.contains("residency_duration"));
    }

    #[test]
    fn retain_known_filters_unknown_tags() {
        let vocabulary = TagVocabulary::new(["address", "postcode"]);
        let kept = vocabulary.retain_known(["postcode", "contact", "address"]);
        assert_eq!(
            kept.into_iter().collect::<Vec<_>>(),
            vec!["address".to_string(), "postcode".to_string()]
        );
    }

    #[test]
    fn empty_json_vocabulary_is_rejected() {
        let err = TagVocabulary::from_json("[]", "test").unwrap_err();
        assert!(matches!(err, RegistryError::EmptyVocabulary));
    }
}
