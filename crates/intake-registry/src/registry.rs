#![deny(unsafe_code)]

use std::collections::BTreeSet;
use std::path::Path;

use intake_model::InternalFieldDefinition;
use tracing::debug;

use crate::embedded::FIELDS_JSON;
use crate::error::RegistryError;
use crate::vocabulary::TagVocabulary;

/// Immutable catalog of canonical intake fields plus the tag vocabulary
/// they are described with.
///
/// Constructed once at startup and passed by reference into the ranking
/// engine. Every constructor validates the full catalog, so a registry that
/// exists is well-formed.
#[derive(Debug, Clone)]
pub struct Registry {
    fields: Vec<InternalFieldDefinition>,
    vocabulary: TagVocabulary,
}

impl Registry {
    /// Validates `fields` against `vocabulary`.
    pub fn new(
        fields: Vec<InternalFieldDefinition>,
        vocabulary: TagVocabulary,
    ) -> Result<Self, RegistryError> {
        if vocabulary.is_empty() {
            return Err(RegistryError::EmptyVocabulary);
        }
        validate_fields(&fields, Some(&vocabulary))?;
        debug!(
            field_count = fields.len(),
            tag_count = vocabulary.len(),
            "registry loaded"
        );
        Ok(Self { fields, vocabulary })
    }

    /// Builds a registry whose vocabulary is exactly the union of the
    /// entries' tags, in first-seen order.
    pub fn from_definitions(fields: Vec<InternalFieldDefinition>) -> Result<Self, RegistryError> {
        validate_fields(&fields, None)?;
        let vocabulary = TagVocabulary::new(fields.iter().flat_map(|f| f.tags.iter()));
        Ok(Self { fields, vocabulary })
    }

    /// Loads the embedded catalog and vocabulary.
    pub fn load_default() -> Result<Self, RegistryError> {
        let vocabulary = TagVocabulary::load_default()?;
        Self::from_json(FIELDS_JSON, "embedded field registry", vocabulary)
    }

    /// Parses a JSON array of field definitions.
    pub fn from_json(
        json: &str,
        what: &str,
        vocabulary: TagVocabulary,
    ) -> Result<Self, RegistryError> {
        let fields: Vec<InternalFieldDefinition> =
            serde_json::from_str(json).map_err(|e| RegistryError::json(what, e))?;
        Self::new(fields, vocabulary)
    }

    /// Loads a catalog file, validating it against `vocabulary`.
    pub fn load_from_path(path: &Path, vocabulary: TagVocabulary) -> Result<Self, RegistryError> {
        let contents = std::fs::read_to_string(path).map_err(|e| RegistryError::io(path, e))?;
        Self::from_json(&contents, &path.display().to_string(), vocabulary)
    }

    pub fn fields(&self) -> &[InternalFieldDefinition] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InternalFieldDefinition> {
        self.fields.iter()
    }

    pub fn get(&self, key: &str) -> Option<&InternalFieldDefinition> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn vocabulary(&self) -> &TagVocabulary {
        &self.vocabulary
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a InternalFieldDefinition;
    type IntoIter = std::slice::Iter<'a, InternalFieldDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

fn validate_fields(
    fields: &[InternalFieldDefinition],
    vocabulary: Option<&TagVocabulary>,
) -> Result<(), RegistryError> {
    if fields.is_empty() {
        return Err(RegistryError::Empty);
    }

    let mut keys: BTreeSet<&str> = BTreeSet::new();
    for (index, field) in fields.iter().enumerate() {
        let key = field.key.trim();
        if key.is_empty() {
            return Err(RegistryError::EmptyKey { index });
        }
        if !keys.insert(key) {
            return Err(RegistryError::DuplicateKey {
                key: key.to_string(),
            });
        }
        if !field.expected_length.is_valid() {
            return Err(RegistryError::InvalidLength {
                key: key.to_string(),
                min: field.expected_length.min,
                max: field.expected_length.max,
            });
        }
        if field.synonyms.is_empty() {
            return Err(RegistryError::MissingSynonyms {
                key: key.to_string(),
            });
        }
        if field.synonyms.iter().any(|s| s.trim().is_empty()) {
            return Err(RegistryError::BlankSynonym {
                key: key.to_string(),
            });
        }
        if let Some(vocabulary) = vocabulary
            && let Some(tag) = field.tags.iter().find(|t| !vocabulary.contains(t))
        {
            return Err(RegistryError::UnknownTag {
                key: key.to_string(),
                tag: tag.clone(),
            });
        }
    }

    Ok(())
}
