//! Topic-tag classification of observations.
//!
//! Tagging is a pluggable capability: anything implementing [`Classifier`]
//! can assign tags, and [`tag_observations`] drives it in batches. A
//! deterministic [`KeywordClassifier`] ships for offline use. Remote
//! classifiers ([`crate::remote`]) build a [`ClassificationRequest`] and feed
//! the reply to [`parse_classifier_response`].

use std::collections::{BTreeMap, BTreeSet};

use intake_model::{ExternalFieldObservation, Observations, SemanticType};
use intake_registry::TagVocabulary;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, info_span, warn};

use crate::enrich::normalize_field_name;
use crate::error::{ClassifyError, json_kind};

/// Batch size used when none is configured.
pub const DEFAULT_BATCH_SIZE: usize = 40;

/// Tags per field key, as returned by a classifier.
pub type TagAssignments = BTreeMap<String, Vec<String>>;

/// What a classifier sees of one observation. Values are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSummary {
    #[serde(rename = "normalized_field_name")]
    pub normalized_name: String,
    pub semantic_type: SemanticType,
    pub path: String,
}

impl FieldSummary {
    pub fn from_observation(observation: &ExternalFieldObservation) -> Self {
        let normalized_name = match observation.normalized_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => normalize_field_name(&observation.raw_name),
        };
        Self {
            normalized_name,
            semantic_type: observation.semantic_type,
            path: observation.path.clone(),
        }
    }
}

/// Assigns topic tags to a batch of fields.
///
/// Implementations should return tags drawn from `vocabulary` only; the
/// driver filters again regardless. Keys missing from the result are left
/// untagged.
pub trait Classifier {
    fn classify(
        &self,
        fields: &BTreeMap<String, FieldSummary>,
        vocabulary: &TagVocabulary,
    ) -> Result<TagAssignments, ClassifyError>;
}

impl<C: Classifier + ?Sized> Classifier for &C {
    fn classify(
        &self,
        fields: &BTreeMap<String, FieldSummary>,
        vocabulary: &TagVocabulary,
    ) -> Result<TagAssignments, ClassifyError> {
        (**self).classify(fields, vocabulary)
    }
}

/// Keyword → tags rules for [`KeywordClassifier`], applied in order.
const KEYWORD_RULES: &[(&[&str], &[&str])] = &[
    (&["name"], &["personal_name", "identity"]),
    (&["address", "postcode"], &["address"]),
    (&["email", "phone"], &["contact_information"]),
    (&["income", "salary"], &["income", "financial"]),
    (&["credit"], &["credit", "financial"]),
    (&["mortgage", "loan"], &["mortgage", "financial"]),
    (&["employment", "job"], &["employment"]),
    (&["consent", "agree"], &["consent", "legal"]),
    (&["previous"], &["previous"]),
    (&["current"], &["current"]),
];

/// Substring keyword heuristic over `"{name} {path} {type}"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    /// Tags for one field, in rule order, without duplicates.
    pub fn tags_for(&self, field: &FieldSummary, vocabulary: &TagVocabulary) -> Vec<String> {
        let text = format!(
            "{} {} {}",
            field.normalized_name, field.path, field.semantic_type
        )
        .to_lowercase();

        let mut tags: Vec<String> = Vec::new();
        for (keywords, rule_tags) in KEYWORD_RULES {
            if !keywords.iter().any(|k| text.contains(k)) {
                continue;
            }
            for tag in *rule_tags {
                if vocabulary.contains(tag) && !tags.iter().any(|t| t.as_str() == *tag) {
                    tags.push((*tag).to_string());
                }
            }
        }
        tags
    }
}

impl Classifier for KeywordClassifier {
    fn classify(
        &self,
        fields: &BTreeMap<String, FieldSummary>,
        vocabulary: &TagVocabulary,
    ) -> Result<TagAssignments, ClassifyError> {
        Ok(fields
            .iter()
            .map(|(key, field)| (key.clone(), self.tags_for(field, vocabulary)))
            .collect())
    }
}

const REQUEST_INSTRUCTION: &str = "Return a single JSON object and nothing else: no Markdown \
fences, comments or explanations. The first character must be '{' and the last '}'.";

const REQUEST_RULES: &[&str] = &[
    "Each value must be an array",
    "Tags must come only from allowed_tags",
    "Unknown fields must still appear with empty array",
];

/// Prompt payload for a remote classifier. Serialize it with `serde_json`.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationRequest<'a> {
    pub instruction: &'static str,
    pub example_output: BTreeMap<&'static str, [&'static str; 3]>,
    pub rules: &'static [&'static str],
    pub allowed_tags: &'a [String],
    pub fields: &'a BTreeMap<String, FieldSummary>,
}

impl<'a> ClassificationRequest<'a> {
    pub fn new(fields: &'a BTreeMap<String, FieldSummary>, vocabulary: &'a TagVocabulary) -> Self {
        let example_output = BTreeMap::from([
            ("first_name", ["personal_name", "personal_details", "identity"]),
            ("last_name", ["personal_name", "personal_details", "identity"]),
            ("date_of_birth", ["date_of_birth", "personal_details", "identity"]),
        ]);
        Self {
            instruction: REQUEST_INSTRUCTION,
            example_output,
            rules: REQUEST_RULES,
            allowed_tags: vocabulary.as_slice(),
            fields,
        }
    }
}

fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest;
        if text.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) {
            text = &text[4..];
        }
    }
    let text = text.trim();
    text.strip_suffix("```").unwrap_or(text).trim()
}

/// Parses a classifier's textual reply.
///
/// Accepts a JSON object optionally wrapped in Markdown code fences. Only
/// `expected_keys` are kept; each gets the string entries of its array that
/// are in `vocabulary`, or an empty list when missing or not an array.
pub fn parse_classifier_response<'k, I>(
    raw: &str,
    expected_keys: I,
    vocabulary: &TagVocabulary,
) -> Result<TagAssignments, ClassifyError>
where
    I: IntoIterator<Item = &'k str>,
{
    let value: Value = serde_json::from_str(strip_code_fences(raw))
        .map_err(|source| ClassifyError::InvalidResponse { source })?;
    let Value::Object(object) = value else {
        return Err(ClassifyError::NotAnObject {
            found: json_kind(&value),
        });
    };

    Ok(expected_keys
        .into_iter()
        .map(|key| {
            let tags = match object.get(key) {
                Some(Value::Array(entries)) => entries
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|tag| vocabulary.contains(tag))
                    .map(str::to_string)
                    .collect(),
                _ => Vec::new(),
            };
            (key.to_string(), tags)
        })
        .collect())
}

/// Options for [`tag_observations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggingOptions {
    /// Observations per classifier call. Zero is treated as one.
    pub batch_size: usize,
}

impl Default for TaggingOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl TaggingOptions {
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Outcome of a tagging run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaggingReport {
    pub batches: usize,
    pub failed_batches: usize,
    /// Observations that ended with at least one tag.
    pub tagged: usize,
    pub untagged: usize,
}

impl TaggingReport {
    pub fn is_complete(&self) -> bool {
        self.failed_batches == 0
    }
}

/// Tags every observation in place.
///
/// Observations are sent to `classifier` in batches. Tags returned for a
/// key are merged as a set and filtered to `vocabulary`. A failing batch is
/// logged and left untagged; the run carries on with the next batch.
pub fn tag_observations<C: Classifier + ?Sized>(
    observations: &mut Observations,
    classifier: &C,
    vocabulary: &TagVocabulary,
    options: &TaggingOptions,
) -> TaggingReport {
    let batch_size = options.batch_size.max(1);
    let span = info_span!("tag", observations = observations.len(), batch_size);
    let _guard = span.enter();

    let summaries: Vec<(String, FieldSummary)> = observations
        .iter()
        .map(|(key, observation)| (key.clone(), FieldSummary::from_observation(observation)))
        .collect();

    let mut report = TaggingReport::default();
    let mut merged: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for (index, chunk) in summaries.chunks(batch_size).enumerate() {
        report.batches += 1;
        let batch: BTreeMap<String, FieldSummary> = chunk.iter().cloned().collect();
        match classifier.classify(&batch, vocabulary) {
            Ok(assignments) => {
                debug!(batch = index, fields = batch.len(), "classified batch");
                for (key, tags) in assignments {
                    if !batch.contains_key(&key) {
                        continue;
                    }
                    merged
                        .entry(key)
                        .or_default()
                        .extend(vocabulary.retain_known(tags));
                }
            }
            Err(error) => {
                report.failed_batches += 1;
                warn!(batch = index, fields = batch.len(), %error, "classification failed, batch left untagged");
            }
        }
    }

    for (key, observation) in observations.iter_mut() {
        observation.tags = merged.remove(key).unwrap_or_default();
        if observation.tags.is_empty() {
            report.untagged += 1;
        } else {
            report.tagged += 1;
        }
    }

    info!(
        batches = report.batches,
        failed_batches = report.failed_batches,
        tagged = report.tagged,
        untagged = report.untagged,
        "tagging complete"
    );
    report
}
