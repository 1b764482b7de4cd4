//! Flattening of nested records into field observations.
//!
//! Each leaf becomes one [`ExternalFieldObservation`] carrying its raw key,
//! a normalized name, the stringified value and its length, and a coarse
//! [`SemanticType`] detected from the text.

use std::sync::LazyLock;

use intake_model::{ExternalFieldObservation, ObservedType, Observations, SemanticType};
use regex::Regex;
use tracing::{debug, info_span, warn};

use crate::error::IngestError;
use crate::record::{LeafValue, RecordNode};

const BOOLEAN_WORDS: &[&str] = &["yes", "no", "true", "false", "y", "n"];

/// YYYY-MM-DD, YYYY/MM/DD, DD-MM-YYYY, DD/MM/YYYY.
static DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]{4}[-/][0-9]{2}[-/][0-9]{2}|[0-9]{2}[-/][0-9]{2}[-/][0-9]{4})$")
        .expect("Invalid date regex")
});

static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(?:\.[0-9]+)?$").expect("Invalid number regex"));

static ALPHANUMERIC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9 ]+$").expect("Invalid alphanumeric regex"));

static LETTERS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z ]+$").expect("Invalid letters regex"));

/// Turns a raw field key into space-separated lower-case words.
///
/// `_` and `-` become spaces and camelCase boundaries are split:
/// `applicantFirst_name` becomes `applicant first name`.
pub fn normalize_field_name(raw: &str) -> String {
    let mut spaced = String::with_capacity(raw.len() + 4);
    let mut previous: Option<char> = None;
    for ch in raw.chars() {
        match ch {
            '_' | '-' => spaced.push(' '),
            _ => {
                if ch.is_ascii_uppercase() && previous.is_some_and(|p| p.is_ascii_lowercase()) {
                    spaced.push(' ');
                }
                spaced.push(ch);
            }
        }
        previous = Some(ch);
    }
    spaced
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Detects the semantic type of a stringified value.
///
/// Rules are tried in order: boolean words, strict dates, plain numbers,
/// mixed letters and digits, letters only. Anything else, including the
/// empty string, is [`SemanticType::Unknown`].
pub fn detect_semantic_type(value: &str) -> SemanticType {
    let raw = value.trim();
    let lower = raw.to_lowercase();

    if BOOLEAN_WORDS.contains(&lower.as_str()) {
        return SemanticType::Boolean;
    }
    if DATE_REGEX.is_match(raw) {
        return SemanticType::Date;
    }
    if NUMBER_REGEX.is_match(raw) {
        return SemanticType::Number;
    }
    if ALPHANUMERIC_REGEX.is_match(raw)
        && raw.chars().any(|c| c.is_ascii_alphabetic())
        && raw.chars().any(|c| c.is_ascii_digit())
    {
        return SemanticType::NumbersAndLetters;
    }
    if LETTERS_REGEX.is_match(raw) {
        return SemanticType::Letters;
    }
    SemanticType::Unknown
}

fn observed_type(leaf: &LeafValue) -> ObservedType {
    match leaf {
        LeafValue::Null => ObservedType::Null,
        LeafValue::Bool(_) => ObservedType::Boolean,
        LeafValue::Number(_) => ObservedType::Number,
        LeafValue::Text(_) => ObservedType::String,
    }
}

/// Builds the observation for one leaf.
pub fn observe(key: &str, leaf: &LeafValue, path: &str) -> ExternalFieldObservation {
    let text = leaf.to_text();
    let semantic_type = detect_semantic_type(&text);
    let length = text.chars().count();
    ExternalFieldObservation::new(key, semantic_type, length)
        .with_normalized_name(normalize_field_name(key))
        .with_value(text, observed_type(leaf))
        .with_path(path)
}

/// Flattens a record depth-first, in document order.
///
/// Observations are keyed by leaf key. When a leaf key was already taken by
/// an earlier leaf, the later one is keyed by its full dotted path instead.
pub fn flatten(record: &RecordNode) -> Observations {
    let span = info_span!("flatten", leaves = record.leaf_count());
    let _guard = span.enter();

    let mut observations = Observations::new();
    let mut path = Vec::new();
    walk(record, &mut path, &mut observations);
    debug!(observations = observations.len(), "flattened record");
    observations
}

fn walk<'a>(node: &'a RecordNode, path: &mut Vec<&'a str>, out: &mut Observations) {
    let RecordNode::Branch(children) = node else {
        return;
    };
    for (key, child) in children {
        path.push(key);
        match child {
            RecordNode::Branch(_) => walk(child, path, out),
            RecordNode::Leaf(leaf) => {
                let dotted = path.join(".");
                let observation = observe(key, leaf, &dotted);
                if out.contains_key(key.as_str()) {
                    warn!(key = %key, path = %dotted, "duplicate field key, keying by path");
                    out.insert(dotted, observation);
                } else {
                    out.insert(key.clone(), observation);
                }
            }
        }
        path.pop();
    }
}

/// Parses JSON text and flattens it.
pub fn enrich_json(json: &str, what: &str) -> Result<Observations, IngestError> {
    let record = RecordNode::from_json(json, what)?;
    Ok(flatten(&record))
}
