//! Name similarity between an observed field name and a canonical field.
//!
//! Scoring is a priority ladder over cheap token heuristics, not a string
//! distance. Tokens shared with any synonym count as overlap; generic nouns
//! ("status", "number", ...) only ever earn a weak score so they cannot push
//! a candidate past the name gate on their own.

use std::fmt;

use intake_model::InternalFieldDefinition;
use serde::{Deserialize, Serialize};

use crate::utils::normalize_name;

/// Generic words that carry little identifying signal.
pub const WEAK_TOKENS: &[&str] = &[
    "status",
    "number",
    "date",
    "type",
    "amount",
    "value",
    "code",
    "id",
    "identifier",
    "details",
    "info",
    "information",
];

/// Which rung of the name ladder matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatch {
    /// Observed name equals the key or a synonym.
    Exact,
    /// Two or more strong synonym tokens appear in the observed name.
    StrongTokens,
    /// Exactly one strong synonym token appears.
    StrongToken,
    /// Only generic tokens overlap.
    WeakTokens,
    /// A synonym contains the observed name or vice versa.
    Containment,
    None,
}

impl NameMatch {
    pub fn score(&self) -> f64 {
        match self {
            NameMatch::Exact => 1.0,
            NameMatch::StrongTokens => 0.9,
            NameMatch::StrongToken => 0.7,
            NameMatch::Containment => 0.45,
            NameMatch::WeakTokens => 0.25,
            NameMatch::None => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NameMatch::Exact => "exact",
            NameMatch::StrongTokens => "strong tokens",
            NameMatch::StrongToken => "strong token",
            NameMatch::WeakTokens => "weak tokens",
            NameMatch::Containment => "containment",
            NameMatch::None => "none",
        }
    }
}

impl fmt::Display for NameMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_weak_token(token: &str) -> bool {
    WEAK_TOKENS.contains(&token)
}

/// Classifies how `observed` relates to the field's key and synonyms.
///
/// `observed` is normalized here, so raw names are accepted too.
pub fn name_match(observed: &str, field: &InternalFieldDefinition) -> NameMatch {
    let observed = normalize_name(observed);
    let key = normalize_name(&field.key);
    let synonyms: Vec<String> = field
        .synonyms
        .iter()
        .map(String::as_str)
        .map(normalize_name)
        .collect();

    if observed == key || synonyms.iter().any(|s| *s == observed) {
        return NameMatch::Exact;
    }

    let observed_tokens: Vec<&str> = observed.split_whitespace().collect();
    let mut strong_overlap = 0usize;
    let mut weak_overlap = 0usize;
    for token in synonyms.iter().flat_map(|s| s.split_whitespace()) {
        if !observed_tokens.contains(&token) {
            continue;
        }
        if is_weak_token(token) {
            weak_overlap += 1;
        } else {
            strong_overlap += 1;
        }
    }

    if strong_overlap >= 2 {
        return NameMatch::StrongTokens;
    }
    if strong_overlap == 1 {
        return NameMatch::StrongToken;
    }
    if weak_overlap >= 1 {
        return NameMatch::WeakTokens;
    }

    if synonyms
        .iter()
        .any(|s| observed.contains(s.as_str()) || s.contains(observed.as_str()))
    {
        return NameMatch::Containment;
    }

    NameMatch::None
}

/// Name similarity in `{1.0, 0.9, 0.7, 0.45, 0.25, 0.0}`.
pub fn name_score(observed: &str, field: &InternalFieldDefinition) -> f64 {
    name_match(observed, field).score()
}
