//! Simplified match output for downstream consumers.
//!
//! Shaping turns ranked [`Matches`] into `observation -> {field -> score}`,
//! keeping rank order inside each inner map.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::engine::Matches;
use crate::error::ShapeError;
use crate::utils::round_to;

/// Truncation and threshold applied to each observation's candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeOptions {
    /// Maximum candidates kept per observation; `None` keeps all.
    pub top_n: Option<usize>,
    /// Minimum total to keep a candidate.
    pub min_score: f64,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            top_n: None,
            min_score: 0.0,
        }
    }
}

impl ShapeOptions {
    #[must_use]
    pub fn with_top_n(mut self, top_n: Option<usize>) -> Self {
        self.top_n = top_n;
        self
    }

    #[must_use]
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.top_n == Some(0) {
            return Err(ShapeError::ZeroTopN);
        }
        if !self.min_score.is_finite() || !(0.0..=1.0).contains(&self.min_score) {
            return Err(ShapeError::MinScoreOutOfRange(self.min_score));
        }
        Ok(())
    }
}

/// Field scores for one observation, in rank order.
///
/// Serializes as a JSON object whose keys keep rank order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedCandidates(Vec<(String, f64)>);

impl ShapedCandidates {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, score)| *score)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, score)| (k.as_str(), *score))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ShapedCandidates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, score) in &self.0 {
            map.serialize_entry(key, score)?;
        }
        map.end()
    }
}

/// Shaped output keyed by observation, in observation order.
pub type ShapedMatches = IndexMap<String, ShapedCandidates>;

/// Applies `options` to ranked matches.
///
/// Candidates below `min_score` are dropped first, then each list is cut to
/// `top_n`. Observations left with no candidates are omitted.
pub fn shape(matches: &Matches, options: &ShapeOptions) -> Result<ShapedMatches, ShapeError> {
    options.validate()?;

    let mut shaped = ShapedMatches::new();
    for (observation, candidates) in matches {
        let limit = options.top_n.unwrap_or(candidates.len());
        let kept: Vec<(String, f64)> = candidates
            .iter()
            .filter(|c| c.total >= options.min_score)
            .take(limit)
            .map(|c| (c.internal_key.clone(), round_to(c.total, 4)))
            .collect();
        if !kept.is_empty() {
            shaped.insert(observation.clone(), ShapedCandidates(kept));
        }
    }
    Ok(shaped)
}
