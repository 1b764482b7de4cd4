//! Ranking engine implementation.

use std::cmp::Ordering;

use indexmap::IndexMap;
use intake_model::{ExternalFieldObservation, MatchResult, Observations};
use intake_registry::Registry;
use rayon::prelude::*;
use tracing::{debug, info, info_span};

use crate::score::{Evaluation, evaluate};

/// Ranked candidates per observation key, in observation order.
pub type Matches = IndexMap<String, Vec<MatchResult>>;

/// Options for a ranking run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankOptions {
    /// Evaluate observations on the rayon thread pool. Results are identical
    /// to sequential evaluation.
    pub parallel: bool,
}

impl RankOptions {
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Counts from a ranking run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankSummary {
    pub observations: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub candidates: usize,
}

impl RankSummary {
    pub fn from_matches(matches: &Matches) -> Self {
        let matched = matches.values().filter(|c| !c.is_empty()).count();
        Self {
            observations: matches.len(),
            matched,
            unmatched: matches.len() - matched,
            candidates: matches.values().map(Vec::len).sum(),
        }
    }
}

/// Scores every observation against every registry entry.
///
/// The engine borrows the registry and never mutates it or the
/// observations. Candidates with a zero total are dropped; the rest are
/// sorted by total descending, with ties kept in registry order.
///
/// # Example
///
/// ```ignore
/// use intake_map::RankingEngine;
/// use intake_registry::Registry;
///
/// let registry = Registry::load_default()?;
/// let matches = RankingEngine::new(&registry).rank(&observations);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RankingEngine<'a> {
    registry: &'a Registry,
    options: RankOptions,
}

impl<'a> RankingEngine<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            options: RankOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: RankOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Evaluates one observation against every entry, in registry order,
    /// including rejected pairs.
    pub fn evaluate_all(
        &self,
        observation: &ExternalFieldObservation,
    ) -> Vec<(&'a str, Evaluation)> {
        self.registry
            .iter()
            .map(|field| (field.key.as_str(), evaluate(observation, field)))
            .collect()
    }

    /// Ranked, non-zero candidates for one observation.
    pub fn candidates(&self, observation: &ExternalFieldObservation) -> Vec<MatchResult> {
        let mut candidates: Vec<MatchResult> = self
            .registry
            .iter()
            .map(|field| evaluate(observation, field).into_match_result(field.key.as_str()))
            .filter(MatchResult::is_match)
            .collect();

        // Stable: equal totals stay in registry order.
        candidates.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
        candidates
    }

    /// Ranks every observation. Each input key appears in the output, with
    /// an empty list when nothing matched.
    pub fn rank(&self, observations: &Observations) -> Matches {
        let span = info_span!(
            "rank",
            observations = observations.len(),
            fields = self.registry.len(),
            parallel = self.options.parallel
        );
        let _guard = span.enter();

        let matches: Matches = if self.options.parallel {
            observations
                .par_iter()
                .map(|(key, observation)| (key.clone(), self.candidates(observation)))
                .collect::<Vec<_>>()
                .into_iter()
                .collect()
        } else {
            observations
                .iter()
                .map(|(key, observation)| (key.clone(), self.candidates(observation)))
                .collect()
        };

        for (key, candidates) in &matches {
            debug!(
                observation = %key,
                candidate_count = candidates.len(),
                best = candidates.first().map_or("-", |c| c.internal_key.as_str()),
                best_total = candidates.first().map_or(0.0, |c| c.total),
                "ranked observation"
            );
        }

        let summary = RankSummary::from_matches(&matches);
        info!(
            observations = summary.observations,
            matched = summary.matched,
            unmatched = summary.unmatched,
            candidates = summary.candidates,
            "ranking complete"
        );
        matches
    }
}
