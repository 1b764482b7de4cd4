//! Confidence aggregation for one observation against one canonical field.
//!
//! Evaluation runs in two gated stages. The name gate runs first and, when
//! it fails, nothing else is computed. The type gate runs next. Only
//! candidates passing both are scored as the weighted sum
//! `name * 0.60 + tags * 0.25 + length * 0.15`.

use intake_model::{
    ExternalFieldObservation, InternalFieldDefinition, MatchResult, RejectReason, ScoreComponents,
};

use crate::length::length_score;
use crate::name::{NameMatch, name_match};
use crate::semantic::type_score;
use crate::tags::tag_score;
use crate::utils::round_to;

/// Candidates whose name score falls below this are rejected outright.
pub const NAME_GATE: f64 = 0.6;

/// Fixed per-signal weights. They sum to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub name: f64,
    pub tags: f64,
    pub length: f64,
}

pub const WEIGHTS: Weights = Weights {
    name: 0.60,
    tags: 0.25,
    length: 0.15,
};

impl Weights {
    fn apply(&self, raw: &ScoreComponents) -> ScoreComponents {
        ScoreComponents {
            name: raw.name * self.name,
            tags: raw.tags * self.tags,
            length: raw.length * self.length,
        }
    }
}

/// Full breakdown of a candidate that passed both gates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    /// Which rung of the name ladder matched.
    pub name_match: NameMatch,
    /// Unrounded raw sub-scores.
    pub raw: ScoreComponents,
    /// Unrounded weighted sub-scores.
    pub weighted: ScoreComponents,
    /// Weighted sum, rounded to 4 decimals.
    pub total: f64,
}

/// Outcome of evaluating one (observation, field) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    /// A hard gate failed; the total is zero.
    Rejected { reason: RejectReason, name: f64 },
    Scored(ScoreBreakdown),
}

impl Evaluation {
    pub fn total(&self) -> f64 {
        match self {
            Evaluation::Rejected { .. } => 0.0,
            Evaluation::Scored(breakdown) => breakdown.total,
        }
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            Evaluation::Rejected { reason, .. } => Some(*reason),
            Evaluation::Scored(_) => None,
        }
    }

    /// Converts to the serialized result shape, rounding sub-scores to
    /// 3 decimals.
    pub fn into_match_result(self, internal_key: impl Into<String>) -> MatchResult {
        match self {
            Evaluation::Rejected { reason, .. } => MatchResult::rejected(internal_key, reason),
            Evaluation::Scored(breakdown) => MatchResult {
                internal_key: internal_key.into(),
                total: breakdown.total,
                rejected: None,
                components: Some(round_components(&breakdown.raw)),
                weighted: Some(round_components(&breakdown.weighted)),
            },
        }
    }
}

fn round_components(components: &ScoreComponents) -> ScoreComponents {
    ScoreComponents {
        name: round_to(components.name, 3),
        tags: round_to(components.tags, 3),
        length: round_to(components.length, 3),
    }
}

/// Evaluates `observation` against `field`.
///
/// When the observation has no normalized name, its raw name is used.
pub fn evaluate(
    observation: &ExternalFieldObservation,
    field: &InternalFieldDefinition,
) -> Evaluation {
    let name_match = name_match(observation.name_for_matching(), field);
    let name = name_match.score();
    if name < NAME_GATE {
        return Evaluation::Rejected {
            reason: RejectReason::Name,
            name,
        };
    }

    let length = length_score(observation.value_length, field.expected_length);
    if type_score(observation.semantic_type, field.field_type) == 0.0 {
        return Evaluation::Rejected {
            reason: RejectReason::Type,
            name,
        };
    }

    let tags = tag_score(&observation.tags, &field.tags);

    let raw = ScoreComponents { name, tags, length };
    let weighted = WEIGHTS.apply(&raw);
    let total = round_to(weighted.name + weighted.tags + weighted.length, 4);

    Evaluation::Scored(ScoreBreakdown {
        name_match,
        raw,
        weighted,
        total,
    })
}

/// Evaluates and converts to a [`MatchResult`] in one step.
pub fn confidence(
    observation: &ExternalFieldObservation,
    field: &InternalFieldDefinition,
) -> MatchResult {
    evaluate(observation, field).into_match_result(field.key.clone())
}
