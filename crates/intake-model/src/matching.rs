//! Match results produced by the confidence aggregator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Hard gate that forced a candidate's total to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Name similarity below the gate.
    Name,
    /// Semantic type mismatch.
    Type,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Name => "name",
            RejectReason::Type => "type",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RejectReason {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(RejectReason::Name),
            "type" => Ok(RejectReason::Type),
            other => Err(ModelError::UnknownRejectReason(other.to_string())),
        }
    }
}

/// Per-signal sub-scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub name: f64,
    pub tags: f64,
    pub length: f64,
}

/// Scored candidate mapping from an observation to a canonical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Canonical field key.
    pub internal_key: String,
    /// Weighted confidence in `[0, 1]`, rounded to 4 decimals.
    pub total: f64,
    /// Set only when a hard gate forced `total` to zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected: Option<RejectReason>,
    /// Raw sub-scores, rounded to 3 decimals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<ScoreComponents>,
    /// Sub-scores multiplied by their weights, rounded to 3 decimals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighted: Option<ScoreComponents>,
}

impl MatchResult {
    pub fn rejected(internal_key: impl Into<String>, reason: RejectReason) -> Self {
        Self {
            internal_key: internal_key.into(),
            total: 0.0,
            rejected: Some(reason),
            components: None,
            weighted: None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.rejected.is_some()
    }

    /// True when the candidate carries a positive total.
    pub fn is_match(&self) -> bool {
        self.total > 0.0
    }

    /// Human-readable breakdown, e.g. `name 1.000 (0.600); tags 0.401 (0.100); length 1.000 (0.150)`.
    pub fn explain(&self) -> String {
        if let Some(reason) = self.rejected {
            return format!("rejected by {reason} gate");
        }
        match (&self.components, &self.weighted) {
            (Some(raw), Some(weighted)) => format!(
                "name {:.3} ({:.3}); tags {:.3} ({:.3}); length {:.3} ({:.3})",
                raw.name, weighted.name, raw.tags, weighted.tags, raw.length, weighted.length
            ),
            _ => format!("total {:.4}", self.total),
        }
    }
}
