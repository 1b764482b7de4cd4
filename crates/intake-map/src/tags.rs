//! Topic-tag overlap between an observation and a canonical field.

use std::collections::BTreeSet;

use crate::utils::round_to;

/// Intermediate quantities of a tag comparison, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TagOverlap {
    /// Share of the canonical tags present in the observation.
    pub coverage: f64,
    /// Share of the observed tags present in the canonical field.
    pub precision: f64,
    /// Damping for small canonical tag sets on partial coverage.
    pub size_boost: f64,
    /// Final score, rounded to 4 decimals.
    pub score: f64,
}

impl TagOverlap {
    const NONE: TagOverlap = TagOverlap {
        coverage: 0.0,
        precision: 0.0,
        size_boost: 0.0,
        score: 0.0,
    };
}

/// Compares observed tags against canonical tags. Duplicates are ignored.
pub fn tag_overlap<'a, 'b, X, Y>(observed: X, canonical: Y) -> TagOverlap
where
    X: IntoIterator<Item = &'a String>,
    Y: IntoIterator<Item = &'b String>,
{
    let observed: BTreeSet<&str> = observed.into_iter().map(String::as_str).collect();
    let canonical: BTreeSet<&str> = canonical.into_iter().map(String::as_str).collect();
    if observed.is_empty() || canonical.is_empty() {
        return TagOverlap::NONE;
    }

    let shared = canonical.intersection(&observed).count();
    if shared == 0 {
        return TagOverlap::NONE;
    }

    let coverage = shared as f64 / canonical.len() as f64;
    let precision = shared as f64 / observed.len() as f64;
    // One- and two-tag entries would otherwise score highly on partial overlap.
    let size_boost = if shared == canonical.len() {
        1.0
    } else {
        ((canonical.len() as f64 + 1.0).log2() / 10f64.log2()).min(1.0)
    };
    let score = coverage * (0.6 + 0.4 * precision) * size_boost;

    TagOverlap {
        coverage,
        precision,
        size_boost,
        score: round_to(score, 4),
    }
}

/// Tag similarity in `[0, 1]`, rounded to 4 decimals; `0` when either side
/// has no tags.
pub fn tag_score<'a, 'b, X, Y>(observed: X, canonical: Y) -> f64
where
    X: IntoIterator<Item = &'a String>,
    Y: IntoIterator<Item = &'b String>,
{
    tag_overlap(observed, canonical).score
}
