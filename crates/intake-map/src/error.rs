//! Error types for output shaping.

use thiserror::Error;

/// Invalid shaping parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("top_n must be a positive integer")]
    ZeroTopN,
    #[error("min_score must be a finite number in [0, 1], got {0}")]
    MinScoreOutOfRange(f64),
}
