//! Confidence scoring and ranking of observed form fields against the
//! canonical intake registry.
//!
//! Four signals feed each (observation, field) score:
//! - name similarity ([`name`]), a hard gate at 0.6
//! - semantic type equality ([`semantic`]), a hard gate
//! - value-length plausibility ([`length`])
//! - topic-tag overlap ([`tags`])
//!
//! [`score::evaluate`] combines them for one pair; [`RankingEngine`] runs the
//! full cross product and [`shape()`] trims the result for consumers. Every
//! function here is pure and synchronous.

#![deny(unsafe_code)]

pub mod engine;
pub mod error;
pub mod length;
pub mod name;
pub mod score;
pub mod semantic;
pub mod shape;
pub mod tags;
pub mod utils;

pub use engine::{Matches, RankOptions, RankSummary, RankingEngine};
pub use error::ShapeError;
pub use length::length_score;
pub use name::{NameMatch, name_match, name_score};
pub use score::{Evaluation, NAME_GATE, ScoreBreakdown, WEIGHTS, Weights, confidence, evaluate};
pub use semantic::type_score;
pub use shape::{ShapeOptions, ShapedCandidates, ShapedMatches, shape};
pub use tags::{TagOverlap, tag_overlap, tag_score};
pub use utils::normalize_name;
