//! Data model shared by the intake mapping crates.

#![deny(unsafe_code)]

pub mod error;
pub mod field;
pub mod matching;
pub mod observation;
pub mod semantic;

pub use error::{ModelError, Result};
pub use field::{InternalFieldDefinition, LengthRange};
pub use matching::{MatchResult, RejectReason, ScoreComponents};
pub use observation::{ExternalFieldObservation, Observations};
pub use semantic::{ObservedType, SemanticType};
