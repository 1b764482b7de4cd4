//! Canonical field registry for intake form mapping.
//!
//! The registry is a static, versionable dataset: one entry per canonical
//! application field (key, expected semantic type, expected length range,
//! topic tags, synonyms) plus the tag vocabulary classifiers draw from.
//! Malformed entries fail at load time, never mid-scoring.

#![deny(unsafe_code)]

pub mod embedded;
pub mod error;
pub mod registry;
pub mod vocabulary;

pub use crate::error::RegistryError;
pub use crate::registry::Registry;
pub use crate::vocabulary::TagVocabulary;
