#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {what}: {source}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("registry is empty")]
    Empty,

    #[error("tag vocabulary is empty")]
    EmptyVocabulary,

    #[error("registry entry #{index} has an empty key")]
    EmptyKey { index: usize },

    #[error("duplicate registry key: {key}")]
    DuplicateKey { key: String },

    #[error("registry entry {key} has no synonyms")]
    MissingSynonyms { key: String },

    #[error("registry entry {key} has a blank synonym")]
    BlankSynonym { key: String },

    #[error("registry entry {key} has an invalid expected length [{min}, {max}] (min > max)")]
    InvalidLength { key: String, min: usize, max: usize },

    #[error("registry entry {key} uses tag '{tag}' which is not in the vocabulary")]
    UnknownTag { key: String, tag: String },
}

impl RegistryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(what: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            what: what.into(),
            source,
        }
    }
}
