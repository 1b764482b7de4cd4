//! Intake record ingestion.
//!
//! Turns raw nested application records into the flat observations the
//! matcher consumes ([`enrich`]), and assigns topic tags through a
//! pluggable [`Classifier`] ([`classify`]), either offline or by prompting a
//! remote language model ([`remote`]).

#![deny(unsafe_code)]

pub mod classify;
pub mod enrich;
pub mod error;
pub mod record;
pub mod remote;

pub use classify::{
    ClassificationRequest, Classifier, DEFAULT_BATCH_SIZE, FieldSummary, KeywordClassifier,
    TagAssignments, TaggingOptions, TaggingReport, parse_classifier_response, tag_observations,
};
pub use enrich::{detect_semantic_type, enrich_json, flatten, normalize_field_name, observe};
pub use error::{ClassifyError, IngestError};
pub use record::{LeafValue, RecordNode};
pub use remote::{
    Completion, DEFAULT_ENDPOINT, DEFAULT_MODEL, OllamaClient, RemoteClassifier, RemoteConfig,
};
