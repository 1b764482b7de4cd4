use thiserror::Error;

/// Errors raised while turning a raw record into observations.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to parse {what}: {source}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("record root must be a JSON object, found {found}")]
    RootNotObject { found: &'static str },

    #[error("array values are not supported (at {path})")]
    UnsupportedArray { path: String },
}

/// Errors raised by a [`Classifier`](crate::classify::Classifier).
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("classifier response is not valid JSON: {source}")]
    InvalidResponse {
        #[source]
        source: serde_json::Error,
    },

    #[error("classifier response must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("classifier failed: {0}")]
    Backend(String),

    #[error("failed to encode classifier request: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    /// The endpoint could not be reached or its body could not be read.
    #[error("classifier network error: {0}")]
    Network(String),

    #[error("classifier endpoint returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
}

impl From<reqwest::Error> for ClassifyError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// JSON kind name for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
