//! Language-model classifier reached over HTTP.
//!
//! [`RemoteClassifier`] serializes a [`ClassificationRequest`] per batch,
//! sends it through a [`Completion`] backend and parses the reply with
//! [`parse_classifier_response`]. [`OllamaClient`] is the backend for an
//! Ollama-compatible `generate` endpoint.

use std::collections::BTreeMap;
use std::time::Duration;

use intake_registry::TagVocabulary;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::classify::{
    ClassificationRequest, Classifier, FieldSummary, TagAssignments, parse_classifier_response,
};
use crate::error::ClassifyError;

/// Ollama `generate` endpoint on the local host.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";

/// Model requested when none is configured.
pub const DEFAULT_MODEL: &str = "glm-4.6:cloud";

/// Per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const SYSTEM_PROMPT: &str = "You are a strict structured data classifier.";

/// Where and how to reach a remote model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RemoteConfig {
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Sends one prompt to a language model and returns its text reply.
pub trait Completion {
    fn complete(&self, system: &str, user: &str) -> Result<String, ClassifyError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Blocking client for an Ollama-compatible `generate` endpoint.
pub struct OllamaClient {
    client: Client,
    config: RemoteConfig,
}

impl OllamaClient {
    pub fn new(config: RemoteConfig) -> Result<Self, ClassifyError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }
}

impl Completion for OllamaClient {
    fn complete(&self, system: &str, user: &str) -> Result<String, ClassifyError> {
        debug!(
            endpoint = %self.config.endpoint,
            model = %self.config.model,
            prompt_bytes = system.len() + user.len() + 1,
            "sending classification prompt"
        );

        let body = GenerateRequest {
            model: &self.config.model,
            prompt: format!("{system}\n{user}"),
            stream: false,
        };
        let response = self.client.post(&self.config.endpoint).json(&body).send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClassifyError::Status { status, message });
        }

        let reply: GenerateResponse = response.json()?;
        Ok(reply.response)
    }
}

/// Classifier that prompts a language model once per batch.
pub struct RemoteClassifier<B> {
    backend: B,
}

impl<B: Completion> RemoteClassifier<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl RemoteClassifier<OllamaClient> {
    /// Classifier backed by an [`OllamaClient`] for `config`.
    pub fn ollama(config: RemoteConfig) -> Result<Self, ClassifyError> {
        Ok(Self::new(OllamaClient::new(config)?))
    }
}

impl<B: Completion> Classifier for RemoteClassifier<B> {
    fn classify(
        &self,
        fields: &BTreeMap<String, FieldSummary>,
        vocabulary: &TagVocabulary,
    ) -> Result<TagAssignments, ClassifyError> {
        let request = ClassificationRequest::new(fields, vocabulary);
        let user = serde_json::to_string(&request)
            .map_err(|source| ClassifyError::Encode { source })?;
        let reply = self.backend.complete(SYSTEM_PROMPT, &user)?;
        trace!(reply_bytes = reply.len(), "classifier replied");
        parse_classifier_response(&reply, fields.keys().map(String::as_str), vocabulary)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use intake_model::SemanticType;
    use serde_json::Value;

    use super::*;

    /// Replays a canned reply and records every prompt it was sent.
    struct Canned {
        reply: &'static str,
        prompts: RefCell<Vec<(String, String)>>,
    }

    impl Completion for Canned {
        fn complete(&self, system: &str, user: &str) -> Result<String, ClassifyError> {
            self.prompts
                .borrow_mut()
                .push((system.to_string(), user.to_string()));
            Ok(self.reply.to_string())
        }
    }

    fn vocabulary() -> TagVocabulary {
        TagVocabulary::new(["identity", "personal_name", "address"])
    }

    fn fields() -> BTreeMap<String, FieldSummary> {
        BTreeMap::from([
            (
                "first_name".to_string(),
                FieldSummary {
                    normalized_name: "first name".to_string(),
                    semantic_type: SemanticType::Letters,
                    path: "applicant.first_name".to_string(),
                },
            ),
            (
                "postcode".to_string(),
                FieldSummary {
                    normalized_name: "postcode".to_string(),
                    semantic_type: SemanticType::NumbersAndLetters,
                    path: "applicant.address.postcode".to_string(),
                },
            ),
        ])
    }

    #[test]
    fn sends_request_payload_and_parses_fenced_reply() {
        let classifier = RemoteClassifier::new(Canned {
            reply: "```json\n{\"first_name\": [\"personal_name\", \"made_up\"], \"postcode\": [\"address\"]}\n```",
            prompts: RefCell::new(Vec::new()),
        });
        let assignments = classifier.classify(&fields(), &vocabulary()).unwrap();
        assert_eq!(assignments["first_name"], vec!["personal_name"]);
        assert_eq!(assignments["postcode"], vec!["address"]);

        let prompts = classifier.backend().prompts.borrow();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].0, SYSTEM_PROMPT);
        let payload: Value = serde_json::from_str(&prompts[0].1).unwrap();
        assert_eq!(payload["allowed_tags"].as_array().map(Vec::len), Some(3));
        assert_eq!(
            payload["fields"]["postcode"]["normalized_field_name"],
            "postcode"
        );
        assert_eq!(
            payload["fields"]["first_name"]["semantic_type"],
            "letters"
        );
    }

    #[test]
    fn unparseable_reply_fails_the_batch() {
        let classifier = RemoteClassifier::new(Canned {
            reply: "Sure! Here are your tags.",
            prompts: RefCell::new(Vec::new()),
        });
        let err = classifier.classify(&fields(), &vocabulary()).unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidResponse { .. }));
    }

    #[test]
    fn config_builders() {
        let config = RemoteConfig::default()
            .with_endpoint("http://127.0.0.1:9/api/generate")
            .with_model("llama3")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.endpoint, "http://127.0.0.1:9/api/generate");
        assert_eq!(config.model, "llama3");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(RemoteConfig::default().endpoint, DEFAULT_ENDPOINT);
    }
}
