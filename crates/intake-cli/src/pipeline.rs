//! The `match` pipeline: load, enrich, tag, rank, shape, write.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use intake_ingest::{
    KeywordClassifier, RemoteClassifier, RemoteConfig, TaggingOptions, TaggingReport, enrich_json,
    tag_observations,
};
use intake_map::{RankOptions, RankSummary, RankingEngine, ShapeOptions, shape};
use intake_model::Observations;
use intake_registry::{Registry, TagVocabulary};
use serde::Serialize;
use tracing::{info, info_span, trace, warn};

use crate::logging::redact_value;
use crate::types::MatchRun;

pub const MATCHES_FILE: &str = "matches.json";
pub const ENRICHED_FILE: &str = "enriched.json";
pub const TAGGED_FILE: &str = "tagged.json";

/// Shape of the input document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputKind {
    /// Nested application record, flattened by the enricher.
    #[default]
    Record,
    /// Already-flattened observations keyed by field.
    Enriched,
}

/// Which classifier tags observations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClassifierChoice {
    #[default]
    Keyword,
    /// A language model behind an Ollama-compatible endpoint.
    Remote(RemoteConfig),
}

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub input_kind: InputKind,
    /// Tag observations before ranking.
    pub tag: bool,
    pub tagging: TaggingOptions,
    pub classifier: ClassifierChoice,
    pub rank: RankOptions,
    pub shape: ShapeOptions,
    /// Also write `enriched.json` and `tagged.json`.
    pub write_intermediate: bool,
}

/// Loads the registry from `path`, or the embedded default.
pub fn load_registry(path: Option<&Path>) -> Result<Registry> {
    match path {
        Some(path) => {
            let vocabulary = TagVocabulary::load_default().context("load tag vocabulary")?;
            Registry::load_from_path(path, vocabulary)
                .with_context(|| format!("load registry {}", path.display()))
        }
        None => Registry::load_default().context("load embedded registry"),
    }
}

pub fn load_observations(path: &Path, kind: InputKind) -> Result<Observations> {
    let json = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let what = path.display().to_string();
    let observations = match kind {
        InputKind::Record => {
            enrich_json(&json, &what).with_context(|| format!("enrich {what}"))?
        }
        InputKind::Enriched => serde_json::from_str(&json)
            .with_context(|| format!("parse enriched observations {what}"))?,
    };
    for (key, observation) in &observations {
        trace!(
            field = %key,
            value = redact_value(observation.value.as_deref().unwrap_or_default()),
            semantic_type = %observation.semantic_type,
            length = observation.value_length,
            "observed field"
        );
    }
    Ok(observations)
}

/// Tags observations with the chosen classifier.
pub fn tag(
    observations: &mut Observations,
    registry: &Registry,
    classifier: &ClassifierChoice,
    options: &TaggingOptions,
) -> Result<TaggingReport> {
    let vocabulary = registry.vocabulary();
    let report = match classifier {
        ClassifierChoice::Keyword => {
            tag_observations(observations, &KeywordClassifier, vocabulary, options)
        }
        ClassifierChoice::Remote(config) => {
            info!(
                endpoint = %config.endpoint,
                model = %config.model,
                "tagging with remote classifier"
            );
            let remote = RemoteClassifier::ollama(config.clone())
                .context("create remote classifier client")?;
            tag_observations(observations, &remote, vocabulary, options)
        }
    };
    if !report.is_complete() {
        warn!(
            failed_batches = report.failed_batches,
            batches = report.batches,
            "some classifier batches failed; their fields are untagged"
        );
    }
    Ok(report)
}

/// Writes `value` as pretty-printed JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)
        .with_context(|| format!("serialize {}", path.display()))?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("write {}", path.display()))
}

/// Runs the full pipeline on `input`, writing artifacts into `output_dir`.
pub fn run_pipeline(
    input: &Path,
    output_dir: &Path,
    registry: &Registry,
    options: &PipelineOptions,
) -> Result<MatchRun> {
    let span = info_span!("match", input = %input.display());
    let _guard = span.enter();

    options.shape.validate().context("invalid output options")?;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("create output dir {}", output_dir.display()))?;

    let mut observations = load_observations(input, options.input_kind)?;
    info!(observations = observations.len(), "loaded observations");

    let mut enriched_path = None;
    if options.write_intermediate {
        let path = output_dir.join(ENRICHED_FILE);
        write_json(&path, &observations)?;
        enriched_path = Some(path);
    }

    let mut tagging = None;
    let mut tagged_path = None;
    if options.tag {
        tagging = Some(tag(
            &mut observations,
            registry,
            &options.classifier,
            &options.tagging,
        )?);
        if options.write_intermediate {
            let path = output_dir.join(TAGGED_FILE);
            write_json(&path, &observations)?;
            tagged_path = Some(path);
        }
    }

    let matches = RankingEngine::new(registry)
        .with_options(options.rank)
        .rank(&observations);
    let summary = RankSummary::from_matches(&matches);
    let shaped = shape(&matches, &options.shape).context("shape matches")?;

    let matches_path = output_dir.join(MATCHES_FILE);
    write_json(&matches_path, &shaped)?;
    info!(path = %matches_path.display(), observations = shaped.len(), "wrote matches");

    Ok(MatchRun {
        input: input.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        matches_path,
        enriched_path,
        tagged_path,
        observations,
        matches,
        shaped,
        summary,
        tagging,
    })
}

/// Default output directory: the input file's directory.
pub fn default_output_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
