use std::path::Path;
use std::time::Duration;

use anyhow::{Result, bail};
use comfy_table::Table;
use intake_cli::pipeline::{
    ClassifierChoice, InputKind, PipelineOptions, default_output_dir, load_registry, run_pipeline,
};
use intake_cli::types::MatchRun;
use intake_ingest::{RemoteConfig, TaggingOptions};
use intake_map::{RankOptions, ShapeOptions};

use crate::cli::{ClassifierArg, MatchArgs};
use crate::summary::apply_table_style;

pub fn run_fields(registry_path: Option<&Path>) -> Result<()> {
    let registry = load_registry(registry_path)?;
    let mut table = Table::new();
    table.set_header(vec!["Key", "Type", "Length", "Tags", "Synonyms"]);
    apply_table_style(&mut table);
    for field in &registry {
        table.add_row(vec![
            field.key.clone(),
            field.field_type.to_string(),
            field.expected_length.to_string(),
            field.tags.join(", "),
            field.synonyms.join(", "),
        ]);
    }
    println!("{table}");
    println!("{} fields, {} tags", registry.len(), registry.vocabulary().len());
    Ok(())
}

pub fn run_match(args: &MatchArgs, registry_path: Option<&Path>) -> Result<MatchRun> {
    if !args.input.is_file() {
        bail!("input file not found: {}", args.input.display());
    }
    let registry = load_registry(registry_path)?;
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.input));
    let options = pipeline_options(args);
    run_pipeline(&args.input, &output_dir, &registry, &options)
}

fn pipeline_options(args: &MatchArgs) -> PipelineOptions {
    PipelineOptions {
        input_kind: if args.enriched {
            InputKind::Enriched
        } else {
            InputKind::Record
        },
        tag: !args.no_tags,
        tagging: TaggingOptions::default().with_batch_size(args.batch_size),
        classifier: match args.classifier {
            ClassifierArg::Keyword => ClassifierChoice::Keyword,
            ClassifierArg::Ollama => ClassifierChoice::Remote(
                RemoteConfig::default()
                    .with_endpoint(args.classifier_url.clone())
                    .with_model(args.classifier_model.clone())
                    .with_timeout(Duration::from_secs(args.classifier_timeout)),
            ),
        },
        rank: RankOptions::default().with_parallel(args.parallel),
        shape: ShapeOptions::default()
            .with_top_n(args.top_n)
            .with_min_score(args.min_score),
        write_intermediate: args.write_intermediate,
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Command};

    fn match_args(argv: &[&str]) -> MatchArgs {
        let cli = Cli::try_parse_from(argv).expect("valid arguments");
        match cli.command {
            Command::Match(args) => args,
            Command::Fields => panic!("expected the match command"),
        }
    }

    #[test]
    fn keyword_classifier_by_default() {
        let options = pipeline_options(&match_args(&["intake", "match", "in.json"]));
        assert!(options.tag);
        assert_eq!(options.classifier, ClassifierChoice::Keyword);
    }

    #[test]
    fn ollama_classifier_flags() {
        let args = match_args(&[
            "intake",
            "match",
            "in.json",
            "--classifier",
            "ollama",
            "--classifier-url",
            "http://models.internal:11434/api/generate",
            "--classifier-timeout",
            "30",
        ]);
        let options = pipeline_options(&args);
        assert_eq!(
            options.classifier,
            ClassifierChoice::Remote(
                RemoteConfig::default()
                    .with_endpoint("http://models.internal:11434/api/generate")
                    .with_timeout(Duration::from_secs(30))
            )
        );
    }
}
