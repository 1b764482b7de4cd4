use std::path::PathBuf;

use intake_ingest::TaggingReport;
use intake_map::{Matches, RankSummary, ShapedMatches};
use intake_model::Observations;

/// Everything a `match` run produced.
#[derive(Debug)]
pub struct MatchRun {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub matches_path: PathBuf,
    pub enriched_path: Option<PathBuf>,
    pub tagged_path: Option<PathBuf>,
    pub observations: Observations,
    pub matches: Matches,
    pub shaped: ShapedMatches,
    pub summary: RankSummary,
    /// `None` when tagging was skipped.
    pub tagging: Option<TaggingReport>,
}
