use anyhow::{Context, Result};
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};
use intake_cli::types::MatchRun;
use intake_map::Matches;
use intake_model::{MatchResult, Observations};

/// Alternatives listed after the best candidate.
const MAX_ALTERNATIVES: usize = 2;

/// One report line per observed field.
#[derive(Debug)]
struct MatchRow {
    field: String,
    semantic_type: String,
    length: usize,
    tags: usize,
    best: Option<MatchResult>,
    alternatives: Vec<(String, f64)>,
}

fn match_rows(observations: &Observations, matches: &Matches) -> Vec<MatchRow> {
    observations
        .iter()
        .map(|(key, observation)| {
            let candidates = matches.get(key).map(Vec::as_slice).unwrap_or_default();
            MatchRow {
                field: key.clone(),
                semantic_type: observation.semantic_type.to_string(),
                length: observation.value_length,
                tags: observation.tags.len(),
                best: candidates.first().cloned(),
                alternatives: candidates
                    .iter()
                    .skip(1)
                    .take(MAX_ALTERNATIVES)
                    .map(|c| (c.internal_key.clone(), c.total))
                    .collect(),
            }
        })
        .collect()
}

pub fn print_match_summary(run: &MatchRun) {
    println!("Input: {}", run.input.display());
    println!("Matches: {}", run.matches_path.display());
    if let Some(path) = &run.enriched_path {
        println!("Enriched: {}", path.display());
    }
    if let Some(path) = &run.tagged_path {
        println!("Tagged: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Len"),
        header_cell("Tags"),
        header_cell("Best match"),
        header_cell("Score"),
        header_cell("Breakdown"),
        header_cell("Alternatives"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);

    for row in match_rows(&run.observations, &run.matches) {
        let (best_cell, score, breakdown) = match &row.best {
            Some(best) => (
                Cell::new(&best.internal_key).fg(Color::Green),
                score_cell(best.total),
                Cell::new(best.explain()),
            ),
            None => (dim_cell("no match"), dim_cell("-"), dim_cell("-")),
        };
        table.add_row(vec![
            Cell::new(&row.field).add_attribute(Attribute::Bold),
            Cell::new(&row.semantic_type),
            Cell::new(row.length),
            count_cell(row.tags),
            best_cell,
            score,
            breakdown,
            alternatives_cell(&row.alternatives),
        ]);
    }

    let summary = &run.summary;
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(format!("{} of {} matched", summary.matched, summary.observations))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(format!("{} candidates", summary.candidates)).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    if let Some(report) = &run.tagging
        && !report.is_complete()
    {
        eprintln!(
            "Warning: {} of {} tagging batches failed; those fields were ranked untagged.",
            report.failed_batches, report.batches
        );
    }
}

/// Prints the full ranked candidates, with breakdowns, as JSON.
pub fn print_json_report(run: &MatchRun) -> Result<()> {
    let json = serde_json::to_string_pretty(&run.matches).context("serialize matches")?;
    println!("{json}");
    Ok(())
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(12)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::UpperBoundary(Width::Percentage(35)),
            ColumnConstraint::UpperBoundary(Width::Percentage(35)),
        ]);
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
        ]);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn score_cell(total: f64) -> Cell {
    let color = if total >= 0.8 {
        Color::Green
    } else if total >= 0.7 {
        Color::Yellow
    } else {
        Color::Red
    };
    Cell::new(format!("{total:.4}")).fg(color)
}

fn count_cell(count: usize) -> Cell {
    if count == 0 {
        dim_cell("0")
    } else {
        Cell::new(count)
    }
}

fn alternatives_cell(alternatives: &[(String, f64)]) -> Cell {
    if alternatives.is_empty() {
        return dim_cell("-");
    }
    let text = alternatives
        .iter()
        .map(|(key, total)| format!("{key} ({total:.4})"))
        .collect::<Vec<_>>()
        .join("\n");
    Cell::new(text).fg(Color::DarkGrey)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
