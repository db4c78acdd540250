//! `score` command: offline scoring of one prompt/response pair

use anyhow::{anyhow, Context as _, Result};
use comfy_table::Cell;
use prompt_optimizer_core::{MetricKind, TaskProfileRegistry};
use prompt_optimizer_metrics::{tokenizer, KeywordCalculator, MetricScorer, StructureCalculator};
use serde::Serialize;

use crate::cli::ScoreArgs;
use crate::context::Context;
use crate::output::{print_field, print_list_field, print_section, score_badge, TableDisplay};

pub async fn execute(ctx: &Context, args: ScoreArgs) -> Result<()> {
    let profile = TaskProfileRegistry::lookup(&args.category).map_err(|e| anyhow!("{}", e))?;

    let response = match (args.response, args.response_file) {
        (Some(text), _) => text,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read response from {}", path.display()))?,
        (None, None) => return Err(anyhow!("Either --response or --response-file is required")),
    };

    let score = MetricScorer::new().score(&profile, &args.prompt, &response);
    let checks = StructureCalculator::new().checks(&profile, &response);

    let display = ScoreDisplay {
        category: profile.category.as_str().to_string(),
        word_count: tokenizer::word_count(&response),
        optimal_word_range: profile.optimal_word_range,
        length_score: score.length,
        keyword_score: score.keyword,
        structure_score: score.structure,
        alignment_score: score.alignment,
        total: score.total(),
        matched_keywords: KeywordCalculator::new()
            .matched_keywords(&profile, &response)
            .into_iter()
            .map(str::to_string)
            .collect(),
        structure_checks_passed: checks.passed(),
        strongest: score.ranked().first().map(|(kind, _)| *kind),
    };

    ctx.output.write(&display)
}

#[derive(Debug, Serialize)]
struct ScoreDisplay {
    category: String,
    word_count: usize,
    optimal_word_range: (usize, usize),
    length_score: f64,
    keyword_score: f64,
    structure_score: f64,
    alignment_score: f64,
    total: f64,
    matched_keywords: Vec<String>,
    structure_checks_passed: usize,
    strongest: Option<MetricKind>,
}

impl TableDisplay for ScoreDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.category),
            Cell::new(format!("{:.1}", self.length_score)),
            Cell::new(format!("{:.1}", self.keyword_score)),
            Cell::new(format!("{:.1}", self.structure_score)),
            Cell::new(format!("{:.1}", self.alignment_score)),
            Cell::new(format!("{:.1}", self.total)),
        ]
    }

    fn display_single(&self) {
        print_section("Score");
        print_field("Category", &self.category);
        print_field("Total", &score_badge(self.total));
        print_field(
            "Words",
            &format!(
                "{} (optimal {}-{})",
                self.word_count, self.optimal_word_range.0, self.optimal_word_range.1
            ),
        );

        print_section("Sub-scores");
        print_field("Length", &format!("{:.1}/25", self.length_score));
        print_field("Keywords", &format!("{:.1}/25", self.keyword_score));
        print_field(
            "Structure",
            &format!(
                "{:.1}/25 ({} of 5 checks)",
                self.structure_score, self.structure_checks_passed
            ),
        );
        print_field("Alignment", &format!("{:.1}/25", self.alignment_score));
        print_list_field("Matched keywords", &self.matched_keywords);
    }
}
