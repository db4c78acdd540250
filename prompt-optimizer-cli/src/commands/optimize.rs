//! `optimize` command

use anyhow::{anyhow, Context as _, Result};
use comfy_table::Cell;
use prompt_optimizer_core::{OptimizationReport, OptimizationRequest, PipelineRun};
use prompt_optimizer_workflow::PipelineOrchestrator;
use serde::Serialize;
use std::io::Read;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::cli::OptimizeArgs;
use crate::context::Context;
use crate::output::{
    format_improvement, new_table, print_block, print_field, print_section, score_badge, truncate,
    TableDisplay,
};

pub async fn execute(ctx: &Context, args: OptimizeArgs) -> Result<()> {
    let prompt = match args.prompt {
        Some(prompt) => prompt,
        None => read_stdin()?,
    };

    let request = OptimizationRequest::new(&prompt, &args.category)
        .map_err(|e| anyhow!("Invalid request: {}", e))?;
    let config = ctx.orchestrator_config(args.variants)?;
    let generator = ctx.create_generator()?;

    let store = ctx.store();
    let history_path = store.path().to_path_buf();
    let mut orchestrator = PipelineOrchestrator::new(generator, config);
    if !args.no_save {
        orchestrator = orchestrator.with_sink(Arc::new(store));
    }

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let spinner = ctx.output.spinner("Starting optimization run...");
    let progress = spinner.clone().map(|pb| {
        let mut events = orchestrator.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => pb.set_message(format!("[{}] {}", event.state, event.message)),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        })
    });

    let result = orchestrator.run_request(request, cancel).await;

    interrupt.abort();
    if let Some(task) = progress {
        task.abort();
    }
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    // The pipeline error already names the stage and the last generator error.
    let run = result.map_err(|e| anyhow!("{}", e))?;

    if run.variant_count() == 0 {
        ctx.output
            .warning("No variations were generated; only the original prompt was scored");
    }

    let mut display = RunDisplay::from_run(&run)?;
    if !args.no_save {
        display.saved_to = Some(history_path.display().to_string());
    }
    ctx.output.write(&display)?;

    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read prompt from stdin")?;
    Ok(buffer)
}

/// Displayable run result
#[derive(Debug, Serialize)]
struct RunDisplay {
    run_id: Uuid,
    category: String,
    original_prompt: String,
    #[serde(flatten)]
    report: OptimizationReport,
    candidates: Vec<CandidateRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_to: Option<String>,
}

#[derive(Debug, Serialize)]
struct CandidateRow {
    index: usize,
    origin: String,
    prompt: String,
    /// Absent when the candidate produced no response.
    total: Option<f64>,
}

impl RunDisplay {
    fn from_run(run: &PipelineRun) -> Result<Self> {
        let report = run
            .report()
            .context("Run finished without a selected winner")?;

        let candidates = run
            .candidates
            .iter()
            .map(|candidate| CandidateRow {
                index: candidate.index,
                origin: candidate.origin.to_string(),
                prompt: candidate.prompt_text.clone(),
                total: run
                    .results
                    .iter()
                    .find(|r| r.candidate_index == candidate.index)
                    .map(|r| r.total()),
            })
            .collect();

        Ok(Self {
            run_id: run.id,
            category: run.profile.category.as_str().to_string(),
            original_prompt: run.original().prompt_text.clone(),
            report,
            candidates,
            saved_to: None,
        })
    }
}

impl TableDisplay for RunDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(truncate(&self.original_prompt, 40)),
            Cell::new(&self.category),
            Cell::new(format!("{:.1}", self.report.winner_total)),
            Cell::new(format!("{:+.1}", self.report.improvement)),
        ]
    }

    fn display_single(&self) {
        let report = &self.report;

        print_section("Optimization Result");
        print_field("Run", &self.run_id.to_string());
        print_field("Category", &self.category);
        print_field("Winner", &format!("candidate {}", report.winner_index));
        print_field("Score", &score_badge(report.winner_total));
        print_field("Original", &score_badge(report.original_total));
        print_field("Improvement", &format_improvement(report.improvement));

        print_section("Sub-scores");
        print_field("Length", &format!("{:.1}/25", report.length_score));
        print_field("Keywords", &format!("{:.1}/25", report.keyword_score));
        print_field("Structure", &format!("{:.1}/25", report.structure_score));
        print_field("Alignment", &format!("{:.1}/25", report.alignment_score));

        print_section("Candidates");
        let mut table = new_table(&["#", "Origin", "Prompt", "Total"]);
        for row in &self.candidates {
            let mut index = Cell::new(row.index);
            if row.index == report.winner_index {
                index = index.fg(comfy_table::Color::Green);
            }
            table.add_row(vec![
                index,
                Cell::new(&row.origin),
                Cell::new(truncate(&row.prompt, 60)),
                Cell::new(
                    row.total
                        .map(|t| format!("{:.1}", t))
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ]);
        }
        println!("{table}");

        print_section("Optimized Prompt");
        print_block(&report.winner_prompt);

        print_section("Response");
        print_block(&report.winner_response);

        print_section("Why");
        print_block(&report.explanation);

        if let Some(path) = &self.saved_to {
            println!();
            print_field("Saved to", path);
        }
    }
}
