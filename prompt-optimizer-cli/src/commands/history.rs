//! Commands over the stored run history: `history`, `stats`, `export`, `clear`

use anyhow::{anyhow, Context as _, Result};
use colored::Colorize;
use comfy_table::Cell;
use prompt_optimizer_core::{OptimizationRecord, TaskCategory};
use prompt_optimizer_storage::{export_csv, ResultRepository, RunStatistics};
use serde::Serialize;

use crate::cli::{ExportArgs, HistoryArgs};
use crate::context::Context;
use crate::output::{
    format_improvement, format_timestamp, format_uuid_short, new_table, print_block, print_field,
    print_section, score_badge, truncate, TableDisplay,
};

pub async fn list(ctx: &Context, args: HistoryArgs) -> Result<()> {
    let store = ctx.store();

    let category = args
        .category
        .as_deref()
        .map(str::parse::<TaskCategory>)
        .transpose()
        .map_err(|e| anyhow!("{}", e))?;
    let records = store.recent(category, args.limit).await?;

    let rows: Vec<RecordDisplay> = records.into_iter().map(Into::into).collect();
    ctx.output.write_list(
        &rows,
        &["ID", "When", "Category", "Original prompt", "Winner", "Score", "Gain"],
    )
}

pub async fn stats(ctx: &Context) -> Result<()> {
    let statistics = ctx.store().statistics().await?;
    ctx.output.write(&StatsDisplay(statistics))
}

pub async fn export(ctx: &Context, args: ExportArgs) -> Result<()> {
    let records = ctx.store().list().await?;
    let rows = export_csv(&records, &args.path)
        .await
        .with_context(|| format!("Failed to export to {}", args.path.display()))?;

    ctx.output.success(&format!(
        "Exported {} run(s) to {}",
        rows,
        args.path.display()
    ));
    Ok(())
}

pub async fn clear(ctx: &Context, force: bool) -> Result<()> {
    let store = ctx.store();

    if !force {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!("Delete all stored runs in {}?", store.path().display()))
            .default(false)
            .interact()
            .context("Failed to get confirmation (use --force in non-interactive shells)")?;

        if !confirm {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    let removed = store.clear().await?;
    ctx.output.success(&format!("Deleted {} run(s)", removed));
    Ok(())
}

/// Displayable history entry
#[derive(Debug, Serialize)]
#[serde(transparent)]
struct RecordDisplay(OptimizationRecord);

impl From<OptimizationRecord> for RecordDisplay {
    fn from(record: OptimizationRecord) -> Self {
        Self(record)
    }
}

impl TableDisplay for RecordDisplay {
    fn to_row(&self) -> Vec<Cell> {
        let r = &self.0;
        vec![
            Cell::new(format_uuid_short(&r.id)),
            Cell::new(format_timestamp(&r.timestamp)),
            Cell::new(r.category.as_str()),
            Cell::new(truncate(&r.original_prompt, 40)),
            Cell::new(if r.variant_won() {
                format!("variant {}", r.winner_index)
            } else {
                "original".to_string()
            }),
            Cell::new(format!("{:.1}", r.winner_total)),
            Cell::new(format!("{:+.1}", r.improvement)),
        ]
    }

    fn display_single(&self) {
        let r = &self.0;
        print_section("Run");
        print_field("ID", &r.id.to_string());
        print_field("When", &format_timestamp(&r.timestamp));
        print_field("Category", r.category.as_str());
        print_field("Score", &score_badge(r.winner_total));
        print_field("Improvement", &format_improvement(r.improvement));
        print_section("Optimized Prompt");
        print_block(&r.winning_prompt);
    }
}

/// `RunStatistics` with table rendering; serializes transparently.
#[derive(Debug, Serialize)]
#[serde(transparent)]
struct StatsDisplay(RunStatistics);

impl TableDisplay for StatsDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(self.0.total_runs),
            Cell::new(format!("{:.1}", self.0.average_improvement)),
            Cell::new(self.0.variant_wins),
        ]
    }

    fn display_single(&self) {
        let s = &self.0;

        if s.total_runs == 0 {
            println!("{}", "No runs stored yet.".dimmed());
            return;
        }

        print_section("Run Statistics");
        print_field("Total runs", &s.total_runs.to_string());
        print_field(
            "Variant wins",
            &format!("{} ({:.0}%)", s.variant_wins, s.variant_win_rate() * 100.0),
        );
        print_field("Average improvement", &format_improvement(s.average_improvement));
        print_field("Best improvement", &format_improvement(s.best_improvement));
        print_field("Worst improvement", &format_improvement(s.worst_improvement));
        print_field("Median improvement", &format!("{:+.1}", s.improvement.median));
        print_field("Average winner score", &score_badge(s.average_winner_total));

        print_section("Runs per Category");
        let mut table = new_table(&["Category", "Runs"]);
        for (category, count) in &s.category_counts {
            table.add_row(vec![Cell::new(category.display_name()), Cell::new(count)]);
        }
        println!("{table}");

        if let Some(weakest) = s.winner_breakdown.weakest() {
            println!();
            print_field("Weakest metric of winners", &weakest.to_string());
        }
    }
}
