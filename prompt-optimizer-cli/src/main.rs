//! `prompt-optimizer` command-line entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;
mod context;
mod output;

use cli::{Cli, Commands};
use context::Context;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = match Context::new(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&ctx, cli.command).await {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Optimize(args) => commands::optimize::execute(ctx, args).await,
        Commands::Score(args) => commands::score::execute(ctx, args).await,
        Commands::Profiles => commands::profiles::execute(ctx).await,
        Commands::History(args) => commands::history::list(ctx, args).await,
        Commands::Stats => commands::history::stats(ctx).await,
        Commands::Export(args) => commands::history::export(ctx, args).await,
        Commands::Clear { force } => commands::history::clear(ctx, force).await,
        Commands::Config(cmd) => commands::config::execute(ctx, cmd).await,
    }
}

/// Logs go to stderr so stdout stays parseable in json/yaml mode.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "prompt_optimizer=debug"
    } else {
        "prompt_optimizer=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
