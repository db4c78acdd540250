//! `config` commands

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::AppConfig;
use crate::context::Context;
use crate::output::OutputFormat;

#[derive(Debug, Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Print the default configuration file path
    Path,
}

pub async fn execute(ctx: &Context, cmd: ConfigCommands) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Show => show(ctx),
        ConfigSubcommand::Path => path(),
    }
}

fn show(ctx: &Context) -> Result<()> {
    let shown = ctx.config.redacted();

    match ctx.output_format {
        OutputFormat::Table => print!("{}", ctx.config.to_redacted_toml()?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&shown)?),
    }
    Ok(())
}

fn path() -> Result<()> {
    match AppConfig::config_path() {
        Some(path) => println!("{}", path.display()),
        None => println!("-"),
    }
    Ok(())
}
