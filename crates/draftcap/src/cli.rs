// Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Salary-cap auction draft optimizer
#[derive(Debug, Parser)]
#[command(name = "draftcap")]
#[command(about = "Find the best auction roster and what a player is worth to it")]
pub struct Cli {
    /// Config file (defaults to ./config/draftcap.toml, then the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the league's initial budget
    #[arg(short, long)]
    pub budget: Option<f64>,

    /// Print the report as JSON instead of tables
    #[arg(long)]
    pub json: bool,

    /// Skip the bid sweep even if a player is marked `evaluate`
    #[arg(long)]
    pub no_evaluate: bool,
}
