// draftcap entry point.
//
// 1. Initialize tracing (stderr, so stdout carries only the report)
// 2. Parse arguments and load config
// 3. Load auction values and projections
// 4. Solve the optimal roster, then sweep the evaluated player's bid
// 5. Print tables or JSON

use anyhow::Context;
use clap::Parser;
use draftcap::cli::Cli;
use draftcap::{app, config, projections, report};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    let config = config::load_config(cli.config.as_deref()).context("failed to load configuration")?;
    let config = config::with_budget_override(config, cli.budget).context("invalid --budget")?;
    info!(
        "config loaded: ${} budget, {} roster slots",
        config.league.initial_budget,
        config
            .roster
            .capacity_map()
            .map(|c| c.roster_size())
            .unwrap_or_default()
    );

    let players = projections::load_players(&config).context("failed to load player data")?;

    let result = app::run(&config, players, !cli.no_evaluate)?;

    if cli.json {
        println!("{}", report::render_json(&result.as_report())?);
    } else {
        print!("{}", report::render_roster(&result.optimal));
        if let Some(value) = &result.evaluation {
            println!();
            print!("{}", report::render_marginal(value));
        }
    }

    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draftcap=info,draftcap_core=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
