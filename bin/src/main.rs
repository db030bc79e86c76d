//! CLI for the player-impact scoring library.
//!
//! This binary loads a season file, scores it, and prints per-position
//! rankings and head-to-head comparisons for one league.

mod render;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use player_impact::{
    DEFAULT_TOP_N, ImpactDashboard, PipelineConfig, Position, PositionRanking,
};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "player-impact")]
#[command(about = "Per-position impact scores for football players", long_about = None)]
#[command(version)]
struct Cli {
    /// Season statistics CSV (overrides the configured data path)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Configuration file (defaults to ./impact.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List the position profiles (features and weights)
    Profiles,
    /// List the leagues available for selection
    Leagues,
    /// Show the best players of a league, per position
    Top {
        /// League to rank
        #[arg(long)]
        league: String,
        /// Restrict to one position (attacker, midfielder, defender)
        #[arg(long)]
        position: Option<Position>,
        /// Number of players per position
        #[arg(short, long, default_value_t = DEFAULT_TOP_N)]
        n: usize,
    },
    /// List the players of a league available for comparison
    Players {
        /// League to list
        #[arg(long)]
        league: String,
    },
    /// Compare two players of the same league side by side
    Compare {
        /// League both players play in
        #[arg(long)]
        league: String,
        /// First player
        first: String,
        /// Second player
        second: String,
    },
    /// Write the full scored table as CSV
    Export {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut config =
        PipelineConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    match cli.command {
        Commands::Profiles => render::profiles(&config.profile_set()?, cli.format),
        Commands::Leagues => render::leagues(&config.leagues, cli.format),
        Commands::Top {
            league,
            position,
            n,
        } => show_top(config, &league, position, n, cli.format),
        Commands::Players { league } => {
            let mut dashboard = open(config)?;
            let table = dashboard.scored_table(&league)?;
            render::players(&dashboard.players(&table)?, cli.format)
        }
        Commands::Compare {
            league,
            first,
            second,
        } => compare(config, &league, &first, &second, cli.format),
        Commands::Export { output } => export(config, &output),
    }
}

/// Install the stderr log subscriber, filtered by `RUST_LOG`.
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "player_impact=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open(config: PipelineConfig) -> anyhow::Result<ImpactDashboard> {
    let path = config.data_path.clone();
    ImpactDashboard::open(config)
        .with_context(|| format!("failed to build scores from {}", path.display()))
}

/// Rankings for one position, or for all of them.
fn show_top(
    config: PipelineConfig,
    league: &str,
    position: Option<Position>,
    n: usize,
    format: Format,
) -> anyhow::Result<()> {
    let mut dashboard = open(config)?;

    let rankings = match position {
        Some(position) => {
            let table = dashboard.scored_table(league)?;
            let top = dashboard.top_n(&table, position, n)?;
            vec![PositionRanking {
                position,
                players: dashboard.cards(&top)?,
            }]
        }
        None => dashboard.top_by_position(league, n)?,
    };

    render::rankings(league, &rankings, format)
}

/// Side-by-side comparison; an unknown player prints a placeholder.
fn compare(
    config: PipelineConfig,
    league: &str,
    first: &str,
    second: &str,
    format: Format,
) -> anyhow::Result<()> {
    let mut dashboard = open(config)?;
    let table = dashboard.scored_table(league)?;

    match dashboard.comparison(&table, first, second) {
        Ok(comparison) => render::comparison(&comparison, format),
        Err(err) if err.is_recoverable() => {
            tracing::warn!(%err, "comparison unavailable");
            render::placeholder(&err.to_string(), format)
        }
        Err(err) => Err(err.into()),
    }
}

/// Write every scored row to `output`.
fn export(config: PipelineConfig, output: &Path) -> anyhow::Result<()> {
    let mut dashboard = open(config)?;
    let mut scored = dashboard.scored()?;

    let mut file = std::fs::File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut scored)
        .with_context(|| format!("failed to write {}", output.display()))?;

    tracing::info!(rows = scored.height(), path = %output.display(), "exported scored table");
    Ok(())
}
