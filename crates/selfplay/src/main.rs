mod config;
mod game;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use serde::Serialize;

use config::{Config, StrategyKind};
use game::{GameResult, Summary};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Play batches of 2048 games on the packed board engine"
)]
struct Cli {
    /// Path to a TOML configuration file (defaults apply when omitted)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of games (overrides the config)
    #[arg(long, value_name = "N")]
    games: Option<u32>,

    /// Base seed; game i uses seed + i (overrides the config)
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Move-selection strategy (overrides the config)
    #[arg(long, value_enum)]
    strategy: Option<StrategyKind>,

    /// Hide the progress bar
    #[arg(long)]
    quiet: bool,
}

#[derive(Serialize)]
struct ResultsFile<'a> {
    summary: &'a Summary,
    games: &'a [GameResult],
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Using configuration file: {}", path.display());
            Config::from_toml(path)?
        }
        None => Config::default(),
    };
    if let Some(games) = cli.games {
        config.games = games;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(kind) = cli.strategy {
        config.strategy.kind = kind;
    }
    if config.games == 0 {
        warn!("games = 0; nothing to play");
    }
    twenty48_board::engine::init();

    let results = game::run(&config, !cli.quiet)?;
    let summary = Summary::from_results(&results);
    info!(
        "Completed {} game(s): mean score {:.1}, best score {}",
        summary.games, summary.mean_score, summary.best_score
    );
    for (tile, count) in &summary.max_tiles {
        info!("  max tile {tile:>6}: {count} game(s)");
    }

    if let Some(path) = &config.report.results_file {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(
            BufWriter::new(file),
            &ResultsFile {
                summary: &summary,
                games: &results,
            },
        )
        .with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote results to {}", path.display());
    }
    Ok(())
}
