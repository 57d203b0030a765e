use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use twenty48_board::{FreesMeasure, GreedyStrategy, RandomStrategy, Strategy};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Uniformly random legal move
    Random,
    /// One-ply greedy on the number of empty cells
    GreedyFrees,
}

impl StrategyKind {
    /// Build a fresh strategy instance; `seed` only matters for random play.
    pub fn build(self, seed: u64) -> Box<dyn Strategy + Send> {
        match self {
            StrategyKind::Random => Box::new(RandomStrategy::seeded(seed)),
            StrategyKind::GreedyFrees => Box::new(GreedyStrategy::new(FreesMeasure)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct StrategyConfig {
    pub kind: StrategyKind,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self { kind: StrategyKind::GreedyFrees }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, Default)]
pub struct Report {
    /// Write per-game results and the summary as JSON here.
    #[serde(default)]
    pub results_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Config {
    #[serde(default = "defaults::games")]
    pub games: u32,
    /// Game `i` is seeded with `seed + i`.
    #[serde(default)]
    pub seed: u64,
    /// Safety cap on moves per game.
    #[serde(default = "defaults::max_moves")]
    pub max_moves: u64,

    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub report: Report,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            games: defaults::games(),
            seed: 0,
            max_moves: defaults::max_moves(),
            strategy: StrategyConfig::default(),
            report: Report::default(),
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let cfg: Self =
            toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
        Ok(cfg)
    }
}

mod defaults {
    pub fn games() -> u32 { 16 }
    pub fn max_moves() -> u64 { 1_000_000 }
}
