use std::collections::BTreeMap;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use twenty48_board::{Board, Strategy};

use crate::config::{Config, StrategyKind};

// Keeps the strategy's RNG stream apart from the spawn stream of the same game.
const STRATEGY_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub seed: u64,
    pub moves: u64,
    pub score: u64,
    pub max_tile: u32,
    /// Final board in the four-row text format.
    pub board: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub games: usize,
    pub mean_score: f64,
    pub best_score: u64,
    /// Max tile value -> number of games that reached it.
    pub max_tiles: BTreeMap<u32, usize>,
}

impl Summary {
    pub fn from_results(results: &[GameResult]) -> Self {
        let games = results.len();
        let total: u64 = results.iter().map(|r| r.score).sum();
        let mut max_tiles = BTreeMap::new();
        for r in results {
            *max_tiles.entry(r.max_tile).or_insert(0) += 1;
        }
        Summary {
            games,
            mean_score: if games == 0 { 0.0 } else { total as f64 / games as f64 },
            best_score: results.iter().map(|r| r.score).max().unwrap_or(0),
            max_tiles,
        }
    }
}

/// Play one game from an empty board until the strategy has no move or
/// `max_moves` is reached.
pub fn play_game(strategy: &mut dyn Strategy, seed: u64, max_moves: u64) -> Result<GameResult> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = Board::new().spawn(&mut rng)?.spawn(&mut rng)?;
    let mut moves = 0;
    while moves < max_moves {
        let next = strategy.play(&board);
        if next == board {
            break;
        }
        board = next
            .spawn(&mut rng)
            .with_context(|| format!("seed {seed}: strategy answered with a full board"))?;
        moves += 1;
    }
    debug!(
        "seed {seed}: {moves} moves, score {}, stuck={}",
        board.score(),
        board.is_stuck()
    );
    Ok(GameResult {
        seed,
        moves,
        score: board.score(),
        max_tile: board.max_tile(),
        board: board.to_string(),
    })
}

fn play_seeded(kind: StrategyKind, seed: u64, max_moves: u64) -> Result<GameResult> {
    let mut strategy = kind.build(seed ^ STRATEGY_SEED_SALT);
    play_game(strategy.as_mut(), seed, max_moves)
}

/// Play `config.games` independent games in parallel, in seed order.
pub fn run(config: &Config, progress: bool) -> Result<Vec<GameResult>> {
    let kind = config.strategy.kind;
    info!(
        "Playing {} game(s) with {:?}, seeds {}..",
        config.games, kind, config.seed
    );

    let pb = if progress {
        let pb = ProgressBar::new(u64::from(config.games));
        pb.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} games ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let results = (0..u64::from(config.games))
        .into_par_iter()
        .map(|i| {
            let result = play_seeded(kind, config.seed.wrapping_add(i), config.max_moves);
            pb.inc(1);
            result
        })
        .collect::<Result<Vec<_>>>()?;
    pb.finish_and_clear();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use twenty48_board::{FreesMeasure, GreedyStrategy};

    #[test]
    fn games_end_stuck_or_capped() {
        let mut strategy = GreedyStrategy::new(FreesMeasure);
        let result = play_game(&mut strategy, 3, 1_000_000).unwrap();
        let board: Board = result.board.parse().unwrap();
        assert!(board.is_stuck());
        assert!(result.moves > 0);
        assert_eq!(result.score, board.score());
        assert_eq!(result.max_tile, board.max_tile());

        let capped = play_game(&mut strategy, 3, 5).unwrap();
        assert_eq!(capped.moves, 5);
    }

    #[test]
    fn runs_are_deterministic_per_seed() {
        let config = Config {
            games: 6,
            seed: 100,
            strategy: crate::config::StrategyConfig { kind: StrategyKind::Random },
            ..Config::default()
        };
        let a = run(&config, false).unwrap();
        let b = run(&config, false).unwrap();
        assert_eq!(a, b);
        let seeds: Vec<u64> = a.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, (100..106).collect::<Vec<_>>());
    }

    #[test]
    fn summary_aggregates() {
        let result = |score, max_tile| GameResult {
            seed: 0,
            moves: 1,
            score,
            max_tile,
            board: String::new(),
        };
        let summary = Summary::from_results(&[result(100, 64), result(300, 128), result(200, 64)]);
        assert_eq!(summary.games, 3);
        assert_eq!(summary.mean_score, 200.0);
        assert_eq!(summary.best_score, 300);
        assert_eq!(summary.max_tiles.get(&64), Some(&2));
        assert_eq!(summary.max_tiles.get(&128), Some(&1));
        assert_eq!(Summary::from_results(&[]).mean_score, 0.0);
    }
}
