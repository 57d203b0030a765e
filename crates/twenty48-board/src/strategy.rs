//! Move-selection capabilities.
//!
//! A [`Strategy`] takes the current board and answers with the board after
//! its chosen move (before any tile spawns). Answering with the input board
//! means the strategy found nothing to play.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::engine::Move;
use crate::measure::Measure;

pub trait Strategy {
    fn play(&mut self, board: &Board) -> Board;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn play(&mut self, board: &Board) -> Board {
        (**self).play(board)
    }
}

/// Legal directions of `board`, in [`Move::ALL`] order.
fn legal_directions(board: &Board) -> Vec<Move> {
    let legal = board.legal_moves();
    Move::ALL
        .into_iter()
        .zip(legal)
        .filter_map(|(dir, ok)| ok.then_some(dir))
        .collect()
}

/// Plays a uniformly random legal move.
pub struct RandomStrategy<R = StdRng> {
    rng: R,
}

impl<R: Rng> RandomStrategy<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomStrategy<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Strategy for RandomStrategy<R> {
    fn play(&mut self, board: &Board) -> Board {
        match legal_directions(board).choose(&mut self.rng) {
            Some(&dir) => board.shift(dir),
            None => {
                debug!("random strategy: no legal move");
                *board
            }
        }
    }
}

/// One-ply greedy: plays the legal move whose resulting board scores highest.
///
/// Ties go to the earliest direction in [`Move::ALL`].
pub struct GreedyStrategy<M> {
    measure: M,
}

impl<M: Measure> GreedyStrategy<M> {
    pub fn new(measure: M) -> Self {
        Self { measure }
    }

    pub fn measure(&self) -> &M {
        &self.measure
    }
}

impl<M: Measure> Strategy for GreedyStrategy<M> {
    fn play(&mut self, board: &Board) -> Board {
        let mut best: Option<(f64, Board)> = None;
        for dir in legal_directions(board) {
            let next = board.shift(dir);
            let score = self.measure.score(&next);
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, next));
            }
        }
        match best {
            Some((_, next)) => next,
            None => {
                debug!("greedy strategy: no legal move");
                *board
            }
        }
    }
}
