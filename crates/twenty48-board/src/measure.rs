//! Board scoring capabilities used by strategies.

use crate::board::Board;

/// Scores a board. Higher is better; the only contract is a finite value.
pub trait Measure {
    fn score(&self, board: &Board) -> f64;
}

impl<F> Measure for F
where
    F: Fn(&Board) -> f64,
{
    fn score(&self, board: &Board) -> f64 {
        self(board)
    }
}

/// Sum of tile values (`2^exponent`) over occupied cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct SumMeasure;

impl Measure for SumMeasure {
    fn score(&self, board: &Board) -> f64 {
        board
            .tiles()
            .filter(|&v| v > 0)
            .map(|v| f64::from(1u32 << v))
            .sum()
    }
}

/// Number of empty cells, 0..=16.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreesMeasure;

impl Measure for FreesMeasure {
    fn score(&self, board: &Board) -> f64 {
        f64::from(board.free_count())
    }
}
