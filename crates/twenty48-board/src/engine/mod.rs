//! Engine module: packed 4x4 board, bitwise geometry and move ops, and the
//! precomputed line tables behind them.
//!
//! - `PackedBoard` is the packed state with the full operation set as methods.
//! - Free functions mirror the methods when convenient (e.g., `shift`).
//! - Every direction is a merge-left wrapped in `mirror`/`transpose`.

mod ops;
pub mod state;
mod tables;

pub use state::{unpack_into, Move, PackedBoard, TilesIter, CELLS, MAX_EXPONENT};

pub use ops::{
    can_move, free_count, get_score, is_stuck, legal_moves, merge_left, mirror, random_tile,
    shift, shift_code, shift_flagged, spawn_with, transpose,
};

pub(crate) use ops::place_on_empty;

/// Build the line tables now instead of on the first move.
/// Safe to call multiple times.
pub fn init() {
    tables::init();
}
