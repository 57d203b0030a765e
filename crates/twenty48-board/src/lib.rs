//! Packed 4x4 sliding-tile board engine.
//!
//! The whole board is one `u64` of sixteen 4-bit tile exponents. Moves are a
//! single merge-left table pass wrapped in bitwise `mirror`/`transpose`, and
//! legality, free-cell counting and spawning are all mask arithmetic.
//!
//! - [`PackedBoard`] is the raw engine value.
//! - [`Board`] is the grid-shaped facade with parsing, formatting and the
//!   unchecked in-place fast path.
//! - [`Measure`] and [`Strategy`] are the scoring and move-selection seams.
//!
//! ```
//! use twenty48_board::{Board, Move};
//! let b = Board::parse(["....", "....", "....", "1111"])?;
//! assert_eq!(b.shift(Move::Right), Board::parse(["....", "....", "....", "..22"])?);
//! # Ok::<(), twenty48_board::BoardError>(())
//! ```

pub mod board;
pub mod engine;
mod error;
pub mod measure;
pub mod strategy;

pub use board::Board;
pub use engine::{Move, PackedBoard};
pub use error::{BoardError, Result};
pub use measure::{FreesMeasure, Measure, SumMeasure};
pub use strategy::{GreedyStrategy, RandomStrategy, Strategy};
