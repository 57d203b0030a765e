//! Array-view facade over [`PackedBoard`].
//!
//! `Board` reads like a plain 16-cell grid: parse it from text, compare it,
//! print it. Every transform still runs on the packed word underneath.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use rand::Rng;

use crate::engine::{self, Move, PackedBoard, CELLS, MAX_EXPONENT};
use crate::error::{BoardError, Result};

/// A 4x4 board of tile exponents plus the changed flag of the last in-place move.
///
/// Equality and hashing only look at the grid.
#[derive(Clone, Copy, Default)]
pub struct Board {
    packed: PackedBoard,
    changed: bool,
}

impl Board {
    /// The empty board.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_packed(packed: PackedBoard) -> Self {
        Board {
            packed,
            changed: false,
        }
    }

    pub fn packed(&self) -> PackedBoard {
        self.packed
    }

    /// Build from 16 row-major exponents.
    pub fn from_grid(grid: &[u8; CELLS]) -> Result<Self> {
        PackedBoard::from_cells(grid).map(Self::from_packed)
    }

    /// The 16 row-major exponents.
    pub fn grid(&self) -> [u8; CELLS] {
        self.packed.cells()
    }

    /// Exponent at (`row`, `col`).
    pub fn get(&self, row: usize, col: usize) -> u8 {
        debug_assert!(row < 4 && col < 4);
        self.packed.cell(4 * row + col)
    }

    /// Parse four rows of four characters: `.` for empty, a hex digit for an exponent.
    ///
    /// ```
    /// use twenty48_board::Board;
    /// let b = Board::parse(["1...", "....", "..a.", "...F"])?;
    /// assert_eq!(b.get(2, 2), 10);
    /// # Ok::<(), twenty48_board::BoardError>(())
    /// ```
    pub fn parse(rows: [&str; 4]) -> Result<Self> {
        let mut grid = [0u8; CELLS];
        for (r, row) in rows.iter().enumerate() {
            let row = row.trim();
            if row.chars().count() != 4 {
                return Err(BoardError::Parse(format!(
                    "row {r} must have 4 cells, got {row:?}"
                )));
            }
            for (c, ch) in row.chars().enumerate() {
                grid[4 * r + c] = parse_cell(ch).ok_or_else(|| {
                    BoardError::Parse(format!("bad cell {ch:?} at row {r}, column {c}"))
                })?;
            }
        }
        Self::from_grid(&grid)
    }

    /// Whether the last [`Board::unsafe_move`] altered the board.
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// The board after sliding/merging towards `dir`.
    pub fn shift(&self, dir: Move) -> Board {
        Self::from_packed(self.packed.shift(dir))
    }

    pub fn can_move(&self, dir: Move) -> bool {
        self.packed.can_move(dir)
    }

    /// Legality of each direction, indexed like [`Move::ALL`].
    pub fn legal_moves(&self) -> [bool; 4] {
        self.packed.legal_moves()
    }

    /// True when no direction has a legal move.
    pub fn is_stuck(&self) -> bool {
        self.packed.is_stuck()
    }

    pub fn is_full(&self) -> bool {
        self.packed.is_full()
    }

    pub fn free_count(&self) -> u32 {
        self.packed.free_count()
    }

    /// Copy of this board with a random 2/4 tile on a random empty cell.
    pub fn spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Board> {
        self.packed.spawn(rng).map(Self::from_packed)
    }

    /// Copy of this board with the exponent from `pick` on a random empty cell.
    ///
    /// ```
    /// use twenty48_board::{Board, BoardError};
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(0);
    /// let b = Board::parse(["123.", "4567", "89AB", "CDEF"])?;
    /// let spawned = b.spawn_with(&mut rng, |_| 2)?;
    /// assert_eq!(spawned, Board::parse(["1232", "4567", "89AB", "CDEF"])?);
    /// assert_eq!(spawned.spawn_with(&mut rng, |_| 2), Err(BoardError::BoardFull));
    /// # Ok::<(), BoardError>(())
    /// ```
    pub fn spawn_with<R, F>(&self, rng: &mut R, pick: F) -> Result<Board>
    where
        R: Rng + ?Sized,
        F: FnOnce(&mut R) -> u8,
    {
        self.packed.spawn_with(rng, pick).map(Self::from_packed)
    }

    /// Move towards `dir`, then spawn a tile if the move changed anything.
    pub fn make_move<R: Rng + ?Sized>(&self, dir: Move, rng: &mut R) -> Board {
        let mut next = *self;
        next.unsafe_move(dir);
        if next.changed {
            // A changed move always leaves at least one empty cell.
            next.unsafe_spawn(rng);
        }
        next
    }

    /// Move in place, recording whether the board changed in [`Board::changed`].
    ///
    /// Unchecked fast path for search loops: no legality test happens up front.
    pub fn unsafe_move(&mut self, dir: Move) {
        let (moved, changed) = self.packed.shift_flagged(dir);
        self.packed = moved;
        self.changed = changed;
    }

    /// Spawn a random tile in place.
    ///
    /// The caller guarantees an empty cell exists. Debug builds assert it;
    /// release builds leave a full board untouched.
    pub fn unsafe_spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.unsafe_spawn_with(rng, engine::random_tile);
    }

    /// Spawn the exponent returned by `pick` in place.
    ///
    /// Same contract as [`Board::unsafe_spawn`]; a pick outside 1..=15 is
    /// asserted in debug builds and ignored in release builds.
    pub fn unsafe_spawn_with<R, F>(&mut self, rng: &mut R, pick: F)
    where
        R: Rng + ?Sized,
        F: FnOnce(&mut R) -> u8,
    {
        let free = self.packed.free_count();
        debug_assert!(free > 0, "unsafe_spawn on a full board");
        if free == 0 {
            return;
        }
        let nth = rng.gen_range(0..free);
        let tile = pick(rng);
        debug_assert!((1..=MAX_EXPONENT).contains(&tile), "bad tile exponent {tile}");
        if tile == 0 || tile > MAX_EXPONENT {
            return;
        }
        self.packed = engine::place_on_empty(self.packed, nth, tile);
    }

    /// Classic 2048 score of the tiles on the board.
    pub fn score(&self) -> u64 {
        self.packed.score()
    }

    /// Largest tile value on the board (e.g. 2048), 0 when empty.
    pub fn max_tile(&self) -> u32 {
        match self.packed.max_exponent() {
            0 => 0,
            e => 1 << e,
        }
    }

    /// Iterate over tile exponents in row-major order.
    pub fn tiles(&self) -> engine::TilesIter {
        self.packed.tiles()
    }
}

fn parse_cell(ch: char) -> Option<u8> {
    match ch {
        '.' => Some(0),
        _ => ch
            .to_digit(16)
            .map(|d| d as u8)
            .filter(|&d| d <= MAX_EXPONENT),
    }
}

fn format_cell(v: u8) -> char {
    match v {
        0 => '.',
        _ => char::from_digit(u32::from(v), 16).map_or('?', |c| c.to_ascii_uppercase()),
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.packed == other.packed
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.packed.hash(state);
    }
}

impl From<PackedBoard> for Board {
    fn from(packed: PackedBoard) -> Self {
        Board::from_packed(packed)
    }
}

impl From<Board> for PackedBoard {
    fn from(board: Board) -> Self {
        board.packed
    }
}

/// Four whitespace-separated rows in the [`Board::parse`] format.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        let rows: Vec<&str> = s.split_whitespace().collect();
        let rows: [&str; 4] = rows.try_into().map_err(|rows: Vec<&str>| {
            BoardError::Parse(format!("expected 4 rows, got {}", rows.len()))
        })?;
        Board::parse(rows)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.tiles().enumerate() {
            if i > 0 && i % 4 == 0 {
                writeln!(f)?;
            }
            write!(f, "{}", format_cell(v))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Board [grid=")?;
        for (i, v) in self.tiles().enumerate() {
            write!(f, "{}", format_cell(v))?;
            if i % 4 == 3 {
                f.write_str(" ")?;
            }
        }
        f.write_str("]")
    }
}
