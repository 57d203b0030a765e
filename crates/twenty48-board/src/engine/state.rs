use rand::Rng;
use std::fmt;

use super::ops;
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};

// Internal type aliases for packed representation
pub(crate) type BoardRaw = u64;
pub(crate) type Line = u16;
pub(crate) type Score = u64;

/// Number of cells on the board.
pub const CELLS: usize = 16;

/// Largest exponent a 4-bit cell can hold (tile 32768).
pub const MAX_EXPONENT: u8 = 15;

/// A direction to move/merge tiles.
///
/// Raw codes follow declaration order: `Up = 0`, `Down = 1`, `Left = 2`, `Right = 3`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Every direction, in raw-code order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Raw code of this direction.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Move {
    type Error = BoardError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Move::Up),
            1 => Ok(Move::Down),
            2 => Ok(Move::Left),
            3 => Ok(Move::Right),
            other => Err(BoardError::InvalidDirection(other)),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(name)
    }
}

/// Packed 4x4 board as 16 4-bit exponents in a `u64`.
///
/// Cell `i = 4 * row + col` lives in the nibble at bit `60 - 4 * i`, so row 0
/// occupies the top 16 bits and column 0 is the high nibble of each row.
/// Every operation returns a new value; nothing here mutates in place.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedBoard(pub(crate) BoardRaw);

impl PackedBoard {
    /// A constant empty board (all zeros). Also the sentinel returned by
    /// [`PackedBoard::shift_code`] for unknown direction codes.
    pub const EMPTY: PackedBoard = PackedBoard(0);

    /// Construct a `PackedBoard` from its raw packed representation.
    #[inline]
    pub fn from_raw(raw: BoardRaw) -> Self {
        PackedBoard(raw)
    }

    /// Consume this board, returning the raw packed `u64`.
    #[inline]
    pub fn into_raw(self) -> BoardRaw {
        self.0
    }

    /// Borrow the raw packed `u64` for this board.
    #[inline]
    pub fn raw(&self) -> BoardRaw {
        self.0
    }

    /// Pack 16 row-major exponents, rejecting any value above [`MAX_EXPONENT`].
    pub fn from_cells(cells: &[u8; CELLS]) -> Result<Self> {
        let mut raw: BoardRaw = 0;
        for (index, &value) in cells.iter().enumerate() {
            if value > MAX_EXPONENT {
                return Err(BoardError::InvalidCell { index, value });
            }
            raw = (raw << 4) | BoardRaw::from(value);
        }
        Ok(PackedBoard(raw))
    }

    /// Exponent stored at row-major index `idx` (0 for empty).
    #[inline]
    pub fn cell(self, idx: usize) -> u8 {
        debug_assert!(idx < CELLS);
        ((self.0 >> (60 - 4 * idx)) & 0xf) as u8
    }

    /// Unpack into 16 row-major exponents.
    pub fn cells(self) -> [u8; CELLS] {
        let mut out = [0u8; CELLS];
        for (dst, n) in out.iter_mut().zip(self.tiles()) {
            *dst = n;
        }
        out
    }

    /// Iterate over tile exponents (nibbles) in row-major order.
    /// Returns 0 for empty, 1 for 2, 2 for 4, etc.
    #[inline]
    pub fn tiles(self) -> TilesIter {
        TilesIter { raw: self.0, idx: 0 }
    }

    /// Reverse the cells of every row (column `c` goes to `3 - c`).
    #[inline]
    pub fn mirror(self) -> Self {
        ops::mirror(self)
    }

    /// Swap rows and columns.
    #[inline]
    pub fn transpose(self) -> Self {
        ops::transpose(self)
    }

    /// Merge every row towards column 0, returning the result and whether anything changed.
    #[inline]
    pub fn merge_left(self) -> (Self, bool) {
        ops::merge_left(self)
    }

    /// Return the board resulting from sliding/merging tiles in `dir` (no random insert).
    ///
    /// ```
    /// use twenty48_board::{Move, PackedBoard};
    /// let b = PackedBoard::from_raw(0x0000_0000_0000_1111);
    /// assert_eq!(b.shift(Move::Right), PackedBoard::from_raw(0x0000_0000_0000_0022));
    /// ```
    #[inline]
    pub fn shift(self, dir: Move) -> Self {
        ops::shift(self, dir)
    }

    /// Like [`PackedBoard::shift`], also reporting whether the board changed.
    #[inline]
    pub fn shift_flagged(self, dir: Move) -> (Self, bool) {
        ops::shift_flagged(self, dir)
    }

    /// Shift by raw direction code. Unknown codes yield [`PackedBoard::EMPTY`].
    #[inline]
    pub fn shift_code(self, code: u8) -> Self {
        ops::shift_code(self, code)
    }

    /// True if moving in `dir` would change the board.
    #[inline]
    pub fn can_move(self, dir: Move) -> bool {
        ops::can_move(self, dir)
    }

    /// Legality of each direction, indexed like [`Move::ALL`].
    #[inline]
    pub fn legal_moves(self) -> [bool; 4] {
        ops::legal_moves(self)
    }

    /// Return true if no direction changes the board.
    ///
    /// ```
    /// use twenty48_board::PackedBoard;
    /// // Nothing can slide on an empty board.
    /// assert!(PackedBoard::EMPTY.is_stuck());
    /// ```
    #[inline]
    pub fn is_stuck(self) -> bool {
        ops::is_stuck(self)
    }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn free_count(self) -> u32 {
        ops::free_count(self)
    }

    #[inline]
    pub fn is_full(self) -> bool {
        ops::free_count(self) == 0
    }

    /// Insert a 2 (90%) or 4 (10%) tile into a uniformly chosen empty cell.
    ///
    /// Deterministic example using a seeded RNG:
    /// ```
    /// use twenty48_board::PackedBoard;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let b = PackedBoard::EMPTY.spawn(&mut rng)?.spawn(&mut rng)?;
    /// assert_eq!(b.free_count(), 14);
    /// # Ok::<(), twenty48_board::BoardError>(())
    /// ```
    #[inline]
    pub fn spawn<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Self> {
        ops::spawn_with(self, rng, ops::random_tile)
    }

    /// Insert the exponent returned by `pick` into a uniformly chosen empty cell.
    #[inline]
    pub fn spawn_with<R, F>(self, rng: &mut R, pick: F) -> Result<Self>
    where
        R: Rng + ?Sized,
        F: FnOnce(&mut R) -> u8,
    {
        ops::spawn_with(self, rng, pick)
    }

    /// Classic 2048 score: the sum of every merge needed to build the tiles on the board.
    #[inline]
    pub fn score(self) -> Score {
        ops::get_score(self)
    }

    /// Largest exponent on the board (0 when empty).
    #[inline]
    pub fn max_exponent(self) -> u8 {
        self.tiles().max().unwrap_or(0)
    }
}

impl fmt::Debug for PackedBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackedBoard({:#018x})", self.0)
    }
}

impl From<BoardRaw> for PackedBoard {
    fn from(v: BoardRaw) -> Self {
        PackedBoard::from_raw(v)
    }
}
impl From<PackedBoard> for BoardRaw {
    fn from(b: PackedBoard) -> Self {
        b.into_raw()
    }
}

/// Iterator over board tiles (exponents) in row-major order.
pub struct TilesIter {
    raw: BoardRaw,
    idx: usize,
}

impl Iterator for TilesIter {
    type Item = u8;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= CELLS {
            return None;
        }
        let n = ((self.raw >> (60 - (4 * self.idx))) & 0xf) as u8;
        self.idx += 1;
        Some(n)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = CELLS - self.idx;
        (left, Some(left))
    }
}

impl ExactSizeIterator for TilesIter {}

impl IntoIterator for PackedBoard {
    type Item = u8;
    type IntoIter = TilesIter;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.tiles()
    }
}

/// Unpack boards into exponent rows inside the provided output buffer.
///
/// - `out` must be length = `boards.len() * 16` and will be filled with
///   16 exponents per board (row-major).
/// - If `parallel` is true, uses Rayon to parallelize across cores.
///
/// # Panics
///
/// Panics if `out` has the wrong length.
///
/// ```
/// use twenty48_board::{PackedBoard, engine::unpack_into};
/// let boards = [PackedBoard::from_raw(0x1000_0000_0000_0000), PackedBoard::from_raw(0x2100_0000_0000_0000)];
/// let mut out = vec![0u8; boards.len() * 16];
/// unpack_into(&mut out, &boards, false);
/// assert_eq!(&out[16..18], &[2, 1]);
/// ```
pub fn unpack_into(out: &mut [u8], boards: &[PackedBoard], parallel: bool) {
    assert_eq!(
        out.len(),
        boards.len() * CELLS,
        "out buffer must be N*16 bytes"
    );
    if parallel {
        use rayon::prelude::*;
        out.par_chunks_mut(CELLS)
            .zip(boards.par_iter().copied())
            .for_each(|(dst, b)| dst.copy_from_slice(&b.cells()));
    } else {
        for (dst, b) in out.chunks_mut(CELLS).zip(boards.iter().copied()) {
            dst.copy_from_slice(&b.cells());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_codes_round_trip_through_try_from() {
        for dir in Move::ALL {
            assert_eq!(Move::try_from(dir.code()), Ok(dir));
        }
        assert_eq!(Move::try_from(4), Err(BoardError::InvalidDirection(4)));
        assert_eq!(Move::try_from(99), Err(BoardError::InvalidDirection(99)));
    }

    #[test]
    fn from_cells_matches_cell_accessor() {
        let cells = [1, 2, 3, 4, 0, 0, 0, 5, 0, 0, 0, 6, 15, 0, 0, 7];
        let board = PackedBoard::from_cells(&cells).unwrap();
        assert_eq!(board.raw(), 0x1234_0005_0006_f007);
        for (idx, &v) in cells.iter().enumerate() {
            assert_eq!(board.cell(idx), v);
        }
        assert_eq!(board.cells(), cells);
    }

    #[test]
    fn from_cells_rejects_wide_values() {
        let mut cells = [0u8; CELLS];
        cells[9] = 16;
        assert_eq!(
            PackedBoard::from_cells(&cells),
            Err(BoardError::InvalidCell { index: 9, value: 16 })
        );
    }

    #[test]
    fn max_exponent_and_tiles() {
        let board = PackedBoard::from_raw(0x0123_4567_89ab_cdef);
        assert_eq!(board.max_exponent(), 15);
        assert_eq!(board.tiles().len(), 16);
        assert_eq!(PackedBoard::EMPTY.max_exponent(), 0);
    }

    #[test]
    fn unpack_into_parallel_matches_sequential() {
        let boards: Vec<PackedBoard> = (0..64u64)
            .map(|i| PackedBoard::from_raw(i.wrapping_mul(0x9e37_79b9_7f4a_7c15)))
            .collect();
        let mut seq = vec![0u8; boards.len() * CELLS];
        let mut par = vec![0u8; boards.len() * CELLS];
        unpack_into(&mut seq, &boards, false);
        unpack_into(&mut par, &boards, true);
        assert_eq!(seq, par);
        assert_eq!(&seq[..16], &boards[0].cells());
    }
}
