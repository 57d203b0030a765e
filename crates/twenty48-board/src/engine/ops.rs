use rand::Rng;

use super::state::{BoardRaw, Line, Move, PackedBoard, Score, MAX_EXPONENT};
use super::tables::{get_line_entry, get_score_entry, stores};
use crate::error::{BoardError, Result};

const ROW_MASK: BoardRaw = 0xffff;
/// Low bit of every nibble.
const NIBBLE_LSB: BoardRaw = 0x1111_1111_1111_1111;
/// Low bit of every cell that has a right-hand neighbour in its row (columns 0..=2).
const HAS_RIGHT_NEIGHBOUR: BoardRaw = 0x1110_1110_1110_1110;

/// Reverse the four cells of every row.
pub fn mirror(board: PackedBoard) -> PackedBoard {
    let x = board.0;
    let x = ((x << 4) & 0xf0f0_f0f0_f0f0_f0f0) | ((x >> 4) & 0x0f0f_0f0f_0f0f_0f0f);
    PackedBoard(((x << 8) & 0xff00_ff00_ff00_ff00) | ((x >> 8) & 0x00ff_00ff_00ff_00ff))
}

// Credit to Nneonneo
pub fn transpose(board: PackedBoard) -> PackedBoard {
    let x = board.0;
    let a1 = x & 0xF0F00F0FF0F00F0F;
    let a2 = x & 0x0000F0F00000F0F0;
    let a3 = x & 0x0F0F00000F0F0000;
    let a = a1 | (a2 << 12) | (a3 >> 12);
    let b1 = a & 0xFF00FF0000FF00FF;
    let b2 = a & 0x00FF00FF00000000;
    let b3 = a & 0x00000000FF00FF00;
    PackedBoard(b1 | (b2 >> 24) | (b3 << 24))
}

#[inline]
fn extract_line(board: BoardRaw, line_idx: u32) -> Line {
    ((board >> ((3 - line_idx) * 16)) & ROW_MASK) as Line
}

/// Merge every row towards column 0.
pub fn merge_left(board: PackedBoard) -> (PackedBoard, bool) {
    let table: &[Line] = &stores().merge_left;
    let res = (0..4).fold(0, |new_board, row_idx| {
        let row_val = extract_line(board.0, row_idx);
        let new_row_val = BoardRaw::from(get_line_entry(table, row_val));
        new_board | (new_row_val << (48 - (16 * row_idx)))
    });
    (PackedBoard(res), res != board.0)
}

/// Slide/merge tiles in the given direction, reporting whether anything moved.
pub fn shift_flagged(board: PackedBoard, direction: Move) -> (PackedBoard, bool) {
    match direction {
        Move::Left => merge_left(board),
        Move::Right => {
            let (moved, changed) = merge_left(mirror(board));
            (mirror(moved), changed)
        }
        Move::Up => {
            let (moved, changed) = merge_left(transpose(board));
            (transpose(moved), changed)
        }
        Move::Down => {
            let (moved, changed) = merge_left(mirror(transpose(board)));
            (transpose(mirror(moved)), changed)
        }
    }
}

/// Slide/merge tiles in the given direction. No randomness.
pub fn shift(board: PackedBoard, direction: Move) -> PackedBoard {
    shift_flagged(board, direction).0
}

/// Shift by raw direction code; unknown codes return the zero board.
pub fn shift_code(board: PackedBoard, code: u8) -> PackedBoard {
    Move::try_from(code).map_or(PackedBoard::EMPTY, |dir| shift(board, dir))
}

/// Low nibble bit set for every non-zero cell.
#[inline]
fn occupied(x: BoardRaw) -> BoardRaw {
    (x | (x >> 1) | (x >> 2) | (x >> 3)) & NIBBLE_LSB
}

/// Low nibble bit set for every cell holding [`MAX_EXPONENT`].
#[inline]
fn capped(x: BoardRaw) -> BoardRaw {
    x & (x >> 1) & (x >> 2) & (x >> 3) & NIBBLE_LSB
}

/// A row changes under merge-left iff some cell is empty with an occupied
/// right neighbour, or two equal mergeable tiles sit side by side.
fn can_merge_left(x: BoardRaw) -> bool {
    let occ = occupied(x);
    let slide = !occ & (occ << 4);
    let same = !occupied(x ^ (x << 4)) & occ & !capped(x);
    (slide | same) & HAS_RIGHT_NEIGHBOUR != 0
}

/// True if moving in `direction` changes the board; the moved board is never built.
pub fn can_move(board: PackedBoard, direction: Move) -> bool {
    match direction {
        Move::Left => can_merge_left(board.0),
        Move::Right => can_merge_left(mirror(board).0),
        Move::Up => can_merge_left(transpose(board).0),
        Move::Down => can_merge_left(mirror(transpose(board)).0),
    }
}

pub fn legal_moves(board: PackedBoard) -> [bool; 4] {
    Move::ALL.map(|dir| can_move(board, dir))
}

/// True if no move in any direction changes the board.
pub fn is_stuck(board: PackedBoard) -> bool {
    !Move::ALL.iter().any(|&dir| can_move(board, dir))
}

// https://stackoverflow.com/questions/38225571/count-number-of-zero-nibbles-in-an-unsigned-64-bit-integer
/// Count the number of zero tiles.
pub fn free_count(board: PackedBoard) -> u32 {
    16 - occupied(board.0).count_ones()
}

/// Draw a tile exponent: 1 (a 2) nine times out of ten, otherwise 2 (a 4).
pub fn random_tile<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    if rng.gen_range(0..10) < 9 {
        1
    } else {
        2
    }
}

/// Write `tile` into the `nth` empty cell, counting from the bottom-right.
///
/// Leaves the board untouched if there is no such cell.
pub(crate) fn place_on_empty(board: PackedBoard, nth: u32, tile: u8) -> PackedBoard {
    debug_assert!(nth < free_count(board), "no empty cell #{nth}");
    debug_assert!(tile <= MAX_EXPONENT);
    let mut empty = !occupied(board.0) & NIBBLE_LSB;
    for _ in 0..nth {
        empty &= empty.wrapping_sub(1);
    }
    let slot = empty & empty.wrapping_neg();
    PackedBoard(board.0 | slot * BoardRaw::from(tile))
}

/// Pick a uniformly random empty cell and fill it with the exponent `pick` returns.
pub fn spawn_with<R, F>(board: PackedBoard, rng: &mut R, pick: F) -> Result<PackedBoard>
where
    R: Rng + ?Sized,
    F: FnOnce(&mut R) -> u8,
{
    let free = free_count(board);
    if free == 0 {
        return Err(BoardError::BoardFull);
    }
    let nth = rng.gen_range(0..free);
    let tile = pick(rng);
    if tile == 0 || tile > MAX_EXPONENT {
        return Err(BoardError::InvalidTile(tile));
    }
    Ok(place_on_empty(board, nth, tile))
}

pub fn get_score(board: PackedBoard) -> Score {
    (0..4).fold(0, |acc, idx| acc + get_score_entry(extract_line(board.0, idx)))
}
