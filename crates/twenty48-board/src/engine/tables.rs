use std::sync::OnceLock;

use super::state::{Line, Score, MAX_EXPONENT};

/// Precomputed lookup tables for all possible 4-tile lines (16-bit packed).
///
/// Merging a row depends only on its 4 nibbles, so every one of the 2^16
/// lines is merged once up front. Right/up/down moves reuse the same
/// merge-left table after mirroring/transposing the board.
///
/// Layout:
/// - `merge_left[i]`: replacement 16-bit line after merging towards column 0.
/// - `score[i]`: sum of tile merge scores for the line.
pub(crate) struct Stores {
    pub(crate) merge_left: Box<[Line]>,
    pub(crate) score: Box<[Score]>,
}

const LINE_TABLE_SIZE: usize = 0x1_0000; // 65,536 possible 16-bit lines

static STORES: OnceLock<Stores> = OnceLock::new();

/// Ensure lookup tables are initialized.
pub fn init() {
    let _ = stores();
}

#[inline(always)]
pub(crate) fn stores() -> &'static Stores {
    STORES.get_or_init(create_stores)
}

fn create_stores() -> Stores {
    let mut merge_left = vec![0 as Line; LINE_TABLE_SIZE];
    let mut score = vec![0 as Score; LINE_TABLE_SIZE];

    for (val, (merged, points)) in merge_left.iter_mut().zip(score.iter_mut()).enumerate() {
        let line = val as Line;
        *merged = merge_line_left(line);
        *points = calc_score(line);
    }

    log::debug!("built {} line merge entries", LINE_TABLE_SIZE);
    Stores {
        merge_left: merge_left.into_boxed_slice(),
        score: score.into_boxed_slice(),
    }
}

#[inline(always)]
pub(crate) fn get_line_entry(table: &[Line], idx: Line) -> Line {
    debug_assert!((idx as usize) < table.len());
    // SAFETY: every table holds LINE_TABLE_SIZE entries, one per possible u16 index.
    unsafe { *table.get_unchecked(idx as usize) }
}

#[inline(always)]
pub(crate) fn get_score_entry(idx: Line) -> Score {
    get_score_line(&stores().score, idx)
}

#[inline(always)]
fn get_score_line(table: &[Score], idx: Line) -> Score {
    debug_assert!((idx as usize) < table.len());
    // SAFETY: see `get_line_entry`.
    unsafe { *table.get_unchecked(idx as usize) }
}

fn line_to_cells(line: Line) -> [u8; 4] {
    [
        (line >> 12) as u8 & 0xf,
        (line >> 8) as u8 & 0xf,
        (line >> 4) as u8 & 0xf,
        line as u8 & 0xf,
    ]
}

fn cells_to_line(cells: [u8; 4]) -> Line {
    cells.iter().fold(0, |acc, &v| (acc << 4) | Line::from(v))
}

/// Compact the non-empty cells, merge equal neighbours once each from the
/// left, and pad with zeros on the right.
///
/// Two [`MAX_EXPONENT`] tiles never merge: the cell has no room for the result.
pub(crate) fn merge_line_left(line: Line) -> Line {
    let mut compacted = [0u8; 4];
    let mut len = 0;
    for v in line_to_cells(line) {
        if v != 0 {
            compacted[len] = v;
            len += 1;
        }
    }

    let mut merged = [0u8; 4];
    let mut out = 0;
    let mut i = 0;
    while i < len {
        let v = compacted[i];
        if i + 1 < len && compacted[i + 1] == v && v < MAX_EXPONENT {
            merged[out] = v + 1;
            i += 2;
        } else {
            merged[out] = v;
            i += 1;
        }
        out += 1;
    }
    debug_assert!(merged.iter().all(|&v| v <= MAX_EXPONENT));
    cells_to_line(merged)
}

// Credit to Nneonneo
pub(crate) fn calc_score(line: Line) -> Score {
    line_to_cells(line)
        .iter()
        .filter(|&&v| v >= 2)
        // the score is the total sum of the tile and all intermediate merged tiles
        .map(|&v| Score::from(v - 1) * (1 << v))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_merge_line_left() {
        assert_eq!(merge_line_left(0x0000), 0x0000);
        assert_eq!(merge_line_left(0x1212), 0x1212);
        assert_eq!(merge_line_left(0x1122), 0x2300);
        assert_eq!(merge_line_left(0x1001), 0x2000);
        assert_eq!(merge_line_left(0x0002), 0x2000);
        assert_eq!(merge_line_left(0x2020), 0x3000);
        assert_eq!(merge_line_left(0x1332), 0x1420);
        assert_eq!(merge_line_left(0x1002), 0x1200);
    }

    #[test]
    fn merges_at_most_once_per_tile() {
        // Three equal tiles: the leftmost pair merges, the third only slides.
        assert_eq!(merge_line_left(0x0222), 0x3200);
        // Four equal tiles: two independent merges, no cascade into a 3.
        assert_eq!(merge_line_left(0x1111), 0x2200);
        assert_eq!(merge_line_left(0x2211), 0x3200);
    }

    #[test]
    fn capped_tiles_do_not_merge() {
        assert_eq!(merge_line_left(0xff00), 0xff00);
        assert_eq!(merge_line_left(0x0f0f), 0xff00);
        assert_eq!(merge_line_left(0xff11), 0xff20);
        assert_eq!(merge_line_left(0xeeff), 0xfff0);
    }

    #[test]
    fn it_calc_score() {
        assert_eq!(calc_score(0x0000), 0);
        assert_eq!(calc_score(0x1100), 0);
        assert_eq!(calc_score(0x2000), 4);
        assert_eq!(calc_score(0x3200), 16 + 4);
    }

    #[test]
    fn tables_cover_every_line() {
        let s = stores();
        assert_eq!(s.merge_left.len(), LINE_TABLE_SIZE);
        assert_eq!(s.score.len(), LINE_TABLE_SIZE);
        assert_eq!(get_line_entry(&s.merge_left, 0x1111), 0x2200);
        assert_eq!(get_score_entry(0x3000), 16);
    }
}
