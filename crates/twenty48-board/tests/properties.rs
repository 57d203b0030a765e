//! Property-based tests for the packed board engine.

use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use twenty48_board::{Board, BoardError, Move, PackedBoard};

/// Any 64-bit word is a valid board.
fn arb_board() -> impl Strategy<Value = PackedBoard> {
    any::<u64>().prop_map(PackedBoard::from_raw)
}

/// Sparse boards with small exponents, where merges and slides are common.
fn arb_playable_board() -> impl Strategy<Value = PackedBoard> {
    proptest::array::uniform16(prop_oneof![3 => Just(0u8), 2 => 1u8..4, 1 => 13u8..=15])
        .prop_map(|cells| PackedBoard::from_cells(&cells).unwrap())
}

fn arb_move() -> impl Strategy<Value = Move> {
    prop_oneof![
        Just(Move::Up),
        Just(Move::Down),
        Just(Move::Left),
        Just(Move::Right),
    ]
}

proptest! {
    #[test]
    fn mirror_is_an_involution(b in arb_board()) {
        prop_assert_eq!(b.mirror().mirror(), b);
    }

    #[test]
    fn transpose_is_an_involution(b in arb_board()) {
        prop_assert_eq!(b.transpose().transpose(), b);
    }

    #[test]
    fn transforms_permute_cells(b in arb_board()) {
        let cells = b.cells();
        let mirrored = b.mirror().cells();
        let transposed = b.transpose().cells();
        for r in 0..4 {
            for c in 0..4 {
                prop_assert_eq!(mirrored[4 * r + 3 - c], cells[4 * r + c]);
                prop_assert_eq!(transposed[4 * c + r], cells[4 * r + c]);
            }
        }
    }

    #[test]
    fn can_move_matches_materialized_move(b in arb_playable_board(), dir in arb_move()) {
        prop_assert_eq!(b.can_move(dir), b.shift(dir) != b);
    }

    #[test]
    fn can_move_matches_on_any_word(b in arb_board(), dir in arb_move()) {
        prop_assert_eq!(b.can_move(dir), b.shift(dir) != b);
    }

    #[test]
    fn changed_flag_matches_comparison(b in arb_playable_board(), dir in arb_move()) {
        let (moved, changed) = b.shift_flagged(dir);
        prop_assert_eq!(moved, b.shift(dir));
        prop_assert_eq!(changed, moved != b);
    }

    #[test]
    fn blocked_moves_are_no_ops(b in arb_playable_board(), dir in arb_move()) {
        if !b.can_move(dir) {
            prop_assert_eq!(b.shift(dir), b);
        }
    }

    #[test]
    fn stuck_means_no_direction_moves(b in arb_playable_board()) {
        let any = Move::ALL.iter().any(|&d| b.can_move(d));
        prop_assert_eq!(b.is_stuck(), !any);
    }

    #[test]
    fn full_means_no_free_cells(b in arb_board()) {
        prop_assert_eq!(b.is_full(), b.free_count() == 0);
        let zeros = b.cells().iter().filter(|&&v| v == 0).count() as u32;
        prop_assert_eq!(b.free_count(), zeros);
    }

    #[test]
    fn moves_keep_the_tile_sum(b in arb_playable_board(), dir in arb_move()) {
        // Merges of two 2^v tiles give one 2^(v+1) tile; capped pairs stay apart.
        let sum = |b: PackedBoard| b.tiles().filter(|&v| v > 0).map(|v| 1u64 << v).sum::<u64>();
        prop_assert_eq!(sum(b.shift(dir)), sum(b));
    }

    #[test]
    fn spawn_fills_one_empty_cell(b in arb_playable_board(), seed in any::<u64>(), tile in 1u8..=2) {
        let mut rng = StdRng::seed_from_u64(seed);
        match b.spawn_with(&mut rng, |_| tile) {
            Ok(spawned) => {
                prop_assert_eq!(spawned.free_count() + 1, b.free_count());
                let changed: Vec<usize> = (0..16).filter(|&i| spawned.cell(i) != b.cell(i)).collect();
                prop_assert_eq!(changed.len(), 1);
                prop_assert_eq!(b.cell(changed[0]), 0);
                prop_assert_eq!(spawned.cell(changed[0]), tile);
            }
            Err(err) => {
                prop_assert_eq!(err, BoardError::BoardFull);
                prop_assert!(b.is_full());
            }
        }
    }

    #[test]
    fn facade_agrees_with_packed(b in arb_board(), dir in arb_move()) {
        let board = Board::from_packed(b);
        prop_assert_eq!(board.grid(), b.cells());
        prop_assert_eq!(Board::from_grid(&board.grid()).unwrap(), board);
        prop_assert_eq!(board.shift(dir).packed(), b.shift(dir));
        prop_assert_eq!(board.to_string().parse::<Board>().unwrap(), board);

        let mut in_place = board;
        in_place.unsafe_move(dir);
        prop_assert_eq!(in_place.packed(), b.shift(dir));
        prop_assert_eq!(in_place.changed(), b.can_move(dir));
    }
}
