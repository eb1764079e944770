//! Property-based tests using proptest
//!
//! Invariants that must hold for any walled board and any input sequence:
//! - Exactly one Player, at the coordinate the world reports
//! - Stones and boxes are never created or destroyed
//! - Locks only ever disappear
//! - Without input every board settles, and a settled board is a fixed point

use proptest::prelude::*;

use rockfall::{transform, Direction, RawTile, TileKind, WorldState};

// ============================================================
// Strategies
// ============================================================

/// Interior codes: everything except the player.
const INTERIOR_CODES: [u8; 11] = [0, 0, 0, 1, 2, 4, 5, 6, 7, 8, 9];
const PAIR_TWO_CODES: [u8; 2] = [10, 11];

fn interior_code() -> impl Strategy<Value = u8> {
    prop_oneof![
        8 => prop::sample::select(INTERIOR_CODES.to_vec()),
        1 => prop::sample::select(PAIR_TWO_CODES.to_vec()),
    ]
}

/// A board walled with Unbreakable, random interior, one player.
fn board() -> impl Strategy<Value = WorldState> {
    (3usize..10, 3usize..9)
        .prop_flat_map(|(w, h)| {
            let interior = (w - 2) * (h - 2);
            (
                Just(w),
                Just(h),
                prop::collection::vec(interior_code(), interior),
                0..interior,
            )
        })
        .prop_map(|(w, h, codes, player_at)| {
            let mut raw = vec![vec![RawTile::Unbreakable; w]; h];
            for (i, code) in codes.into_iter().enumerate() {
                let (x, y) = (1 + i % (w - 2), 1 + i / (w - 2));
                raw[y][x] = RawTile::try_from(code).unwrap();
            }
            let (px, py) = (1 + player_at % (w - 2), 1 + player_at / (w - 2));
            raw[py][px] = RawTile::Player;
            WorldState::new(transform(&raw).unwrap()).unwrap()
        })
}

/// Per-tick input batches.
fn input_batches() -> impl Strategy<Value = Vec<Vec<Direction>>> {
    let dir = prop::sample::select(Direction::ALL.to_vec());
    prop::collection::vec(prop::collection::vec(dir, 0..3), 1..40)
}

fn objects(w: &WorldState) -> usize {
    w.grid().count(TileKind::Stone) + w.grid().count(TileKind::Box)
}

fn locks(w: &WorldState) -> usize {
    w.grid().count(TileKind::Lock1) + w.grid().count(TileKind::Lock2)
}

// ============================================================
// Play Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_single_player_at_reported_cell(mut world in board(), batches in input_batches()) {
        for batch in batches {
            for dir in batch {
                world.enqueue(dir);
            }
            world.tick();
            prop_assert!(world.player_consistent(), "player invariant broken at tick {}", world.tick);
            let (px, py) = world.player();
            prop_assert_eq!(world.grid().get(px, py).kind(), TileKind::Player);
        }
    }

    #[test]
    fn prop_objects_are_conserved(mut world in board(), batches in input_batches()) {
        let before = objects(&world);
        for batch in batches {
            for dir in batch {
                world.enqueue(dir);
            }
            world.tick();
            prop_assert_eq!(objects(&world), before);
        }
    }

    #[test]
    fn prop_locks_never_increase(mut world in board(), batches in input_batches()) {
        let mut last = locks(&world);
        for batch in batches {
            for dir in batch {
                world.enqueue(dir);
            }
            world.tick();
            let now = locks(&world);
            prop_assert!(now <= last, "locks grew from {} to {}", last, now);
            last = now;
        }
    }

    #[test]
    fn prop_queue_is_empty_after_tick(mut world in board(), batch in prop::collection::vec(prop::sample::select(Direction::ALL.to_vec()), 0..8)) {
        for dir in batch {
            world.enqueue(dir);
        }
        world.tick();
        prop_assert_eq!(world.pending_inputs(), 0);
    }
}

// ============================================================
// Settling Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_idle_board_settles_to_fixed_point(mut world in board()) {
        let bound = world.width() * world.height() * (world.height() + 2);
        let mut settled = false;
        for _ in 0..bound {
            let before = world.grid().clone();
            world.tick();
            world.drain_events();
            if world.grid() == &before {
                settled = true;
                break;
            }
        }
        prop_assert!(settled, "board did not settle within {} ticks", bound);

        let fixed = world.grid().clone();
        for _ in 0..3 {
            world.tick();
            prop_assert_eq!(world.grid(), &fixed);
        }
        prop_assert!(world.drain_events().is_empty());
    }
}
