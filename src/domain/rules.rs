/// Move rules, truth-table driven.
///
/// Pure functions over the grid: they decide what a player move *would* do
/// without performing it. `sim::step` applies the decision.
///
/// ## Horizontal move (dx = ±1), target T = (px+dx, py)
/// ┌────────────────────────────────────────────┬──────────────┐
/// │ Condition (first match wins)                │ Outcome      │
/// ├────────────────────────────────────────────┼──────────────┤
/// │ T is edible (Air, Flux)                     │ Walk         │
/// │ T pushable, Resting, push rule holds        │ Push         │
/// │ T pushable otherwise                        │ Blocked      │
/// │ T is Key1 / Key2                            │ Unlock       │
/// │ Otherwise (wall, lock, off-grid)            │ Blocked      │
/// └────────────────────────────────────────────┴──────────────┘
///
/// ## Vertical move (dy = ±1)
/// Same table without the push rows: Stone and Box refuse vertical entry.
///
/// ## Push rule, object at (x, y) pushed by dx
/// ┌────────────────────────────┬──────────┐
/// │ (x+dx, y)   is Air          │ required │
/// │ (x+dx, y+1) is not Air      │ required │
/// └────────────────────────────┴──────────┘
/// Push depth is one: an object never pushes another object.

use super::grid::Grid;
use super::tile::{Lock, Passage};

/// Decided outcome of one player move.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Move {
    Walk { to: (usize, usize) },
    /// Object at `from` goes to `to`; the player then takes `from`.
    Push { from: (usize, usize), to: (usize, usize) },
    /// Dissolve every matching lock, then walk onto the key at `to`.
    Unlock { lock: Lock, to: (usize, usize) },
    Blocked,
}

/// Can the object at (x, y) be pushed one cell by `dx`?
pub fn push_allowed(grid: &Grid, x: isize, y: isize, dx: isize) -> bool {
    grid.tile_at(x + dx, y).is_air() && !grid.tile_at(x + dx, y + 1).is_air()
}

pub fn resolve_horizontal(grid: &Grid, player: (usize, usize), dx: isize) -> Move {
    let (px, py) = (player.0 as isize, player.1 as isize);
    let (tx, ty) = (px + dx, py);
    // Off-grid targets read as Unbreakable and end up Blocked, so the casts
    // below only ever see in-bounds coordinates.
    match grid.tile_at(tx, ty).horizontal_passage() {
        Passage::Grant => Move::Walk { to: (tx as usize, ty as usize) },
        Passage::Push if push_allowed(grid, tx, ty, dx) => Move::Push {
            from: (tx as usize, ty as usize),
            to: ((tx + dx) as usize, ty as usize),
        },
        Passage::Push | Passage::Refuse => Move::Blocked,
        Passage::Unlock(lock) => Move::Unlock { lock, to: (tx as usize, ty as usize) },
    }
}

pub fn resolve_vertical(grid: &Grid, player: (usize, usize), dy: isize) -> Move {
    let (px, py) = (player.0 as isize, player.1 as isize);
    let (tx, ty) = (px, py + dy);
    match grid.tile_at(tx, ty).vertical_passage() {
        Passage::Grant => Move::Walk { to: (tx as usize, ty as usize) },
        Passage::Unlock(lock) => Move::Unlock { lock, to: (tx as usize, ty as usize) },
        Passage::Push | Passage::Refuse => Move::Blocked,
    }
}
