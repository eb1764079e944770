/// Gravity for stones and boxes.
///
/// `FallState` is the two-state machine each Stone/Box owns. It is resampled
/// once per tick from the cell directly below, during the map sweep only:
///
/// ┌──────────────────────┬────────────┬──────────────────────────┐
/// │ Cell below            │ New state  │ Effect this tick          │
/// ├──────────────────────┼────────────┼──────────────────────────┤
/// │ Air                   │ Falling    │ drop one row              │
/// │ anything else / edge  │ Resting    │ stay; pushable sideways   │
/// └──────────────────────┴────────────┴──────────────────────────┘

use super::grid::Grid;
use super::tile::{Passage, Tile, TileKind};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FallState {
    Falling,
    Resting,
}

impl FallState {
    /// Transition function: the state implied by the tile below.
    pub fn from_below(below: Tile) -> FallState {
        if below.is_air() { FallState::Falling } else { FallState::Resting }
    }

    pub fn is_falling(self) -> bool {
        self == FallState::Falling
    }

    pub fn is_resting(self) -> bool {
        self == FallState::Resting
    }

    /// Falling objects ignore sideways pushes.
    pub fn horizontal_passage(self) -> Passage {
        match self {
            FallState::Falling => Passage::Refuse,
            FallState::Resting => Passage::Push,
        }
    }
}

/// What a gravity update did to one object.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FallOutcome {
    /// Was resting, now falling; dropped to `y + 1`.
    Started { kind: TileKind },
    /// Already falling; dropped another row.
    Dropped,
    /// Was falling, now resting.
    Landed { kind: TileKind },
    /// Was resting and stays put.
    Still,
}

/// Per-tick gravity for the object at (x, y).
///
/// Returns `None` for tiles without a fall state. The object moves at most
/// one row; whether it keeps falling is decided on the next tick.
pub fn update(grid: &mut Grid, x: usize, y: usize) -> Option<FallOutcome> {
    let mut tile = grid.get(x, y);
    let before = tile.fall_state()?;
    let after = FallState::from_below(grid.tile_at(x as isize, y as isize + 1));

    match after {
        FallState::Falling => tile.fall(),
        FallState::Resting => tile.rest(),
    }

    if after.is_falling() {
        // Below is Air, so y + 1 is inside the grid.
        grid.set(x, y + 1, tile);
        grid.set(x, y, Tile::Air);
    } else {
        grid.set(x, y, tile);
    }

    Some(match (before, after) {
        (FallState::Resting, FallState::Falling) => FallOutcome::Started { kind: tile.kind() },
        (FallState::Falling, FallState::Falling) => FallOutcome::Dropped,
        (FallState::Falling, FallState::Resting) => FallOutcome::Landed { kind: tile.kind() },
        (FallState::Resting, FallState::Resting) => FallOutcome::Still,
    })
}
