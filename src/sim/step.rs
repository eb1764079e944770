/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Input resolution: every queued move, oldest first, each on the grid
///      left by the previous one
///   2. Gravity sweep: bottom row to top row, left to right within a row
///
/// Input strictly precedes gravity, so a push is judged against the fall
/// state sampled on the previous tick. The bottom-up sweep means an object
/// that just dropped into row y+1 is never visited again this tick.

use crate::domain::fall::{self, FallOutcome};
use crate::domain::rules::{self, Move};
use super::event::GameEvent;
use super::queue::Direction;
use super::world::WorldState;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState) -> Vec<GameEvent> {
    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    handle_input(world, &mut events);
    update_map(world, &mut events);

    debug_assert!(world.player_consistent(), "player invariant broken at tick {}", world.tick);
    events
}

// ══════════════════════════════════════════════════════════════
// Input
// ══════════════════════════════════════════════════════════════

fn handle_input(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    while let Some(dir) = world.inputs.pop() {
        apply_move(world, dir, events);
    }
}

fn apply_move(world: &mut WorldState, dir: Direction, events: &mut Vec<GameEvent>) {
    let (dx, dy) = dir.delta();
    let decided = if dir.is_horizontal() {
        rules::resolve_horizontal(&world.grid, world.player, dx)
    } else {
        rules::resolve_vertical(&world.grid, world.player, dy)
    };

    match decided {
        Move::Walk { to: (x, y) } => {
            world.move_to_tile(x, y);
            events.push(GameEvent::PlayerMoved { x, y });
        }
        Move::Push { from: (fx, fy), to: (tx, ty) } => {
            let object = world.grid.get(fx, fy);
            world.grid.set(tx, ty, object);
            world.move_to_tile(fx, fy);
            events.push(GameEvent::ObjectPushed { kind: object.kind(), x: tx, y: ty });
            events.push(GameEvent::PlayerMoved { x: fx, y: fy });
        }
        Move::Unlock { lock, to: (x, y) } => {
            let count = world.grid.dissolve(lock.lock_kind());
            world.move_to_tile(x, y);
            events.push(GameEvent::LocksOpened { lock, count });
            events.push(GameEvent::PlayerMoved { x, y });
        }
        Move::Blocked => events.push(GameEvent::MoveBlocked { dir }),
    }
}

// ══════════════════════════════════════════════════════════════
// Gravity sweep
// ══════════════════════════════════════════════════════════════

fn update_map(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let (w, h) = (world.grid.width(), world.grid.height());
    for y in (0..h).rev() {
        for x in 0..w {
            update_tile(world, x, y, events);
        }
    }
}

fn update_tile(world: &mut WorldState, x: usize, y: usize, events: &mut Vec<GameEvent>) {
    match fall::update(&mut world.grid, x, y) {
        Some(FallOutcome::Started { kind }) => {
            events.push(GameEvent::FallStarted { kind, x, y });
        }
        Some(FallOutcome::Landed { kind }) => {
            events.push(GameEvent::Landed { kind, x, y });
        }
        Some(FallOutcome::Dropped) | Some(FallOutcome::Still) | None => {}
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
