/// WorldState: the complete state of a running level.
///
/// ## Ownership
///
/// The world exclusively owns the grid, the player coordinate and the input
/// queue. They are mutated only inside `tick()`, which runs to completion
/// before the next one starts; no locking is involved.
///
/// ## Player invariant
///
/// Exactly one cell holds `Player`, and it is the cell at `player`. Only
/// `move_to_tile` relocates the player, and it rewrites both cells and the
/// coordinate together.
///
/// ## Tick
///
///   1. drain the input queue, applying each move to the current grid
///   2. sweep gravity bottom row to top row, left to right
///
/// Rendering reads `cells()` / `player()` between ticks.

use crate::domain::grid::Grid;
use crate::domain::tile::{Tile, TileKind};
use super::event::GameEvent;
use super::level::{Level, LevelError};
use super::queue::{Direction, InputQueue};
use super::step;

#[derive(Clone, Debug)]
pub struct WorldState {
    // ── Grid layers ──
    /// Grid as loaded. Never mutated; `restart` copies it back.
    pub(crate) initial: Grid,
    /// Live grid.
    pub(crate) grid: Grid,

    // ── Player ──
    pub(crate) player: (usize, usize),

    // ── Input / output ──
    pub(crate) inputs: InputQueue,
    /// Last tick's events only.
    pub(crate) events: Vec<GameEvent>,

    // ── Meta ──
    pub level_name: String,
    pub tick: u64,
}

// ── Construction ──

impl WorldState {
    /// Start a world on `grid`. The grid must contain exactly one Player.
    pub fn new(grid: Grid) -> Result<Self, LevelError> {
        let player = find_single_player(&grid)?;
        Ok(WorldState {
            initial: grid.clone(),
            grid,
            player,
            inputs: InputQueue::new(),
            events: Vec::new(),
            level_name: String::new(),
            tick: 0,
        })
    }

    pub fn from_level(level: Level) -> Result<Self, LevelError> {
        let mut world = WorldState::new(level.grid)?;
        world.level_name = level.name;
        Ok(world)
    }

    /// Back to the grid the world was created with. Pending input is dropped.
    pub fn restart(&mut self) {
        self.grid = self.initial.clone();
        // `initial` passed `find_single_player` in `new`.
        self.player = self.grid.find(TileKind::Player).unwrap_or(self.player);
        self.inputs.clear();
        self.events.clear();
        self.tick = 0;
        tracing::info!(level = %self.level_name, "level restarted");
    }
}

// ── Driver API ──

impl WorldState {
    /// Queue a move for the next tick.
    pub fn enqueue(&mut self, dir: Direction) {
        self.inputs.push(dir);
    }

    pub fn pending_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Advance one tick: drain inputs, then apply gravity.
    /// Replaces the events held from the previous tick.
    pub fn tick(&mut self) {
        self.events = step::step(self);
    }

    /// Events of the last tick. Empty until the next tick once drained.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

// ── Render sink ──

impl WorldState {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Every cell as (x, y, kind), row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, TileKind)> + '_ {
        self.grid.cells().map(|(x, y, t)| (x, y, t.kind()))
    }

    pub fn player(&self) -> (usize, usize) {
        self.player
    }
}

// ── Player relocation ──

impl WorldState {
    /// Move the player to (x, y): old cell becomes Air, new cell Player.
    pub(crate) fn move_to_tile(&mut self, x: usize, y: usize) {
        let (px, py) = self.player;
        assert!((x, y) != (px, py), "player relocated onto its own cell ({x}, {y})");
        self.grid.set(px, py, Tile::Air);
        self.grid.set(x, y, Tile::Player);
        self.player = (x, y);
    }

    /// Exactly one Player cell, located at the stored coordinate.
    pub fn player_consistent(&self) -> bool {
        let (px, py) = self.player;
        self.grid.count(TileKind::Player) == 1 && self.grid.get(px, py).is_player()
    }
}

fn find_single_player(grid: &Grid) -> Result<(usize, usize), LevelError> {
    match grid.count(TileKind::Player) {
        0 => Err(LevelError::NoPlayer),
        1 => grid.find(TileKind::Player).ok_or(LevelError::NoPlayer),
        count => Err(LevelError::MultiplePlayers { count }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::parse_glyphs;

    fn world_from(rows: &[&str]) -> WorldState {
        WorldState::new(parse_glyphs(&rows.join("\n")).unwrap().grid).unwrap()
    }

    #[test]
    fn player_found_from_grid() {
        let w = world_from(&["####", "# P#", "####"]);
        assert_eq!(w.player(), (2, 1));
        assert!(w.player_consistent());
    }

    #[test]
    fn grid_without_player_rejected() {
        let grid = Grid::new(3, 3, Tile::Air);
        assert!(matches!(WorldState::new(grid), Err(LevelError::NoPlayer)));
    }

    #[test]
    fn grid_with_two_players_rejected() {
        let mut grid = Grid::new(3, 1, Tile::Air);
        grid.set(0, 0, Tile::Player);
        grid.set(2, 0, Tile::Player);
        assert!(matches!(WorldState::new(grid), Err(LevelError::MultiplePlayers { count: 2 })));
    }

    #[test]
    fn move_to_tile_keeps_single_player() {
        let mut w = world_from(&["#####", "#P  #", "#####"]);
        w.move_to_tile(3, 1);
        assert_eq!(w.player(), (3, 1));
        assert!(w.grid().get(1, 1).is_air());
        assert!(w.player_consistent());
    }

    #[test]
    #[should_panic]
    fn move_to_own_cell_is_a_contract_violation() {
        let mut w = world_from(&["###", "#P#", "###"]);
        w.move_to_tile(1, 1);
    }

    #[test]
    fn restart_restores_initial_grid() {
        let mut w = world_from(&["#####", "#P  #", "#####"]);
        let before = w.grid().clone();
        w.enqueue(Direction::Right);
        w.tick();
        assert_eq!(w.player(), (2, 1));
        w.enqueue(Direction::Right);
        w.restart();
        assert_eq!(w.grid(), &before);
        assert_eq!(w.player(), (1, 1));
        assert_eq!(w.pending_inputs(), 0);
        assert_eq!(w.tick, 0);
    }

    #[test]
    fn undrained_events_hold_only_the_last_tick() {
        let mut w = world_from(&["###", "#P#", "###"]);
        for _ in 0..1000 {
            w.enqueue(Direction::Left);
            w.tick();
        }
        assert_eq!(w.events.len(), 1);
        assert_eq!(w.drain_events(), vec![GameEvent::MoveBlocked { dir: Direction::Left }]);
        assert!(w.drain_events().is_empty());

        w.tick();
        assert!(w.drain_events().is_empty());
    }

    #[test]
    fn cells_report_kinds() {
        let w = world_from(&["#P"]);
        let cells: Vec<_> = w.cells().collect();
        assert_eq!(cells, vec![(0, 0, TileKind::Unbreakable), (1, 0, TileKind::Player)]);
    }
}
