/// Events emitted during a simulation tick.
/// The presentation layer consumes these for messages and logging.

use crate::domain::tile::{Lock, TileKind};
use super::queue::Direction;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    PlayerMoved { x: usize, y: usize },
    ObjectPushed { kind: TileKind, x: usize, y: usize },
    MoveBlocked { dir: Direction },
    LocksOpened { lock: Lock, count: usize },
    FallStarted { kind: TileKind, x: usize, y: usize },
    Landed { kind: TileKind, x: usize, y: usize },
}
