/// Tile kinds and their capability profiles.
///
/// Every cell of the grid holds exactly one `Tile`. Stone and Box carry their
/// own `FallState` inline; every other kind is identified by its tag alone.
/// Kind semantics (what the player may do when stepping into a tile) are
/// centralized here as `Passage` answers, so the move resolver never has to
/// switch on kinds itself.

use std::fmt;

use super::fall::FallState;

// ── Kinds ──

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TileKind {
    Air,
    Flux,
    Unbreakable,
    Player,
    Stone,
    Box,
    Key1,
    Lock1,
    Key2,
    Lock2,
}

/// Capability flags attached to every kind.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Caps {
    /// Walkable; the player overwrites it on entry.
    pub edible: bool,
    /// Can be displaced sideways by the player.
    pub pushable: bool,
    pub stony: bool,
    pub boxy: bool,
}

const NONE: Caps = Caps { edible: false, pushable: false, stony: false, boxy: false };
const EDIBLE: Caps = Caps { edible: true, ..NONE };

impl TileKind {
    pub const ALL: [TileKind; 10] = [
        TileKind::Air,
        TileKind::Flux,
        TileKind::Unbreakable,
        TileKind::Player,
        TileKind::Stone,
        TileKind::Box,
        TileKind::Key1,
        TileKind::Lock1,
        TileKind::Key2,
        TileKind::Lock2,
    ];

    pub const fn caps(self) -> Caps {
        match self {
            TileKind::Air | TileKind::Flux => EDIBLE,
            TileKind::Stone => Caps { pushable: true, stony: true, ..NONE },
            TileKind::Box => Caps { pushable: true, boxy: true, ..NONE },
            TileKind::Unbreakable
            | TileKind::Player
            | TileKind::Key1
            | TileKind::Lock1
            | TileKind::Key2
            | TileKind::Lock2 => NONE,
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TileKind::Air => "air",
            TileKind::Flux => "flux",
            TileKind::Unbreakable => "unbreakable",
            TileKind::Player => "player",
            TileKind::Stone => "stone",
            TileKind::Box => "box",
            TileKind::Key1 => "key 1",
            TileKind::Lock1 => "lock 1",
            TileKind::Key2 => "key 2",
            TileKind::Lock2 => "lock 2",
        };
        f.write_str(name)
    }
}

// ── Locks ──

/// The two key/lock pairs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Lock {
    One,
    Two,
}

impl Lock {
    /// Tile kind dissolved when the matching key is collected.
    pub const fn lock_kind(self) -> TileKind {
        match self {
            Lock::One => TileKind::Lock1,
            Lock::Two => TileKind::Lock2,
        }
    }
}

// ── Passage ──

/// What a tile answers when the player tries to step into it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Passage {
    /// Player walks in; the tile is overwritten.
    Grant,
    /// No-op.
    Refuse,
    /// Resting pushable: passage depends on the push-chain rule.
    Push,
    /// Key: dissolve every matching lock, then walk in.
    Unlock(Lock),
}

// ── Tile ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Air,
    Flux,
    Unbreakable,
    Player,
    Stone(FallState),
    Box(FallState),
    Key1,
    Lock1,
    Key2,
    Lock2,
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Air
    }
}

impl Tile {
    pub fn kind(self) -> TileKind {
        match self {
            Tile::Air => TileKind::Air,
            Tile::Flux => TileKind::Flux,
            Tile::Unbreakable => TileKind::Unbreakable,
            Tile::Player => TileKind::Player,
            Tile::Stone(_) => TileKind::Stone,
            Tile::Box(_) => TileKind::Box,
            Tile::Key1 => TileKind::Key1,
            Tile::Lock1 => TileKind::Lock1,
            Tile::Key2 => TileKind::Key2,
            Tile::Lock2 => TileKind::Lock2,
        }
    }

    pub fn caps(self) -> Caps {
        self.kind().caps()
    }

    pub fn is_air(self) -> bool { self.kind() == TileKind::Air }
    pub fn is_flux(self) -> bool { self.kind() == TileKind::Flux }
    pub fn is_unbreakable(self) -> bool { self.kind() == TileKind::Unbreakable }
    pub fn is_player(self) -> bool { self.kind() == TileKind::Player }
    pub fn is_stone(self) -> bool { self.kind() == TileKind::Stone }
    pub fn is_box(self) -> bool { self.kind() == TileKind::Box }
    pub fn is_key1(self) -> bool { self.kind() == TileKind::Key1 }
    pub fn is_lock1(self) -> bool { self.kind() == TileKind::Lock1 }
    pub fn is_key2(self) -> bool { self.kind() == TileKind::Key2 }
    pub fn is_lock2(self) -> bool { self.kind() == TileKind::Lock2 }

    pub fn is_edible(self) -> bool { self.caps().edible }
    pub fn is_pushable(self) -> bool { self.caps().pushable }
    pub fn is_stony(self) -> bool { self.caps().stony }
    pub fn is_boxy(self) -> bool { self.caps().boxy }

    /// Owned fall state, for the two kinds that have one.
    pub fn fall_state(self) -> Option<FallState> {
        match self {
            Tile::Stone(state) | Tile::Box(state) => Some(state),
            _ => None,
        }
    }

    pub fn is_falling(self) -> bool {
        self.fall_state().is_some_and(FallState::is_falling)
    }

    /// Force the owned state to Falling. No-op for kinds without one.
    pub(crate) fn fall(&mut self) {
        self.set_fall_state(FallState::Falling);
    }

    /// Force the owned state to Resting. No-op for kinds without one.
    pub(crate) fn rest(&mut self) {
        self.set_fall_state(FallState::Resting);
    }

    fn set_fall_state(&mut self, next: FallState) {
        if let Tile::Stone(state) | Tile::Box(state) = self {
            *state = next;
        }
    }

    /// Answer to a horizontal step into this tile.
    pub fn horizontal_passage(self) -> Passage {
        match self {
            Tile::Air | Tile::Flux => Passage::Grant,
            Tile::Stone(state) | Tile::Box(state) => state.horizontal_passage(),
            Tile::Key1 => Passage::Unlock(Lock::One),
            Tile::Key2 => Passage::Unlock(Lock::Two),
            Tile::Unbreakable | Tile::Player | Tile::Lock1 | Tile::Lock2 => Passage::Refuse,
        }
    }

    /// Answer to a vertical step into this tile. Nothing is pushed vertically.
    pub fn vertical_passage(self) -> Passage {
        match self {
            Tile::Air | Tile::Flux => Passage::Grant,
            Tile::Key1 => Passage::Unlock(Lock::One),
            Tile::Key2 => Passage::Unlock(Lock::Two),
            Tile::Stone(_)
            | Tile::Box(_)
            | Tile::Unbreakable
            | Tile::Player
            | Tile::Lock1
            | Tile::Lock2 => Passage::Refuse,
        }
    }

    pub fn from_raw(raw: RawTile) -> Tile {
        match raw {
            RawTile::Air => Tile::Air,
            RawTile::Flux => Tile::Flux,
            RawTile::Unbreakable => Tile::Unbreakable,
            RawTile::Player => Tile::Player,
            RawTile::Stone => Tile::Stone(FallState::Resting),
            RawTile::FallingStone => Tile::Stone(FallState::Falling),
            RawTile::Box => Tile::Box(FallState::Resting),
            RawTile::FallingBox => Tile::Box(FallState::Falling),
            RawTile::Key1 => Tile::Key1,
            RawTile::Lock1 => Tile::Lock1,
            RawTile::Key2 => Tile::Key2,
            RawTile::Lock2 => Tile::Lock2,
        }
    }
}

// ── Raw level vocabulary ──

/// Small-integer cell encoding used by level sources.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum RawTile {
    Air = 0,
    Flux = 1,
    Unbreakable = 2,
    Player = 3,
    Stone = 4,
    FallingStone = 5,
    Box = 6,
    FallingBox = 7,
    Key1 = 8,
    Lock1 = 9,
    Key2 = 10,
    Lock2 = 11,
}

impl RawTile {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for RawTile {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => RawTile::Air,
            1 => RawTile::Flux,
            2 => RawTile::Unbreakable,
            3 => RawTile::Player,
            4 => RawTile::Stone,
            5 => RawTile::FallingStone,
            6 => RawTile::Box,
            7 => RawTile::FallingBox,
            8 => RawTile::Key1,
            9 => RawTile::Lock1,
            10 => RawTile::Key2,
            11 => RawTile::Lock2,
            other => return Err(other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_air_and_flux_are_edible() {
        for kind in TileKind::ALL {
            let edible = matches!(kind, TileKind::Air | TileKind::Flux);
            assert_eq!(kind.caps().edible, edible, "{kind}");
        }
    }

    #[test]
    fn stone_and_box_split_stony_and_boxy() {
        let stone = Tile::Stone(FallState::Resting);
        let boxed = Tile::Box(FallState::Resting);
        assert!(stone.is_pushable() && stone.is_stony() && !stone.is_boxy());
        assert!(boxed.is_pushable() && boxed.is_boxy() && !boxed.is_stony());
        assert!(!Tile::Key1.is_pushable());
    }

    #[test]
    fn falling_flag_follows_owned_state() {
        let mut t = Tile::Box(FallState::Resting);
        assert!(!t.is_falling());
        t.fall();
        assert!(t.is_falling());
        assert_eq!(t.horizontal_passage(), Passage::Refuse);
        t.rest();
        assert!(!t.is_falling());
        assert_eq!(t.horizontal_passage(), Passage::Push);
    }

    #[test]
    fn fall_and_rest_ignore_stateless_kinds() {
        let mut t = Tile::Key2;
        t.fall();
        assert_eq!(t, Tile::Key2);
        assert!(!t.is_falling());
    }

    #[test]
    fn pushables_refuse_vertical_entry() {
        assert_eq!(Tile::Stone(FallState::Resting).vertical_passage(), Passage::Refuse);
        assert_eq!(Tile::Box(FallState::Resting).vertical_passage(), Passage::Refuse);
        assert_eq!(Tile::Flux.vertical_passage(), Passage::Grant);
    }

    #[test]
    fn keys_unlock_on_both_axes() {
        assert_eq!(Tile::Key1.horizontal_passage(), Passage::Unlock(Lock::One));
        assert_eq!(Tile::Key1.vertical_passage(), Passage::Unlock(Lock::One));
        assert_eq!(Tile::Key2.vertical_passage(), Passage::Unlock(Lock::Two));
        assert_eq!(Lock::Two.lock_kind(), TileKind::Lock2);
    }

    #[test]
    fn raw_codes_cover_falling_variants() {
        assert_eq!(Tile::from_raw(RawTile::try_from(5).unwrap()), Tile::Stone(FallState::Falling));
        assert_eq!(Tile::from_raw(RawTile::try_from(6).unwrap()), Tile::Box(FallState::Resting));
        assert_eq!(RawTile::try_from(12), Err(12));
        assert_eq!(RawTile::Lock2.code(), 11);
    }
}
