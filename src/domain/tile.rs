/// Tile kinds and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.
///
/// Tiles have no identity: moving one means copying the value into
/// another cell and overwriting the source.

use super::fall::FallState;
use super::keys::KeyColor;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Tile {
    Empty,
    Inert,              // Background matter, blocks the player
    Unbreakable,        // Walls
    Rock(FallState),    // Falls, pushable while resting
    Box(FallState),     // Same physics as Rock
    Key(KeyColor),      // Pickup, opens matching locks
    Lock(KeyColor),
    Player,
}

impl Tile {
    /// Is this tile subject to gravity?
    #[allow(dead_code)]
    pub fn can_fall(self) -> bool {
        matches!(self, Tile::Rock(_) | Tile::Box(_))
    }

    /// Can the player, a rock or a box enter this cell?
    pub fn is_passable(self) -> bool {
        matches!(self, Tile::Empty)
    }

    /// Is this a lock of the given color?
    pub fn is_lock(self, color: KeyColor) -> bool {
        self == Tile::Lock(color)
    }

    pub fn is_player(self) -> bool {
        matches!(self, Tile::Player)
    }

    /// Fall state, for fall-capable tiles only.
    pub fn fall_state(self) -> Option<FallState> {
        match self {
            Tile::Rock(s) | Tile::Box(s) => Some(s),
            _ => None,
        }
    }

    /// Same tile with a new fall state. Non-falling kinds are returned as-is.
    pub fn with_fall_state(self, state: FallState) -> Tile {
        match self {
            Tile::Rock(_) => Tile::Rock(state),
            Tile::Box(_) => Tile::Box(state),
            other => other,
        }
    }

    /// Map a level-data code to a tile.
    ///
    /// ```text
    ///  0 Empty         1 Inert         2 Unbreakable   3 Player
    ///  4 Rock/resting  5 Rock/falling  6 Box/resting   7 Box/falling
    ///  8 Key 1         9 Lock 1       10 Key 2        11 Lock 2
    /// ```
    pub fn from_code(code: u8) -> Option<Tile> {
        let tile = match code {
            0 => Tile::Empty,
            1 => Tile::Inert,
            2 => Tile::Unbreakable,
            3 => Tile::Player,
            4 => Tile::Rock(FallState::Resting),
            5 => Tile::Rock(FallState::Falling),
            6 => Tile::Box(FallState::Resting),
            7 => Tile::Box(FallState::Falling),
            8 => Tile::Key(KeyColor::One),
            9 => Tile::Lock(KeyColor::One),
            10 => Tile::Key(KeyColor::Two),
            11 => Tile::Lock(KeyColor::Two),
            _ => return None,
        };
        Some(tile)
    }

    /// Inverse of `from_code`.
    #[allow(dead_code)]
    pub fn code(self) -> u8 {
        match self {
            Tile::Empty => 0,
            Tile::Inert => 1,
            Tile::Unbreakable => 2,
            Tile::Player => 3,
            Tile::Rock(FallState::Resting) => 4,
            Tile::Rock(FallState::Falling) => 5,
            Tile::Box(FallState::Resting) => 6,
            Tile::Box(FallState::Falling) => 7,
            Tile::Key(KeyColor::One) => 8,
            Tile::Lock(KeyColor::One) => 9,
            Tile::Key(KeyColor::Two) => 10,
            Tile::Lock(KeyColor::Two) => 11,
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rocks_and_boxes_fall() {
        for code in 0..=11u8 {
            let tile = Tile::from_code(code).unwrap();
            assert_eq!(tile.can_fall(), (4..=7).contains(&code), "code {code}");
            assert_eq!(tile.fall_state().is_some(), tile.can_fall());
        }
    }

    #[test]
    fn only_empty_is_passable() {
        assert!(Tile::Empty.is_passable());
        assert!(!Tile::Inert.is_passable());
        assert!(!Tile::Key(KeyColor::One).is_passable());
        assert!(!Tile::Player.is_passable());
        assert!(!Tile::Rock(FallState::Falling).is_passable());
    }

    #[test]
    fn codes_map_back() {
        for code in 0..=11u8 {
            assert_eq!(Tile::from_code(code).unwrap().code(), code);
        }
        assert_eq!(Tile::from_code(12), None);
        assert_eq!(Tile::from_code(255), None);
    }

    #[test]
    fn lock_colors() {
        let l1 = Tile::Lock(KeyColor::One);
        assert!(l1.is_lock(KeyColor::One));
        assert!(!l1.is_lock(KeyColor::Two));
        assert!(!Tile::Key(KeyColor::One).is_lock(KeyColor::One));
    }

    #[test]
    fn with_fall_state_keeps_kind() {
        let rock = Tile::Rock(FallState::Resting);
        assert_eq!(rock.with_fall_state(FallState::Falling), Tile::Rock(FallState::Falling));
        assert_eq!(Tile::Inert.with_fall_state(FallState::Falling), Tile::Inert);
    }
}
