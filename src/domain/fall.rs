/// Fall state machine for rocks and boxes.
///
/// Two states only. The state is recomputed from the cell below on every
/// tick, before the drop is applied; there is no memory of the previous
/// state beyond what the renderer and push rule read between ticks.
///
///   below is Empty  → Falling → drop one row this tick
///   anything else   → Resting → stays, may be pushed sideways

use super::tile::Tile;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FallState {
    Falling,
    Resting,
}

impl FallState {
    /// Tick transition: a pure function of the current support.
    pub fn from_support(below: Tile) -> FallState {
        if below.is_passable() {
            FallState::Falling
        } else {
            FallState::Resting
        }
    }

    pub fn is_falling(self) -> bool {
        matches!(self, FallState::Falling)
    }
}

/// What the gravity pass does with one fall-capable tile this tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FallStep {
    /// Keep the tile in place with the given state.
    Stay(FallState),
    /// Move the tile one row down; it keeps falling.
    Drop,
}

/// Resolve one tick for a fall-capable tile given the cell below it.
pub fn tick(below: Tile) -> FallStep {
    match FallState::from_support(below) {
        FallState::Falling => FallStep::Drop,
        FallState::Resting => FallStep::Stay(FallState::Resting),
    }
}

/// Horizontal push geometry. The player stands at column c, the tile at
/// c+dx. The push succeeds only when the landing cell (same row, c+2dx)
/// is empty AND the cell under the pushed tile (row+1, c+dx) is empty.
pub fn push_clear(landing: Tile, under_pushed: Tile) -> bool {
    landing.is_passable() && under_pushed.is_passable()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_below_means_falling() {
        assert_eq!(FallState::from_support(Tile::Empty), FallState::Falling);
        assert_eq!(tick(Tile::Empty), FallStep::Drop);
    }

    #[test]
    fn anything_solid_below_means_resting() {
        for below in [
            Tile::Inert,
            Tile::Unbreakable,
            Tile::Player,
            Tile::Rock(FallState::Falling),
            Tile::Box(FallState::Resting),
        ] {
            assert_eq!(FallState::from_support(below), FallState::Resting, "{below:?}");
            assert_eq!(tick(below), FallStep::Stay(FallState::Resting));
        }
    }

    #[test]
    fn push_needs_both_cells_empty() {
        assert!(push_clear(Tile::Empty, Tile::Empty));
        assert!(!push_clear(Tile::Unbreakable, Tile::Empty));
        assert!(!push_clear(Tile::Empty, Tile::Unbreakable));
        assert!(!push_clear(Tile::Inert, Tile::Inert));
    }
}
