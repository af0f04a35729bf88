/// Push rules, as a truth table.
///
/// Pure functions over a read-only map with no side effects.
/// These decide what a player move does; the engine applies the result.
///
/// ## Push Truth Table
///
/// Target = the cell adjacent to the player in the move direction.
///
/// ### Horizontal (Left / Right)
/// ┌──────────────────────┬─────────────────────────────────────────┐
/// │ Target               │ Outcome                                 │
/// ├──────────────────────┼─────────────────────────────────────────┤
/// │ Empty                │ Step: player enters target              │
/// │ Key(c)               │ Collect: erase all Lock(c), then step   │
/// │ Rock/Box, Resting    │ Shove if landing & under-target empty,  │
/// │                      │ else Blocked                            │
/// │ Rock/Box, Falling    │ IgnoredFalling (no effect)              │
/// │ Inert/Unbreakable/   │ Blocked                                 │
/// │ Lock/Player          │                                         │
/// └──────────────────────┴─────────────────────────────────────────┘
///
/// ### Vertical (Up / Down)
/// ┌──────────────────────┬─────────────────────────────────────────┐
/// │ Empty                │ Step                                    │
/// │ Key(c)               │ Collect                                 │
/// │ Rock/Box (any state) │ Blocked: only gravity moves them down   │
/// │ everything else      │ Blocked                                 │
/// └──────────────────────┴─────────────────────────────────────────┘
///
/// Any cell the rules need to read must lie inside the grid; reading past
/// the edge is reported as `SimError::OutOfBounds`, never clamped.

use super::coord::{Axis, Direction, Pos};
use super::keys::KeyColor;
use super::fall::{self, FallState};
use super::tile::Tile;
use crate::error::SimError;

/// Immutable view of the tile map for rule queries.
pub struct MapView<'a> {
    pub tiles: &'a [Vec<Tile>],
    pub width: usize,
    pub height: usize,
}

impl<'a> MapView<'a> {
    pub fn new(tiles: &'a [Vec<Tile>]) -> Self {
        let height = tiles.len();
        let width = tiles.first().map_or(0, |r| r.len());
        MapView { tiles, width, height }
    }

    /// Position reached from `pos` by (d_row, d_col), bounds-checked.
    pub fn offset(&self, pos: Pos, d_row: isize, d_col: isize) -> Result<Pos, SimError> {
        let row = pos.row as isize + d_row;
        let col = pos.col as isize + d_col;
        if row < 0 || col < 0 || row >= self.height as isize || col >= self.width as isize {
            return Err(SimError::OutOfBounds { row, col });
        }
        Ok(Pos::new(row as usize, col as usize))
    }

    /// Tile at `pos`, bounds-checked.
    pub fn tile_at(&self, pos: Pos) -> Result<Tile, SimError> {
        self.tiles
            .get(pos.row)
            .and_then(|r| r.get(pos.col))
            .copied()
            .ok_or(SimError::OutOfBounds { row: pos.row as isize, col: pos.col as isize })
    }
}

/// What a player move resolves to. Only the first three change the grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PushOutcome {
    /// Player enters `to`.
    Step { to: Pos },
    /// Player collects the key at `to`; locks of `color` are erased first.
    Collect { to: Pos, color: KeyColor },
    /// `tile` is shoved from `to` into `dest`; player enters `to`.
    Shove { to: Pos, dest: Pos, tile: Tile },
    /// Target refuses the move.
    Blocked,
    /// Target is a falling rock/box, which ignores sideways pushes.
    IgnoredFalling,
}

impl PushOutcome {
    /// Does this outcome change the grid?
    #[allow(dead_code)]
    pub fn is_effective(&self) -> bool {
        matches!(
            self,
            PushOutcome::Step { .. } | PushOutcome::Collect { .. } | PushOutcome::Shove { .. }
        )
    }
}

/// Decide what moving the player at `player` in `dir` does.
pub fn resolve_push(map: &MapView, player: Pos, dir: Direction) -> Result<PushOutcome, SimError> {
    let (d_row, d_col) = dir.delta();
    let to = map.offset(player, d_row, d_col)?;
    let target = map.tile_at(to)?;

    let outcome = match (target, dir.axis()) {
        (Tile::Empty, _) => PushOutcome::Step { to },
        (Tile::Key(color), _) => PushOutcome::Collect { to, color },
        (Tile::Rock(state) | Tile::Box(state), Axis::Horizontal) => {
            push_horizontal(map, player, to, target, state, d_col)?
        }
        (Tile::Rock(_) | Tile::Box(_), Axis::Vertical) => PushOutcome::Blocked,
        (Tile::Inert | Tile::Unbreakable | Tile::Lock(_) | Tile::Player, _) => PushOutcome::Blocked,
    };
    Ok(outcome)
}

/// Sideways push of a fall-capable tile standing at `to`.
fn push_horizontal(
    map: &MapView,
    player: Pos,
    to: Pos,
    tile: Tile,
    state: FallState,
    d_col: isize,
) -> Result<PushOutcome, SimError> {
    if state.is_falling() {
        return Ok(PushOutcome::IgnoredFalling);
    }
    let dest = map.offset(player, 0, 2 * d_col)?;
    let under = map.offset(to, 1, 0)?;
    if fall::push_clear(map.tile_at(dest)?, map.tile_at(under)?) {
        Ok(PushOutcome::Shove { to, dest, tile })
    } else {
        Ok(PushOutcome::Blocked)
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
