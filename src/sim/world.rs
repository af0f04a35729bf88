/// WorldState: the grid simulation engine for one level.
///
/// ## Tile Architecture
///
/// Two tile layers:
///   - `base_tiles`: the level as loaded. **Never mutated** after load.
///   - `tiles`: the live grid, mutated by moves and gravity.
///
/// All mutations go through `set_tile()` and are bounds-checked; an
/// out-of-range access is a `SimError`, never clamped or ignored.
/// `restart()` resets `tiles = base_tiles.clone()`.
///
/// ## Player invariant
///
/// Exactly one cell holds `Tile::Player`, and `player` always points at
/// it. Only `move_to()` relocates the player, so the position is never
/// recovered by scanning.

use log::{debug, trace, warn};

use crate::domain::coord::{Direction, Pos};
use crate::domain::keys::{self, KeyColor};
use crate::domain::rules::{self, MapView, PushOutcome};
use crate::domain::tile::Tile;
use crate::error::{LevelError, SimError};
use super::input_queue::InputQueue;
use super::level::LevelDef;

/// Result of applying one directional move.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    Moved { to: Pos },
    Pushed { from: Pos, to: Pos },
    KeyCollected { color: KeyColor, locks_removed: usize },
    /// No effect: wall, lock, inert matter, or blocked push geometry.
    Blocked,
    /// No effect: the target is a falling rock/box.
    IgnoredFalling,
}

/// One cell as seen by the renderer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CellView {
    pub row: usize,
    pub col: usize,
    pub tile: Tile,
}

pub struct WorldState {
    // ── Tile layers ──
    /// Level as loaded. Never mutated.
    base_tiles: Vec<Vec<Tile>>,
    base_player: Pos,
    /// Live grid.
    pub(super) tiles: Vec<Vec<Tile>>,
    pub(super) width: usize,
    pub(super) height: usize,

    // ── Player ──
    pub(super) player: Pos,

    // ── Input ──
    pub(super) inputs: InputQueue,

    // ── Meta ──
    pub(super) tick: u64,
    name: String,
}

// ── Construction ──

impl WorldState {
    /// Build a world from a level definition.
    pub fn from_level(def: &LevelDef) -> Result<Self, LevelError> {
        Self::from_codes(&def.name, &def.codes)
    }

    /// Build a world from rectangular rows of level codes.
    /// Refuses ragged rows, unknown codes, and anything but exactly one player.
    pub fn from_codes(name: &str, codes: &[Vec<u8>]) -> Result<Self, LevelError> {
        let height = codes.len();
        let width = codes.first().map_or(0, |r| r.len());
        if height == 0 || width == 0 {
            return Err(LevelError::Empty);
        }

        let mut tiles = Vec::with_capacity(height);
        let mut players = vec![];
        for (row, line) in codes.iter().enumerate() {
            if line.len() != width {
                return Err(LevelError::Ragged { row, expected: width, found: line.len() });
            }
            let mut out = Vec::with_capacity(width);
            for (col, &code) in line.iter().enumerate() {
                let tile = Tile::from_code(code)
                    .ok_or(LevelError::UnknownCode { row, col, code })?;
                if tile.is_player() {
                    players.push(Pos::new(row, col));
                }
                out.push(tile);
            }
            tiles.push(out);
        }

        let player = match players.as_slice() {
            [] => return Err(LevelError::NoPlayer),
            [p] => *p,
            many => return Err(LevelError::MultiplePlayers { count: many.len() }),
        };

        if !is_enclosed(&tiles) {
            warn!("level {name:?} is not enclosed by unbreakable tiles; edge moves will fail");
        }

        Ok(WorldState {
            base_tiles: tiles.clone(),
            base_player: player,
            tiles,
            width,
            height,
            player,
            inputs: InputQueue::new(),
            tick: 0,
            name: name.to_string(),
        })
    }

    /// Reset the grid to the level as loaded. Pending input is dropped.
    pub fn restart(&mut self) {
        self.tiles = self.base_tiles.clone();
        self.player = self.base_player;
        self.inputs.clear();
        self.tick = 0;
    }
}

/// Is every edge cell unbreakable?
fn is_enclosed(tiles: &[Vec<Tile>]) -> bool {
    let last_row = tiles.len() - 1;
    tiles.iter().enumerate().all(|(row, line)| {
        let last_col = line.len() - 1;
        line.iter().enumerate().all(|(col, &t)| {
            let edge = row == 0 || row == last_row || col == 0 || col == last_col;
            !edge || t == Tile::Unbreakable
        })
    })
}

// ── Tile query / mutation API ──

impl WorldState {
    /// Read-only view for rule queries.
    pub fn map_view(&self) -> MapView<'_> {
        MapView::new(&self.tiles)
    }

    /// Query the live grid at `pos`.
    pub fn tile_at(&self, pos: Pos) -> Result<Tile, SimError> {
        self.map_view().tile_at(pos)
    }

    /// Overwrite one cell of the live grid.
    pub(super) fn set_tile(&mut self, pos: Pos, tile: Tile) -> Result<(), SimError> {
        let cell = self.tiles
            .get_mut(pos.row)
            .and_then(|r| r.get_mut(pos.col))
            .ok_or(SimError::OutOfBounds { row: pos.row as isize, col: pos.col as isize })?;
        *cell = tile;
        Ok(())
    }

    /// Relocate the player: old cell becomes Empty, new cell becomes Player.
    pub fn move_to(&mut self, to: Pos) -> Result<(), SimError> {
        // Validate the target before touching anything, so a failure
        // cannot leave the grid without a player.
        self.tile_at(to)?;
        self.set_tile(self.player, Tile::Empty)?;
        self.set_tile(to, Tile::Player)?;
        self.player = to;
        Ok(())
    }

    /// Apply one directional move immediately.
    pub fn apply_move(&mut self, dir: Direction) -> Result<MoveOutcome, SimError> {
        let outcome = rules::resolve_push(&self.map_view(), self.player, dir)?;
        trace!("move {} from {:?}: {:?}", dir.name(), self.player, outcome);

        let result = match outcome {
            PushOutcome::Step { to } => {
                self.move_to(to)?;
                MoveOutcome::Moved { to }
            }
            PushOutcome::Collect { to, color } => {
                let locks_removed = keys::remove_locks(&mut self.tiles, color);
                debug!("{} key picked up, {} lock(s) removed", color.name(), locks_removed);
                self.move_to(to)?;
                MoveOutcome::KeyCollected { color, locks_removed }
            }
            PushOutcome::Shove { to, dest, tile } => {
                self.set_tile(dest, tile)?;
                self.move_to(to)?;
                MoveOutcome::Pushed { from: to, to: dest }
            }
            PushOutcome::Blocked => MoveOutcome::Blocked,
            PushOutcome::IgnoredFalling => MoveOutcome::IgnoredFalling,
        };
        Ok(result)
    }

    /// Queue a direction for the next tick.
    pub fn push_input(&mut self, dir: Direction) {
        self.inputs.push(dir);
    }

    #[allow(dead_code)]
    pub fn pending_inputs(&self) -> usize {
        self.inputs.len()
    }
}

// ── Render interface ──

impl WorldState {
    /// Every cell, row-major.
    pub fn cells(&self) -> impl Iterator<Item = CellView> + '_ {
        self.tiles.iter().enumerate().flat_map(|(row, line)| {
            line.iter().enumerate().map(move |(col, &tile)| CellView { row, col, tile })
        })
    }

    pub fn player_pos(&self) -> Pos {
        self.player
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Owned copy of the live grid, for consumers outside the sim thread.
    #[allow(dead_code)]
    pub fn snapshot(&self) -> Vec<Vec<Tile>> {
        self.tiles.clone()
    }

    /// The live grid as level codes.
    #[allow(dead_code)]
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.tiles.iter().map(|r| r.iter().map(|t| t.code()).collect()).collect()
    }
}
