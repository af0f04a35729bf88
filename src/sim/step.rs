/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Input resolution: drain the input queue, most recent first,
///      applying each move immediately.
///   2. Gravity resolution: sweep rows bottom to top, left to right
///      within a row, updating every rock and box.
///
/// The bottom-up sweep guarantees at most one row of fall per tick: a
/// tile dropped into row r+1 is never visited again in the same pass,
/// because row r+1 was already processed.

use crate::domain::coord::Pos;
use crate::domain::fall::{self, FallState, FallStep};
use crate::domain::tile::Tile;
use crate::error::SimError;
use super::event::GameEvent;
use super::world::{MoveOutcome, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn advance_tick(world: &mut WorldState) -> Result<Vec<GameEvent>, SimError> {
    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    handle_inputs(world, &mut events)?;
    update_map(world, &mut events)?;

    Ok(events)
}

// ══════════════════════════════════════════════════════════════
// Input
// ══════════════════════════════════════════════════════════════

fn handle_inputs(world: &mut WorldState, events: &mut Vec<GameEvent>) -> Result<(), SimError> {
    while let Some(dir) = world.inputs.pop() {
        match world.apply_move(dir)? {
            MoveOutcome::Moved { to } => events.push(GameEvent::PlayerMoved { to }),
            MoveOutcome::Pushed { from, to } => {
                events.push(GameEvent::TilePushed { from, to });
                events.push(GameEvent::PlayerMoved { to: from });
            }
            MoveOutcome::KeyCollected { color, locks_removed } => {
                events.push(GameEvent::KeyPicked { color });
                if locks_removed > 0 {
                    events.push(GameEvent::LocksOpened { color, count: locks_removed });
                }
                events.push(GameEvent::PlayerMoved { to: world.player_pos() });
            }
            MoveOutcome::Blocked => events.push(GameEvent::MoveBlocked { dir }),
            MoveOutcome::IgnoredFalling => events.push(GameEvent::PushIgnored { dir }),
        }
    }
    Ok(())
}

// ══════════════════════════════════════════════════════════════
// Gravity
// ══════════════════════════════════════════════════════════════

fn update_map(world: &mut WorldState, events: &mut Vec<GameEvent>) -> Result<(), SimError> {
    for row in (0..world.height).rev() {
        for col in 0..world.width {
            update_tile(world, Pos::new(row, col), events)?;
        }
    }
    Ok(())
}

/// Per-tile update. Only rocks and boxes do anything.
fn update_tile(world: &mut WorldState, at: Pos, events: &mut Vec<GameEvent>) -> Result<(), SimError> {
    let tile = world.tile_at(at)?;
    let Some(previous) = tile.fall_state() else {
        return Ok(());
    };

    let below = world.map_view().offset(at, 1, 0)?;
    match fall::tick(world.tile_at(below)?) {
        FallStep::Drop => {
            world.set_tile(below, tile.with_fall_state(FallState::Falling))?;
            world.set_tile(at, Tile::Empty)?;
        }
        FallStep::Stay(state) => {
            if previous.is_falling() && !state.is_falling() {
                events.push(GameEvent::TileLanded { at });
            }
            world.set_tile(at, tile.with_fall_state(state))?;
        }
    }
    Ok(())
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════


// ══════════════════════════════════════════════════════════════
// Property tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod props {
    use proptest::prelude::*;

    use super::*;
    use crate::domain::coord::Direction;
    use crate::sim::world::tests::player_count;

    const SIZE: usize = 7;
    const INNER: usize = SIZE - 2;

    fn arb_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Left),
            Just(Direction::Right),
            Just(Direction::Up),
            Just(Direction::Down),
        ]
    }

    /// Enclosed SIZE x SIZE level: random interior, one player.
    fn arb_level() -> impl Strategy<Value = Vec<Vec<u8>>> {
        (
            proptest::collection::vec(prop_oneof![0u8..=2, 4u8..=11], INNER * INNER),
            0..INNER * INNER,
        )
            .prop_map(|(mut cells, player)| {
                cells[player] = 3;
                let mut rows = vec![vec![2u8; SIZE]; SIZE];
                for (i, code) in cells.into_iter().enumerate() {
                    rows[1 + i / INNER][1 + i % INNER] = code;
                }
                rows
            })
    }

    /// Directions pressed per tick window, possibly none.
    fn arb_play() -> impl Strategy<Value = Vec<Vec<Direction>>> {
        proptest::collection::vec(proptest::collection::vec(arb_direction(), 0..3), 1..40)
    }

    fn walls(w: &WorldState) -> Vec<Pos> {
        w.cells()
            .filter(|c| c.tile == Tile::Unbreakable)
            .map(|c| Pos::new(c.row, c.col))
            .collect()
    }

    proptest! {
        #[test]
        fn exactly_one_player_after_any_play(codes in arb_level(), play in arb_play()) {
            let mut w = WorldState::from_codes("prop", &codes).unwrap();
            for window in play {
                for dir in window {
                    w.push_input(dir);
                }
                advance_tick(&mut w).unwrap();
                prop_assert_eq!(player_count(&w), 1);
                prop_assert_eq!(w.tile_at(w.player_pos()).unwrap(), Tile::Player);
            }
        }

        #[test]
        fn unbreakable_cells_never_change(codes in arb_level(), play in arb_play()) {
            let mut w = WorldState::from_codes("prop", &codes).unwrap();
            let before = walls(&w);
            for window in play {
                for dir in window {
                    w.push_input(dir);
                }
                advance_tick(&mut w).unwrap();
                prop_assert_eq!(&walls(&w), &before);
            }
        }

        #[test]
        fn loaded_level_reads_back_unchanged(codes in arb_level()) {
            let w = WorldState::from_codes("prop", &codes).unwrap();
            prop_assert_eq!(w.to_codes(), codes);
        }

        #[test]
        fn restart_restores_loaded_level(codes in arb_level(), play in arb_play()) {
            let mut w = WorldState::from_codes("prop", &codes).unwrap();
            for window in play {
                for dir in window {
                    w.push_input(dir);
                }
                advance_tick(&mut w).unwrap();
            }
            w.restart();
            prop_assert_eq!(w.to_codes(), codes);
            prop_assert_eq!(w.tick(), 0);
        }

        #[test]
        fn rock_descends_exactly_one_row_per_tick(depth in 1usize..8, col in 1usize..4) {
            // Walled shaft: rock at the top, `depth` empty cells, floor.
            let height = depth + 3;
            let mut codes = vec![vec![2u8; 5]; height];
            for line in codes.iter_mut().take(height - 1).skip(2) {
                line[col] = 0;
            }
            codes[1][col] = 4;
            codes[1][if col == 1 { 3 } else { 1 }] = 3;
            let mut w = WorldState::from_codes("shaft", &codes).unwrap();

            for n in 1..=depth {
                advance_tick(&mut w).unwrap();
                prop_assert_eq!(w.tile_at(Pos::new(1 + n, col)).unwrap(), Tile::Rock(FallState::Falling));
                prop_assert_eq!(w.tile_at(Pos::new(n, col)).unwrap(), Tile::Empty);
            }
            advance_tick(&mut w).unwrap();
            prop_assert_eq!(w.tile_at(Pos::new(1 + depth, col)).unwrap(), Tile::Rock(FallState::Resting));
        }
    }
}
