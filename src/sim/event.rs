/// Events emitted during a simulation tick.
/// The presentation layer consumes these for the status line.

use crate::domain::coord::{Direction, Pos};
use crate::domain::keys::KeyColor;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    PlayerMoved { to: Pos },
    TilePushed { from: Pos, to: Pos },
    KeyPicked { color: KeyColor },
    LocksOpened { color: KeyColor, count: usize },
    MoveBlocked { dir: Direction },
    /// The player bumped a falling rock/box. Same effect as blocked.
    PushIgnored { dir: Direction },
    /// A falling rock/box came to rest this tick.
    TileLanded { at: Pos },
}

impl GameEvent {
    /// One-line description for the HUD.
    pub fn describe(&self) -> String {
        match self {
            GameEvent::PlayerMoved { to } => format!("moved to {},{}", to.row, to.col),
            GameEvent::TilePushed { to, .. } => format!("pushed to {},{}", to.row, to.col),
            GameEvent::KeyPicked { color } => format!("picked up {} key", color.name()),
            GameEvent::LocksOpened { color, count } => {
                format!("{} {} lock(s) opened", count, color.name())
            }
            GameEvent::MoveBlocked { dir } => format!("blocked ({})", dir.name()),
            GameEvent::PushIgnored { dir } => format!("it's falling! ({})", dir.name()),
            GameEvent::TileLanded { at } => format!("thud at {},{}", at.row, at.col),
        }
    }
}
