/// Keyboard input.
///
/// Every key press (and auto-repeat) becomes one `Command`, in the order
/// the terminal delivered them. Movement keys feed the engine's input
/// queue one direction per press; nothing here applies a move itself.
///
/// Uses crossterm's keyboard enhancement for Release events when available;
/// releases are ignored, only presses count.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::coord::Direction;

/// Abstract command for the main loop.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move(Direction),
    Restart,
    NextLevel,
    PrevLevel,
    Quit,
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_NEXT: &[KeyCode] = &[KeyCode::Char('n'), KeyCode::Char('N')];
const KEYS_PREV: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

/// Translate one key event. Releases and unmapped keys yield `None`.
pub fn translate(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && (key.code == KeyCode::Char('c') || key.code == KeyCode::Char('C'))
    {
        return Some(Command::Quit);
    }

    let code = &key.code;
    if KEYS_LEFT.contains(code) {
        Some(Command::Move(Direction::Left))
    } else if KEYS_RIGHT.contains(code) {
        Some(Command::Move(Direction::Right))
    } else if KEYS_UP.contains(code) {
        Some(Command::Move(Direction::Up))
    } else if KEYS_DOWN.contains(code) {
        Some(Command::Move(Direction::Down))
    } else if KEYS_RESTART.contains(code) {
        Some(Command::Restart)
    } else if KEYS_NEXT.contains(code) {
        Some(Command::NextLevel)
    } else if KEYS_PREV.contains(code) {
        Some(Command::PrevLevel)
    } else if KEYS_QUIT.contains(code) {
        Some(Command::Quit)
    } else {
        None
    }
}

pub struct InputState {
    /// Commands translated during the most recent `drain_events()` call,
    /// oldest first.
    commands: Vec<Command>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            commands: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.commands.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if let Some(cmd) = translate(&key) {
                    self.commands.push(cmd);
                }
            }
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        assert_eq!(translate(&press(KeyCode::Left)), Some(Command::Move(Direction::Left)));
        assert_eq!(translate(&press(KeyCode::Char('a'))), Some(Command::Move(Direction::Left)));
        assert_eq!(translate(&press(KeyCode::Char('w'))), Some(Command::Move(Direction::Up)));
        assert_eq!(translate(&press(KeyCode::Right)), Some(Command::Move(Direction::Right)));
        assert_eq!(translate(&press(KeyCode::Char('S'))), Some(Command::Move(Direction::Down)));
    }

    #[test]
    fn meta_keys() {
        assert_eq!(translate(&press(KeyCode::Char('r'))), Some(Command::Restart));
        assert_eq!(translate(&press(KeyCode::Char('n'))), Some(Command::NextLevel));
        assert_eq!(translate(&press(KeyCode::Char('p'))), Some(Command::PrevLevel));
        assert_eq!(translate(&press(KeyCode::Esc)), Some(Command::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(translate(&ctrl_c), Some(Command::Quit));
    }

    #[test]
    fn release_and_unmapped_keys_ignored() {
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Left,
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        assert_eq!(translate(&release), None);
        assert_eq!(translate(&press(KeyCode::Char('z'))), None);
        assert_eq!(translate(&press(KeyCode::Char('c'))), None);
    }
}
