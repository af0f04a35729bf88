/// Pending directional commands, filled by the input collaborators and
/// drained by the engine once per tick.
///
/// The queue is a stack: the most recently pushed direction is applied
/// first. Two keys pressed within one tick window therefore resolve in
/// reverse press order, and that order is visible to the player.

use crate::domain::coord::Direction;

#[derive(Clone, Debug, Default)]
pub struct InputQueue {
    pending: Vec<Direction>,
}

impl InputQueue {
    pub fn new() -> Self {
        InputQueue { pending: Vec::with_capacity(8) }
    }

    pub fn push(&mut self, dir: Direction) {
        self.pending.push(dir);
    }

    /// Most recent command first.
    pub fn pop(&mut self) -> Option<Direction> {
        self.pending.pop()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_most_recent_first() {
        let mut q = InputQueue::new();
        q.push(Direction::Left);
        q.push(Direction::Up);
        q.push(Direction::Right);
        assert_eq!(q.len(), 3);
        assert_eq!(q.pop(), Some(Direction::Right));
        assert_eq!(q.pop(), Some(Direction::Up));
        assert_eq!(q.pop(), Some(Direction::Left));
        assert_eq!(q.pop(), None);
        assert!(q.is_empty());
    }
}
