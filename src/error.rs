/// Error types.
///
/// Illegal moves are NOT errors (they are ordinary game outcomes).
/// Only malformed level data and broken grid invariants end up here,
/// and both are fatal for the session.

use std::path::PathBuf;

use thiserror::Error;

/// Level data could not be turned into a playable grid.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("unrecognized tile code {code} at row {row}, column {col}")]
    UnknownCode { row: usize, col: usize, code: u8 },
    #[error("invalid token {token:?} at row {row}, column {col}")]
    BadToken { row: usize, col: usize, token: String },
    #[error("level has no player marker")]
    NoPlayer,
    #[error("level has {count} player markers, expected exactly one")]
    MultiplePlayers { count: usize },
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A simulation invariant was violated at runtime.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    /// A move or gravity step reached past the grid edge. Levels must be
    /// enclosed by unbreakable tiles for this to be impossible.
    #[error("grid access out of bounds at row {row}, column {col}")]
    OutOfBounds { row: isize, col: isize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_cell() {
        let e = LevelError::UnknownCode { row: 2, col: 5, code: 42 };
        assert_eq!(e.to_string(), "unrecognized tile code 42 at row 2, column 5");

        let e = SimError::OutOfBounds { row: -1, col: 3 };
        assert_eq!(e.to_string(), "grid access out of bounds at row -1, column 3");
    }
}
