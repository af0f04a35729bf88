/// Level loader.
///
/// ## Sources (in order):
///   1. Built-in embedded levels
///   2. `levels/` directory (individual `.txt` files, sorted by filename)
///
/// A level file given on the command line replaces both.
///
/// ## Level file format (`.txt`):
///   Optional line 1: `# Level Name`
///   Remaining lines: rows of tile codes separated by spaces and/or commas.
///   Blank lines are ignored.
///
/// ## Tile codes:
///   0 = Empty          1 = Inert          2 = Unbreakable    3 = Player
///   4 = Rock           5 = Rock (falling) 6 = Box            7 = Box (falling)
///   8 = Key 1          9 = Lock 1        10 = Key 2         11 = Lock 2
///
/// Parsing only checks that every token is a number; shape, codes and the
/// single-player rule are enforced by `WorldState::from_codes`.

use std::path::Path;

use log::{info, warn};

use crate::config::GameConfig;
use crate::error::LevelError;
use super::world::WorldState;

/// Raw level data (owned, loaded from file or embedded).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelDef {
    pub name: String,
    pub codes: Vec<Vec<u8>>,
}

/// The playable levels of a session and which one is active.
pub struct LevelSet {
    levels: Vec<LevelDef>,
    current: usize,
}

impl LevelSet {
    pub fn new(levels: Vec<LevelDef>) -> Self {
        LevelSet { levels, current: 0 }
    }

    pub fn current(&self) -> &LevelDef {
        &self.levels[self.current]
    }

    /// Zero-based index of the active level.
    pub fn index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Advance to the next level, wrapping around.
    pub fn advance(&mut self) -> &LevelDef {
        self.current = (self.current + 1) % self.levels.len();
        self.current()
    }

    /// Step back to the previous level, wrapping around.
    pub fn retreat(&mut self) -> &LevelDef {
        self.current = (self.current + self.levels.len() - 1) % self.levels.len();
        self.current()
    }
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Embedded levels followed by every valid level in `levels_dir`.
/// Invalid files are skipped with a warning.
pub fn collect_levels(config: &GameConfig) -> LevelSet {
    let mut levels = embedded_levels();

    let dir = &config.levels_dir;
    if dir.is_dir() {
        let mut found = load_from_directory(dir);
        found.sort_by(|a, b| a.0.cmp(&b.0));
        for (file, def) in found {
            match WorldState::from_level(&def) {
                Ok(_) => levels.push(def),
                Err(e) => warn!("skipping level {file}: {e}"),
            }
        }
    }

    info!("{} level(s) available", levels.len());
    LevelSet::new(levels)
}

/// Load a single level file. Errors are fatal for the caller.
pub fn load_file(path: &Path) -> Result<LevelDef, LevelError> {
    let content = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut def = parse_level_file(&content)?;
    if def.name.is_empty() {
        def.name = path.file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
    }
    WorldState::from_level(&def)?;
    Ok(def)
}

// ══════════════════════════════════════════════════════════════
// Single-level file parsing
// ══════════════════════════════════════════════════════════════

/// Parse a single level from text content.
/// An unnamed level gets an empty name; callers fill in a fallback.
pub fn parse_level_file(content: &str) -> Result<LevelDef, LevelError> {
    let mut name = String::new();
    let mut codes = vec![];

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix('#') {
            if name.is_empty() && codes.is_empty() {
                name = rest.trim().to_string();
            }
            continue;
        }

        let row = codes.len();
        let mut out = vec![];
        for (col, token) in trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .enumerate()
        {
            let code = token.parse::<u8>().map_err(|_| LevelError::BadToken {
                row,
                col,
                token: token.to_string(),
            })?;
            out.push(code);
        }
        codes.push(out);
    }

    if codes.is_empty() {
        return Err(LevelError::Empty);
    }
    Ok(LevelDef { name, codes })
}

// ══════════════════════════════════════════════════════════════
// Directory loading (individual .txt files)
// ══════════════════════════════════════════════════════════════

fn load_from_directory(dir: &Path) -> Vec<(String, LevelDef)> {
    let mut results = vec![];

    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            warn!("could not read {}: {e}", dir.display());
            return results;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().map_or(false, |e| e == "txt") {
            let filename = path.file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            let parsed = std::fs::read_to_string(&path)
                .map_err(|source| LevelError::Io { path: path.clone(), source })
                .and_then(|content| parse_level_file(&content));
            match parsed {
                Ok(mut def) => {
                    if def.name.is_empty() {
                        def.name = filename.trim_end_matches(".txt").to_string();
                    }
                    results.push((filename, def));
                }
                Err(e) => warn!("skipping level {filename}: {e}"),
            }
        }
    }

    results
}

// ══════════════════════════════════════════════════════════════
// Embedded levels
// ══════════════════════════════════════════════════════════════

fn embedded_levels() -> Vec<LevelDef> {
    vec![
        make_embedded("Level 1 - First Steps", &[
            &[2, 2, 2, 2, 2, 2, 2, 2],
            &[2, 3, 0, 1, 1, 2, 0, 2],
            &[2, 4, 2, 6, 1, 2, 0, 2],
            &[2, 8, 4, 1, 1, 2, 0, 2],
            &[2, 4, 1, 1, 1, 9, 0, 2],
            &[2, 2, 2, 2, 2, 2, 2, 2],
        ]),
        make_embedded("Level 2 - Two Keys", &[
            &[2, 2, 2, 2, 2, 2, 2, 2, 2, 2],
            &[2, 3, 0, 0, 4, 0, 0, 0, 10, 2],
            &[2, 2, 2, 0, 0, 0, 2, 2, 2, 2],
            &[2, 8, 1, 0, 6, 0, 1, 0, 0, 2],
            &[2, 2, 0, 0, 2, 0, 2, 11, 0, 2],
            &[2, 0, 0, 9, 0, 0, 0, 2, 0, 2],
            &[2, 2, 2, 2, 2, 2, 2, 2, 2, 2],
        ]),
        make_embedded("Level 3 - Rockfall", &[
            &[2, 2, 2, 2, 2, 2, 2, 2],
            &[2, 5, 4, 5, 4, 5, 0, 2],
            &[2, 0, 0, 0, 0, 0, 0, 2],
            &[2, 1, 1, 0, 1, 1, 1, 2],
            &[2, 3, 1, 0, 1, 8, 9, 2],
            &[2, 2, 2, 2, 2, 2, 2, 2],
        ]),
    ]
}

fn make_embedded(name: &str, rows: &[&[u8]]) -> LevelDef {
    LevelDef {
        name: name.to_string(),
        codes: rows.iter().map(|r| r.to_vec()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_levels_are_valid() {
        for def in embedded_levels() {
            let world = WorldState::from_level(&def);
            assert!(world.is_ok(), "{}: {:?}", def.name, world.err());
        }
    }

    #[test]
    fn parses_name_and_rows() {
        let def = parse_level_file("# Tiny\n2 2 2\n2, 3, 2\n\n2 2 2\n").unwrap();
        assert_eq!(def.name, "Tiny");
        assert_eq!(def.codes, vec![vec![2, 2, 2], vec![2, 3, 2], vec![2, 2, 2]]);
    }

    #[test]
    fn unnamed_level_has_empty_name() {
        let def = parse_level_file("3 0\n").unwrap();
        assert!(def.name.is_empty());
        assert_eq!(def.codes, vec![vec![3, 0]]);
    }

    #[test]
    fn rejects_non_numeric_tokens() {
        let err = parse_level_file("2 2\n2 x\n").unwrap_err();
        assert!(matches!(err, LevelError::BadToken { row: 1, col: 1, ref token } if token == "x"));
        let err = parse_level_file("2 300\n").unwrap_err();
        assert!(matches!(err, LevelError::BadToken { row: 0, col: 1, .. }));
    }

    #[test]
    fn rejects_file_without_rows() {
        assert!(matches!(parse_level_file("# Just a name\n\n"), Err(LevelError::Empty)));
    }

    #[test]
    fn level_set_wraps_both_ways() {
        let mut set = LevelSet::new(embedded_levels());
        assert_eq!(set.len(), 3);
        assert_eq!(set.index(), 0);
        set.retreat();
        assert_eq!(set.index(), 2);
        set.advance();
        set.advance();
        assert_eq!(set.index(), 1);
        assert_eq!(set.current().name, "Level 2 - Two Keys");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_file(Path::new("/nonexistent/tilefall/level.txt")).unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
    }
}
