/// Key/lock pairing.
///
/// Exactly two colors exist. Picking up `Key(c)` erases every `Lock(c)`
/// on the map; the other color's locks are untouched.

use super::tile::Tile;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum KeyColor {
    /// Yellow, level codes 8 (key) / 9 (lock).
    One,
    /// Blue, level codes 10 (key) / 11 (lock).
    Two,
}

impl KeyColor {
    /// The lock color this key opens.
    pub fn opens(self) -> KeyColor {
        self
    }

    pub fn name(self) -> &'static str {
        match self {
            KeyColor::One => "yellow",
            KeyColor::Two => "blue",
        }
    }
}

/// Replace every lock opened by `key` with `Empty`, scanning row-major.
/// Returns how many locks were removed.
pub fn remove_locks(tiles: &mut [Vec<Tile>], key: KeyColor) -> usize {
    let target = key.opens();
    let mut removed = 0;
    for row in tiles.iter_mut() {
        for tile in row.iter_mut() {
            if tile.is_lock(target) {
                *tile = Tile::Empty;
                removed += 1;
            }
        }
    }
    removed
}
