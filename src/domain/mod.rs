pub mod coord;
pub mod fall;
pub mod keys;
pub mod rules;
pub mod tile;
