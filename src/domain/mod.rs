pub mod fall;
pub mod grid;
pub mod rules;
pub mod tile;
