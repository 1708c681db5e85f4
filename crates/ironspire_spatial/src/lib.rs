#![warn(trivial_casts, trivial_numeric_casts, unused_lifetimes, unreachable_pub)]

//! The tile lattice (C3): per-tile object and watcher membership, and the
//! sight-radius neighborhood queries replication (C8) builds spawn/despawn
//! batches from.

pub mod grid;
pub mod tile;
pub mod tile_pos;

pub use grid::{Grid, TileChangeEvent};
pub use tile::Tile;
pub use tile_pos::{TilePos, TILE_SIZE};
