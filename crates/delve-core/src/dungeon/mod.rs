//! Dungeon system
//!
//! Contains room geometry, room arrangement, the corridor graph, corridor
//! routing and the generation pipeline that ties them together.

mod arrange;
mod cell;
mod corridor;
mod factory;
mod generation;
mod geometry;
mod layout;
mod level;
mod pathing;
mod populate;
mod room;

pub use cell::{TileFlags, TileMap};
pub use corridor::{build_corridor_graph, corridors_connect_all, Corridor, CorridorKind, UnionFind};
pub use generation::DungeonGenerator;
pub use geometry::{Bounds, CaveGrid, RoomGeometry, Tile, TileSet, ORTHOGONAL};
pub use layout::{DungeonStyle, Route};
pub use level::Level;
pub use pathing::{biased_walk, find_path, stepped_path, BlockedTiles, Walk};
pub use room::{Room, RoomId, RoomShape, RoomSize, RoomType};
