//! delve-core: procedural tile-grid level generation
//!
//! This crate contains the generation engine with no I/O dependencies:
//! room geometry, room arrangement, the corridor graph, corridor routing and
//! occupant placement. Configuration loading and rendering live elsewhere;
//! they exchange plain data with [`DungeonGenerator`].
//!
//! ```no_run
//! use delve_core::{DungeonGenerator, DungeonStyle, GenerationConfig};
//!
//! let config = GenerationConfig::default();
//! let level = DungeonGenerator::new(DungeonStyle::Dungeon, 42)
//!     .generate(&config)
//!     .expect("valid configuration");
//! println!("{} rooms, {} corridors", level.rooms.len(), level.corridors.len());
//! ```

pub mod config;
pub mod dungeon;
pub mod errors;
pub mod occupant;
pub mod pool;

mod consts;
mod rng;

pub use config::{ArtifactConfig, EnemyConfig, GenerationConfig, GridConfig, ItemConfig, RoomConfig};
pub use consts::*;
pub use dungeon::{
    Corridor, CorridorKind, DungeonGenerator, DungeonStyle, Level, Room, RoomId, RoomShape,
    RoomSize, RoomType, Tile, TileMap,
};
pub use errors::{GenerationError, PlacementFailure, RoutingFailure};
pub use occupant::{Artifact, ArtifactName, Enemy, EnemyType, Item, ItemCategory, Placement};
pub use pool::WeightedPool;
pub use rng::RandomSource;
