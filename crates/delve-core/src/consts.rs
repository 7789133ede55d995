//! Generation constants

/// Default grid dimensions (cells)
pub const DEFAULT_GRID_WIDTH: i32 = 80;
pub const DEFAULT_GRID_HEIGHT: i32 = 60;

/// Default pixel size of one cell, for renderers
pub const DEFAULT_TILE_SIZE: u32 = 16;

/// Smallest accepted grid side
pub const MIN_GRID_DIMENSION: i32 = 8;

/// Largest accepted grid side; keeps `width * height` well inside `i32`
pub const MAX_GRID_DIMENSION: i32 = 4096;

/// Random origins tried per room by scatter arrangement
pub const PLACEMENT_ATTEMPTS: u32 = 100;

/// Empty cells between neighbouring rooms on a spaceship spine
pub const SPINE_SPACING: i32 = 2;

/// Left-to-right index of the spine room that carries the wings
pub const WING_ANCHOR_INDEX: usize = 2;

/// Cave automaton parameters
pub const CAVE_FILL_PERCENT: u32 = 45;
pub const CAVE_SMOOTHING_PASSES: usize = 4;
pub const CAVE_WALL_THRESHOLD: usize = 5;

/// Cave corridor random walk parameters
pub const CAVE_WALK_MAX_STEPS: u32 = 2000;
pub const CAVE_WALK_BIAS: f64 = 0.7;

/// Items furnished per non-endpoint room
pub const MIN_ITEMS_PER_ROOM: u32 = 2;
pub const MAX_ITEMS_PER_ROOM: u32 = 6;

/// Salt mixed with a room id to seed its cave automaton
pub const CAVE_SEED_SALT: u64 = 0x4341_5645;
