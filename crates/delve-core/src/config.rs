//! Configuration records consumed by the generator
//!
//! These are plain data. Loading them from disk is the caller's business;
//! the records derive serde so any loader (the `delve` binary reads JSON)
//! can produce them. [`GenerationConfig::validate`] must pass before a run
//! starts.

use serde::{Deserialize, Serialize};

use crate::dungeon::{DungeonStyle, RoomSize, RoomType};
use crate::errors::GenerationError;
use crate::occupant::{ArtifactName, EnemyType, ItemCategory, Placement};
use crate::{
    DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_TILE_SIZE, MAX_GRID_DIMENSION,
    MIN_GRID_DIMENSION,
};

/// Grid parameters, fixed for the duration of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Pixel size of one cell, for renderers
    pub tile_size: u32,
    /// Grid width in cells
    pub width: i32,
    /// Grid height in cells
    pub height: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
        }
    }
}

impl GridConfig {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Check if a cell lies on the grid
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn validate(&self) -> Result<(), GenerationError> {
        if self.width < MIN_GRID_DIMENSION || self.height < MIN_GRID_DIMENSION {
            return Err(GenerationError::config(
                "grid",
                format!(
                    "grid must be at least {MIN_GRID_DIMENSION}x{MIN_GRID_DIMENSION}, got {}x{}",
                    self.width, self.height
                ),
            ));
        }
        if self.width > MAX_GRID_DIMENSION || self.height > MAX_GRID_DIMENSION {
            return Err(GenerationError::config(
                "grid",
                format!(
                    "grid must be at most {MAX_GRID_DIMENSION}x{MAX_GRID_DIMENSION}, got {}x{}",
                    self.width, self.height
                ),
            ));
        }
        if self.tile_size == 0 {
            return Err(GenerationError::config("grid", "tile size must be positive"));
        }
        Ok(())
    }
}

/// How many rooms of one type to create, and what they contain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    pub id: String,
    pub room_type: RoomType,
    pub size: RoomSize,
    pub min_count: u32,
    pub max_count: u32,
    #[serde(default)]
    pub min_enemies: u32,
    #[serde(default)]
    pub max_enemies: u32,
    #[serde(default)]
    pub min_artifacts: u32,
    #[serde(default)]
    pub max_artifacts: u32,
    pub style: DungeonStyle,
}

impl RoomConfig {
    /// A room record with no enemies or artifacts
    pub fn new(
        id: impl Into<String>,
        room_type: RoomType,
        size: RoomSize,
        count: (u32, u32),
        style: DungeonStyle,
    ) -> Self {
        Self {
            id: id.into(),
            room_type,
            size,
            min_count: count.0,
            max_count: count.1,
            min_enemies: 0,
            max_enemies: 0,
            min_artifacts: 0,
            max_artifacts: 0,
            style,
        }
    }

    pub fn with_enemies(mut self, min: u32, max: u32) -> Self {
        self.min_enemies = min;
        self.max_enemies = max;
        self
    }

    pub fn with_artifacts(mut self, min: u32, max: u32) -> Self {
        self.min_artifacts = min;
        self.max_artifacts = max;
        self
    }

    fn validate(&self) -> Result<(), GenerationError> {
        check_id(&self.id)?;
        check_range(&self.id, "room count", self.min_count, self.max_count)?;
        check_range(&self.id, "enemy count", self.min_enemies, self.max_enemies)?;
        check_range(&self.id, "artifact count", self.min_artifacts, self.max_artifacts)
    }
}

/// Weighted enemy entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyConfig {
    pub id: String,
    pub enemy_type: EnemyType,
    pub weight: u32,
    pub style: DungeonStyle,
}

/// Weighted artifact entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactConfig {
    pub id: String,
    pub name: ArtifactName,
    pub weight: u32,
    pub style: DungeonStyle,
}

/// Weighted item entry with room affinity and placement rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemConfig {
    pub id: String,
    pub name: String,
    pub category: ItemCategory,
    /// Room type this item belongs in; `None` accepts any room
    #[serde(default)]
    pub room_type: Option<RoomType>,
    #[serde(default)]
    pub placement: Placement,
    pub weight: u32,
    pub style: DungeonStyle,
}

impl ItemConfig {
    /// Check if this item may furnish a room of the given type
    pub fn fits(&self, room_type: RoomType) -> bool {
        self.room_type.is_none_or(|wanted| wanted == room_type)
    }
}

/// Everything one run needs: grid parameters plus the four record lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
    #[serde(default)]
    pub enemies: Vec<EnemyConfig>,
    #[serde(default)]
    pub artifacts: Vec<ArtifactConfig>,
    #[serde(default)]
    pub items: Vec<ItemConfig>,
}

impl GenerationConfig {
    /// Check grid dimensions, identifiers and every count range
    pub fn validate(&self) -> Result<(), GenerationError> {
        self.grid.validate()?;
        for room in &self.rooms {
            room.validate()?;
        }
        for enemy in &self.enemies {
            check_id(&enemy.id)?;
        }
        for artifact in &self.artifacts {
            check_id(&artifact.id)?;
        }
        for item in &self.items {
            check_id(&item.id)?;
            if item.name.trim().is_empty() {
                return Err(GenerationError::config(&item.id, "item name is empty"));
            }
        }
        Ok(())
    }

    /// Copy of this configuration keeping only records tagged with `style`
    pub fn for_style(&self, style: DungeonStyle) -> GenerationConfig {
        GenerationConfig {
            grid: self.grid,
            rooms: self.rooms.iter().filter(|r| r.style == style).cloned().collect(),
            enemies: self.enemies.iter().filter(|e| e.style == style).cloned().collect(),
            artifacts: self.artifacts.iter().filter(|a| a.style == style).cloned().collect(),
            items: self.items.iter().filter(|i| i.style == style).cloned().collect(),
        }
    }
}

fn check_id(id: &str) -> Result<(), GenerationError> {
    if id.trim().is_empty() {
        return Err(GenerationError::config("<unnamed>", "record identifier is empty"));
    }
    Ok(())
}

fn check_range(id: &str, what: &str, min: u32, max: u32) -> Result<(), GenerationError> {
    if min > max {
        return Err(GenerationError::config(
            id,
            format!("{what} range is inverted (min {min} > max {max})"),
        ));
    }
    Ok(())
}
