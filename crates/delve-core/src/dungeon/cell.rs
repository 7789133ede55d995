//! Per-cell view of a finished level
//!
//! [`TileMap`] is a read-only rasterisation for renderers and tests. It is
//! rebuilt from a [`Level`] on demand and never fed back into generation.

use core::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::geometry::Tile;
use super::level::Level;

bitflags! {
    /// What occupies a grid cell
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TileFlags: u8 {
        const EMPTY = 0x00;
        const FLOOR = 0x01;
        const BOUNDARY = 0x02;
        const CORRIDOR = 0x04;
        const ENEMY = 0x08;
        const ARTIFACT = 0x10;
        const ITEM = 0x20;
    }
}

// Manual serde impl for TileFlags
impl Serialize for TileFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TileFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(TileFlags::from_bits_truncate(bits))
    }
}

impl TileFlags {
    /// Display character, occupants first
    pub const fn symbol(self) -> char {
        if self.contains(TileFlags::ENEMY) {
            'E'
        } else if self.contains(TileFlags::ARTIFACT) {
            '$'
        } else if self.contains(TileFlags::ITEM) {
            'i'
        } else if self.contains(TileFlags::BOUNDARY) {
            '+'
        } else if self.contains(TileFlags::FLOOR) {
            '.'
        } else if self.contains(TileFlags::CORRIDOR) {
            '#'
        } else {
            ' '
        }
    }

    /// Check if a walker could stand here
    pub const fn is_walkable(self) -> bool {
        self.intersects(TileFlags::FLOOR.union(TileFlags::CORRIDOR))
    }
}

/// Grid of cell flags, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    width: i32,
    height: i32,
    cells: Vec<TileFlags>,
}

impl TileMap {
    /// Empty map
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![TileFlags::EMPTY; width as usize * height as usize],
        }
    }

    /// Rasterise rooms, corridor paths and positioned occupants
    pub fn from_level(level: &Level) -> Self {
        let mut map = Self::new(level.grid.width, level.grid.height);
        for room in &level.rooms {
            if let Ok(geometry) = room.try_geometry() {
                for tile in geometry.interior().iter() {
                    map.insert(tile, TileFlags::FLOOR);
                }
                for tile in geometry.boundary().iter() {
                    map.insert(tile, TileFlags::BOUNDARY);
                }
            }
            for tile in room.enemies.iter().filter_map(|e| e.position()) {
                map.insert(tile, TileFlags::ENEMY);
            }
            for tile in room.artifacts.iter().filter_map(|a| a.position()) {
                map.insert(tile, TileFlags::ARTIFACT);
            }
            for tile in room.items.iter().filter_map(|i| i.position()) {
                map.insert(tile, TileFlags::ITEM);
            }
        }
        for corridor in &level.corridors {
            for &tile in corridor.path() {
                map.insert(tile, TileFlags::CORRIDOR);
            }
        }
        map
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn index(&self, tile: Tile) -> Option<usize> {
        if tile.x < 0 || tile.y < 0 || tile.x >= self.width || tile.y >= self.height {
            return None;
        }
        Some(tile.y as usize * self.width as usize + tile.x as usize)
    }

    /// Flags at a cell; empty outside the map
    pub fn get(&self, tile: Tile) -> TileFlags {
        self.index(tile)
            .map_or(TileFlags::EMPTY, |idx| self.cells[idx])
    }

    /// Add flags to a cell; cells outside the map are ignored
    pub fn insert(&mut self, tile: Tile, flags: TileFlags) {
        if let Some(idx) = self.index(tile) {
            self.cells[idx] |= flags;
        }
    }

    /// Number of cells carrying all of `flags`
    pub fn count(&self, flags: TileFlags) -> usize {
        self.cells.iter().filter(|c| c.contains(flags)).count()
    }

    /// One line of symbols per row
    pub fn to_ascii(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TileMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width {
                write!(f, "{}", self.get(Tile::new(x, y)).symbol())?;
            }
        }
        Ok(())
    }
}
