//! Generated level

use serde::{Deserialize, Serialize};

use crate::config::GridConfig;
use crate::errors::GenerationError;

use super::cell::TileMap;
use super::corridor::{corridors_connect_all, Corridor};
use super::layout::DungeonStyle;
use super::room::{Room, RoomId};

/// Result of one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub style: DungeonStyle,
    pub grid: GridConfig,
    /// Seed that reproduces this level
    pub seed: u64,
    pub rooms: Vec<Room>,
    /// Corridors in routing order; ends are indices into `rooms`
    pub corridors: Vec<Corridor>,
    /// Recoverable problems met during the run
    pub warnings: Vec<GenerationError>,
}

impl Level {
    /// Check if the corridors join every room into one component
    pub fn is_connected(&self) -> bool {
        corridors_connect_all(self.rooms.len(), &self.corridors)
    }

    pub fn room_by_id(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }

    /// The two rooms a corridor joins
    pub fn corridor_rooms(&self, corridor: &Corridor) -> (&Room, &Room) {
        (&self.rooms[corridor.start], &self.rooms[corridor.end])
    }

    /// Corridors touching the room at `index`
    pub fn corridors_of(&self, index: usize) -> impl Iterator<Item = &Corridor> + '_ {
        self.corridors
            .iter()
            .filter(move |c| c.other_end(index).is_some())
    }

    /// Total enemies, artifacts and items
    pub fn occupant_count(&self) -> usize {
        self.rooms.iter().map(Room::occupant_count).sum()
    }

    /// Rasterise the level into per-cell flags
    pub fn tile_map(&self) -> TileMap {
        TileMap::from_level(self)
    }
}
