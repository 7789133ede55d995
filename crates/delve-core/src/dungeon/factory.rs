//! Room construction from configuration records

use tracing::debug;

use crate::config::{GenerationConfig, GridConfig, RoomConfig};
use crate::errors::{GenerationError, Warnings};
use crate::occupant::{Artifact, ArtifactName, Enemy, EnemyType};
use crate::pool::WeightedPool;
use crate::rng::RandomSource;

use super::room::{Room, RoomId, RoomSize, RoomType};

/// Builds unpositioned rooms and their enemies and artifacts
///
/// Owns the room id counter; a new factory is made for every run, so ids
/// start at zero each time and are never reused within a run.
#[derive(Debug)]
pub(crate) struct RoomFactory {
    next_id: u32,
    grid: GridConfig,
    enemies: WeightedPool<EnemyType>,
    artifacts: WeightedPool<ArtifactName>,
}

impl RoomFactory {
    /// Build the enemy and artifact pools from `config`.
    ///
    /// An empty pool is reported once here; rooms then get no occupants
    /// of that kind.
    pub(crate) fn new(config: &GenerationConfig, warnings: &mut Warnings) -> Self {
        let enemies = WeightedPool::new(
            "enemies",
            config.enemies.iter().map(|e| (e.enemy_type, e.weight)),
        );
        let artifacts = WeightedPool::new(
            "artifacts",
            config.artifacts.iter().map(|a| (a.name, a.weight)),
        );
        if enemies.is_empty() {
            warnings.push(GenerationError::EmptyPool {
                pool: enemies.name().into(),
            });
        }
        if artifacts.is_empty() {
            warnings.push(GenerationError::EmptyPool {
                pool: artifacts.name().into(),
            });
        }

        Self {
            next_id: 0,
            grid: config.grid,
            enemies,
            artifacts,
        }
    }

    fn next_id(&mut self) -> RoomId {
        let id = RoomId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Width and height for a new room. Entrance and Exit are single
    /// cells; other rooms draw from their size class.
    pub fn room_dimensions(
        &self,
        room_type: RoomType,
        size: RoomSize,
        rng: &mut RandomSource,
    ) -> (i32, i32) {
        if room_type.is_endpoint() {
            return (1, 1);
        }
        let w = size.side_range(self.grid.width);
        let h = size.side_range(self.grid.height);
        (rng.range(w.start, w.end), rng.range(h.start, h.end))
    }

    /// Create every room a record asks for, in record order
    pub fn build_rooms(&mut self, records: &[RoomConfig], rng: &mut RandomSource) -> Vec<Room> {
        let mut rooms = Vec::new();
        for record in records {
            let count = rng.range_inclusive(record.min_count, record.max_count);
            debug!(record = %record.id, count, "building rooms");
            for _ in 0..count {
                rooms.push(self.build_room(record, rng));
            }
        }
        rooms
    }

    /// Create one unpositioned room with its enemies and artifacts drawn
    pub fn build_room(&mut self, record: &RoomConfig, rng: &mut RandomSource) -> Room {
        let (width, height) = self.room_dimensions(record.room_type, record.size, rng);
        let mut room = Room::new(self.next_id(), record.room_type, record.size, width, height);

        let enemy_count = rng.range_inclusive(record.min_enemies, record.max_enemies);
        let artifact_count = rng.range_inclusive(record.min_artifacts, record.max_artifacts);
        if !self.enemies.is_empty() {
            for _ in 0..enemy_count {
                if let Ok(kind) = self.enemies.sample(rng) {
                    room.enemies.push(Enemy::new(kind));
                }
            }
        }
        if !self.artifacts.is_empty() {
            for _ in 0..artifact_count {
                if let Ok(name) = self.artifacts.sample(rng) {
                    room.artifacts.push(Artifact::new(name));
                }
            }
        }
        room
    }
}
