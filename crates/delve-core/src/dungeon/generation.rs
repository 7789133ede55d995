//! Level generation pipeline
//!
//! Validate, build rooms, arrange them, connect them, populate them, then
//! trace the corridors. Each stage only consumes what earlier stages made.

use tracing::{debug, info};

use crate::config::{GenerationConfig, GridConfig};
use crate::errors::{GenerationError, Warnings};
use crate::rng::RandomSource;

use super::corridor::{build_corridor_graph, Corridor};
use super::factory::RoomFactory;
use super::layout::DungeonStyle;
use super::level::Level;
use super::pathing::BlockedTiles;
use super::populate::{furnish, place_occupants};
use super::room::Room;

/// Generates levels of one style from one seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DungeonGenerator {
    style: DungeonStyle,
    seed: u64,
}

impl DungeonGenerator {
    pub fn new(style: DungeonStyle, seed: u64) -> Self {
        Self { style, seed }
    }

    /// Generator with a random seed; the seed is reported in every level
    pub fn from_entropy(style: DungeonStyle) -> Self {
        Self::new(style, RandomSource::from_entropy().seed())
    }

    pub fn style(&self) -> DungeonStyle {
        self.style
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run the whole pipeline
    ///
    /// Only an invalid configuration (or a broken internal contract) is an
    /// error. Everything else is recovered and listed in
    /// [`Level::warnings`]. The same seed and configuration always give the
    /// same level.
    pub fn generate(&self, config: &GenerationConfig) -> Result<Level, GenerationError> {
        config.validate()?;
        let config = config.for_style(self.style);
        let grid = config.grid;
        let mut rng = RandomSource::new(self.seed);
        let mut warnings = Warnings::default();

        info!(
            style = %self.style,
            seed = self.seed,
            width = grid.width,
            height = grid.height,
            "generating level"
        );

        let mut factory = RoomFactory::new(&config, &mut warnings);
        let rooms = factory.build_rooms(&config.rooms, &mut rng);
        debug!(count = rooms.len(), "rooms built");

        let mut rooms = self
            .style
            .arrange_rooms(rooms, &grid, &mut rng, &mut warnings);
        debug!(count = rooms.len(), "rooms arranged");

        let mut corridors = build_corridor_graph(&rooms)?;
        debug!(count = corridors.len(), "corridor graph built");

        furnish(&mut rooms, &config.items, &mut rng, &mut warnings);
        place_occupants(&mut rooms, &corridors, &rng, &mut warnings)?;

        self.route_corridors(&rooms, &mut corridors, &grid, &mut rng, &mut warnings);

        let warnings = warnings.into_vec();
        info!(
            rooms = rooms.len(),
            corridors = corridors.len(),
            warnings = warnings.len(),
            "level generated"
        );

        Ok(Level {
            style: self.style,
            grid,
            seed: self.seed,
            rooms,
            corridors,
            warnings,
        })
    }

    /// Trace corridors in list order; each path blocks the ones after it
    fn route_corridors(
        &self,
        rooms: &[Room],
        corridors: &mut [Corridor],
        grid: &GridConfig,
        rng: &mut RandomSource,
        warnings: &mut Warnings,
    ) {
        let mut blocked = BlockedTiles::from_rooms(rooms);
        for corridor in corridors.iter_mut() {
            let route = self
                .style
                .route_corridor(corridor, rooms, grid, &blocked, rng);
            if let Some(reason) = route.failure {
                warnings.push(GenerationError::RoutingFailed {
                    from: rooms[corridor.start].id,
                    to: rooms[corridor.end].id,
                    reason,
                });
            }
            blocked.add_path(&route.path);
            corridor.set_path(route.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnemyConfig, RoomConfig};
    use crate::dungeon::corridor::CorridorKind;
    use crate::dungeon::geometry::Tile;
    use crate::dungeon::pathing::find_path;
    use crate::dungeon::room::{RoomId, RoomShape};
    use crate::dungeon::{RoomSize, RoomType};
    use crate::occupant::EnemyType;

    fn square_room(id: u32, x: i32, y: i32) -> Room {
        let mut room = Room::new(RoomId(id), RoomType::Normal, RoomSize::Small, 5, 5);
        room.resolve_shape(|_| RoomShape::Rectangle);
        room.place(Tile::new(x, y), &mut RandomSource::new(u64::from(id)));
        room
    }

    fn small_config(style: DungeonStyle) -> GenerationConfig {
        GenerationConfig {
            grid: GridConfig::new(40, 30),
            rooms: vec![
                RoomConfig::new("in", RoomType::Entrance, RoomSize::Small, (1, 1), style),
                RoomConfig::new("out", RoomType::Exit, RoomSize::Small, (1, 1), style),
                RoomConfig::new("hall", RoomType::Normal, RoomSize::Medium, (2, 3), style)
                    .with_enemies(1, 2),
            ],
            enemies: vec![EnemyConfig {
                id: "rat".into(),
                enemy_type: EnemyType::GiantRat,
                weight: 1,
                style,
            }],
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn test_invalid_config_aborts() {
        let mut config = small_config(DungeonStyle::Dungeon);
        config.rooms[2].min_count = 9;
        let err = DungeonGenerator::new(DungeonStyle::Dungeon, 1)
            .generate(&config)
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_other_style_records_are_ignored() {
        let config = small_config(DungeonStyle::Cave);
        let level = DungeonGenerator::new(DungeonStyle::Dungeon, 1)
            .generate(&config)
            .unwrap();
        assert!(level.rooms.is_empty());
        assert!(level.corridors.is_empty());
    }

    #[test]
    fn test_every_style_connects() {
        for style in [DungeonStyle::Dungeon, DungeonStyle::Spaceship, DungeonStyle::Cave] {
            let level = DungeonGenerator::new(style, 17)
                .generate(&small_config(style))
                .unwrap();
            assert!(level.rooms.len() >= 2, "{style}: {:?}", level.warnings);
            assert!(level.is_connected(), "{style} level is not connected");
            assert_eq!(level.style, style);
            assert_eq!(level.seed, 17);
        }
    }

    #[test]
    fn test_same_seed_same_level() {
        let config = small_config(DungeonStyle::Cave);
        let generator = DungeonGenerator::new(DungeonStyle::Cave, 2024);
        assert_eq!(generator.generate(&config).unwrap(), generator.generate(&config).unwrap());
    }

    #[test]
    fn test_later_corridor_detours_around_earlier_one() {
        // A and B face each other across the middle row; C above and D
        // below want a straight vertical line through it
        let grid = GridConfig::new(40, 30);
        let rooms = vec![
            square_room(0, 2, 10),
            square_room(1, 30, 10),
            square_room(2, 16, 1),
            square_room(3, 16, 22),
        ];
        let mut corridors = vec![
            Corridor::new(0, 1, 28.0, CorridorKind::Spanning),
            Corridor::new(2, 3, 21.0, CorridorKind::Spanning),
        ];
        let mut warnings = Warnings::default();
        DungeonGenerator::new(DungeonStyle::Dungeon, 5).route_corridors(
            &rooms,
            &mut corridors,
            &grid,
            &mut RandomSource::new(5),
            &mut warnings,
        );
        assert_eq!(warnings.len(), 0);

        let first = corridors[0].path();
        assert_eq!(first.len(), 25);
        assert_eq!(first.first(), Some(&Tile::new(6, 12)));
        assert_eq!(first.last(), Some(&Tile::new(30, 12)));

        let unobstructed = find_path(
            &grid,
            &BlockedTiles::from_rooms(&rooms),
            Tile::new(18, 5),
            Tile::new(18, 22),
        )
        .unwrap();
        assert_eq!(unobstructed.len(), 18);

        let second = corridors[1].path();
        assert_eq!(second.first(), Some(&Tile::new(18, 5)));
        assert_eq!(second.last(), Some(&Tile::new(18, 22)));
        assert!(second.len() > unobstructed.len());
        let on_boundary =
            |tile: &Tile| rooms.iter().any(|r| r.geometry().boundary().contains(tile));
        for tile in second {
            assert!(
                on_boundary(tile) || !first.contains(tile),
                "second corridor crosses the first at {tile:?}"
            );
        }
    }

    #[test]
    fn test_entropy_seed_is_reported() {
        let generator = DungeonGenerator::from_entropy(DungeonStyle::Spaceship);
        let level = generator
            .generate(&small_config(DungeonStyle::Spaceship))
            .unwrap();
        assert_eq!(level.seed, generator.seed());
    }
}
