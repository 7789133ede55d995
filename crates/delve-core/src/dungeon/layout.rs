//! Style-specific layout: shape choice, room arrangement, corridor routing

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::config::GridConfig;
use crate::errors::{RoutingFailure, Warnings};
use crate::pool::WeightedPool;
use crate::rng::RandomSource;
use crate::{CAVE_WALK_BIAS, CAVE_WALK_MAX_STEPS};

use super::arrange::{scatter, spine_and_wings};
use super::corridor::Corridor;
use super::geometry::Tile;
use super::pathing::{biased_walk, find_path, stepped_path, BlockedTiles};
use super::room::{Room, RoomShape};

/// Visual and structural theme of a level
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum DungeonStyle {
    /// Scattered rooms joined by A* corridors
    #[default]
    Dungeon,
    /// A horizontal spine of rooms with up to two wings
    Spaceship,
    /// Scattered automaton caves joined by random walks
    Cave,
}

/// A traced corridor path and the reason it is incomplete, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: Vec<Tile>,
    pub failure: Option<RoutingFailure>,
}

impl Route {
    fn complete(path: Vec<Tile>) -> Self {
        Self {
            path,
            failure: None,
        }
    }

    fn failed(reason: RoutingFailure) -> Self {
        Self {
            path: Vec::new(),
            failure: Some(reason),
        }
    }
}

impl DungeonStyle {
    /// Weighted shapes for Normal-like rooms
    pub fn shape_pool(self) -> WeightedPool<RoomShape> {
        let weights = match self {
            DungeonStyle::Dungeon => vec![(RoomShape::Rectangle, 1), (RoomShape::LShape, 1)],
            DungeonStyle::Spaceship => vec![(RoomShape::Circle, 1), (RoomShape::Square, 1)],
            DungeonStyle::Cave => vec![(RoomShape::Cave, 1)],
        };
        WeightedPool::new(format!("{self} shapes"), weights)
    }

    /// Entrance and Exit are always square; other rooms draw from the
    /// style's shape pool
    pub fn determine_shape(self, room: &Room, rng: &mut RandomSource) -> RoomShape {
        if room.is_endpoint() {
            return RoomShape::Square;
        }
        self.shape_pool().sample(rng).unwrap_or_default()
    }

    /// Resolve shapes, then position and geometrise every room that fits.
    /// Unplaceable rooms are dropped and reported.
    pub(crate) fn arrange_rooms(
        self,
        mut rooms: Vec<Room>,
        grid: &GridConfig,
        rng: &mut RandomSource,
        warnings: &mut Warnings,
    ) -> Vec<Room> {
        for room in &mut rooms {
            room.resolve_shape(|r| self.determine_shape(r, rng));
        }
        match self {
            DungeonStyle::Dungeon | DungeonStyle::Cave => scatter(rooms, grid, rng, warnings),
            DungeonStyle::Spaceship => spine_and_wings(rooms, grid, rng, warnings),
        }
    }

    /// Trace one corridor between positioned rooms
    pub fn route_corridor(
        self,
        corridor: &Corridor,
        rooms: &[Room],
        grid: &GridConfig,
        blocked: &BlockedTiles,
        rng: &mut RandomSource,
    ) -> Route {
        let (from, to) = (&rooms[corridor.start], &rooms[corridor.end]);

        if self == DungeonStyle::Cave {
            let (Some(start), Some(goal)) = (from.center(), to.center()) else {
                return Route::failed(RoutingFailure::NoAttachment);
            };
            let walk = biased_walk(grid, start, goal, CAVE_WALK_MAX_STEPS, CAVE_WALK_BIAS, rng);
            return Route {
                path: walk.path,
                failure: walk
                    .exhausted
                    .then_some(RoutingFailure::StepBudgetExhausted(CAVE_WALK_MAX_STEPS)),
            };
        }

        let Some((start, goal)) = attachment_tiles(from, to) else {
            return Route::failed(RoutingFailure::NoAttachment);
        };
        match self {
            DungeonStyle::Spaceship => Route::complete(stepped_path(start, goal)),
            _ => match find_path(grid, blocked, start, goal) {
                Some(path) => Route::complete(path),
                None => Route::failed(RoutingFailure::NoPath),
            },
        }
    }
}

/// Boundary tile of `from` nearest `to`'s center, and the boundary tile of
/// `to` nearest that one
fn attachment_tiles(from: &Room, to: &Room) -> Option<(Tile, Tile)> {
    let target = to.center()?;
    let start = from.try_geometry().ok()?.closest_boundary_tile(target)?;
    let goal = to.try_geometry().ok()?.closest_boundary_tile(start)?;
    Some((start, goal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::corridor::CorridorKind;
    use crate::dungeon::room::{RoomId, RoomSize, RoomType};
    use std::str::FromStr;

    fn placed(id: u32, shape: RoomShape, x: i32, y: i32) -> Room {
        let mut room = Room::new(RoomId(id), RoomType::Normal, RoomSize::Medium, 5, 5);
        room.resolve_shape(|_| shape);
        room.place(Tile::new(x, y), &mut RandomSource::new(u64::from(id)));
        room
    }

    #[test]
    fn test_style_parses_case_insensitively() {
        assert_eq!(DungeonStyle::from_str("SpaceShip").unwrap(), DungeonStyle::Spaceship);
        assert_eq!(DungeonStyle::default(), DungeonStyle::Dungeon);
        assert!(DungeonStyle::from_str("castle").is_err());
    }

    #[test]
    fn test_endpoints_are_square() {
        let entrance = Room::new(RoomId(0), RoomType::Entrance, RoomSize::Small, 1, 1);
        let mut rng = RandomSource::new(1);
        for style in [DungeonStyle::Dungeon, DungeonStyle::Spaceship, DungeonStyle::Cave] {
            assert_eq!(style.determine_shape(&entrance, &mut rng), RoomShape::Square);
        }
    }

    #[test]
    fn test_shape_pools() {
        let normal = Room::new(RoomId(1), RoomType::Lair, RoomSize::Small, 3, 3);
        let mut rng = RandomSource::new(9);
        for _ in 0..50 {
            let dungeon = DungeonStyle::Dungeon.determine_shape(&normal, &mut rng);
            assert!(matches!(dungeon, RoomShape::Rectangle | RoomShape::LShape));
            let ship = DungeonStyle::Spaceship.determine_shape(&normal, &mut rng);
            assert!(matches!(ship, RoomShape::Circle | RoomShape::Square));
            assert_eq!(DungeonStyle::Cave.determine_shape(&normal, &mut rng), RoomShape::Cave);
        }
        assert_eq!(DungeonStyle::Dungeon.shape_pool().total_weight(), 2);
    }

    #[test]
    fn test_dungeon_route_joins_boundaries() {
        let rooms = vec![
            placed(0, RoomShape::Rectangle, 2, 2),
            placed(1, RoomShape::Rectangle, 20, 10),
        ];
        let grid = GridConfig::new(40, 30);
        let blocked = BlockedTiles::from_rooms(&rooms);
        let corridor = Corridor::new(0, 1, 0.0, CorridorKind::Spanning);
        let route = DungeonStyle::Dungeon.route_corridor(
            &corridor,
            &rooms,
            &grid,
            &blocked,
            &mut RandomSource::new(0),
        );
        assert_eq!(route.failure, None);
        let first = route.path[0];
        let last = route.path[route.path.len() - 1];
        assert!(rooms[0].geometry().boundary().contains(&first));
        assert!(rooms[1].geometry().boundary().contains(&last));
        assert!(route.path.iter().all(|t| !blocked.contains(*t)));
    }

    #[test]
    fn test_spaceship_route_is_stepped() {
        let rooms = vec![
            placed(0, RoomShape::Square, 2, 12),
            placed(1, RoomShape::Square, 12, 12),
        ];
        let grid = GridConfig::new(40, 30);
        let corridor = Corridor::new(0, 1, 0.0, CorridorKind::Spanning);
        let route = DungeonStyle::Spaceship.route_corridor(
            &corridor,
            &rooms,
            &grid,
            &BlockedTiles::default(),
            &mut RandomSource::new(0),
        );
        // Right edge of the first room straight across to the left edge of the second
        assert_eq!(route.path.first(), Some(&Tile::new(6, 14)));
        assert_eq!(route.path.last(), Some(&Tile::new(12, 14)));
        assert_eq!(route.path.len(), 7);
    }

    #[test]
    fn test_cave_route_runs_center_to_center() {
        let rooms = vec![
            placed(0, RoomShape::Cave, 2, 2),
            placed(1, RoomShape::Cave, 25, 18),
        ];
        let grid = GridConfig::new(40, 30);
        let corridor = Corridor::new(0, 1, 0.0, CorridorKind::Spanning);
        let route = DungeonStyle::Cave.route_corridor(
            &corridor,
            &rooms,
            &grid,
            &BlockedTiles::default(),
            &mut RandomSource::new(4),
        );
        assert_eq!(route.path.first(), rooms[0].center().as_ref());
        assert_eq!(route.path.last(), rooms[1].center().as_ref());
    }

    #[test]
    fn test_unpositioned_room_cannot_attach() {
        let rooms = vec![
            placed(0, RoomShape::Rectangle, 2, 2),
            Room::new(RoomId(1), RoomType::Normal, RoomSize::Small, 2, 2),
        ];
        let corridor = Corridor::new(0, 1, 0.0, CorridorKind::Spanning);
        let route = DungeonStyle::Dungeon.route_corridor(
            &corridor,
            &rooms,
            &GridConfig::new(40, 30),
            &BlockedTiles::default(),
            &mut RandomSource::new(0),
        );
        assert_eq!(route, Route::failed(RoutingFailure::NoAttachment));
    }
}
