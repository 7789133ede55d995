//! Furnishing and occupant placement
//!
//! Items are drawn per room from the records whose affinity fits the room
//! type. Then every enemy, artifact and item gets a free tile chosen by its
//! placement rule, with a random source derived from the run seed, the room
//! and the occupant itself.

use hashbrown::HashSet;

use crate::config::ItemConfig;
use crate::errors::{GenerationError, Warnings};
use crate::occupant::{Item, OccupantKind, Placement};
use crate::pool::WeightedPool;
use crate::rng::RandomSource;
use crate::{MAX_ITEMS_PER_ROOM, MIN_ITEMS_PER_ROOM};

use super::corridor::Corridor;
use super::geometry::{RoomGeometry, Tile, TileSet};
use super::room::{Room, RoomId};

/// Give every Normal-like room a handful of items
pub(crate) fn furnish(
    rooms: &mut [Room],
    items: &[ItemConfig],
    rng: &mut RandomSource,
    warnings: &mut Warnings,
) {
    if items.is_empty() {
        warnings.push(GenerationError::EmptyPool {
            pool: "items".into(),
        });
        return;
    }

    for room in rooms.iter_mut().filter(|r| !r.is_endpoint()) {
        let pool = WeightedPool::new(
            format!("items for {} room {}", room.room_type, room.id),
            items
                .iter()
                .filter(|item| item.fits(room.room_type))
                .map(|item| (item, item.weight)),
        );
        if pool.is_empty() {
            warnings.push(GenerationError::EmptyPool {
                pool: pool.name().into(),
            });
            continue;
        }

        let count = rng.range_inclusive(MIN_ITEMS_PER_ROOM, MAX_ITEMS_PER_ROOM);
        for _ in 0..count {
            match pool.sample(rng) {
                Ok(record) => room.items.push(Item::new(
                    &record.id,
                    &record.name,
                    record.category,
                    record.placement,
                )),
                Err(err) => {
                    warnings.push(err);
                    break;
                }
            }
        }
    }
}

/// Chooses free tiles inside one room
struct TilePicker<'a> {
    room: RoomId,
    geometry: &'a RoomGeometry,
    root: &'a RandomSource,
    /// Center of the first room a corridor links this one to
    entry_target: Option<Tile>,
    taken: HashSet<Tile>,
}

impl TilePicker<'_> {
    fn pick(&mut self, kind: OccupantKind, index: usize, placement: Placement) -> Option<Tile> {
        let tile = match (placement, self.entry_target) {
            (Placement::Anywhere, _) => self.draw(self.geometry.interior(), kind, index),
            (Placement::Wall, _) | (Placement::CorridorEntry, None) => {
                self.draw(self.geometry.boundary(), kind, index)
            }
            (Placement::CorridorEntry, Some(target)) => self.nearest_free_boundary(target),
        }?;
        self.taken.insert(tile);
        Some(tile)
    }

    fn draw(&self, tiles: &TileSet, kind: OccupantKind, index: usize) -> Option<Tile> {
        let free: Vec<Tile> = tiles.iter().filter(|t| !self.taken.contains(t)).collect();
        let mut rng = self
            .root
            .derive(&[u64::from(self.room.0), kind.salt(), index as u64]);
        rng.choose(&free).copied()
    }

    fn nearest_free_boundary(&self, target: Tile) -> Option<Tile> {
        let mut best: Option<(Tile, f64)> = None;
        for tile in self.geometry.boundary().iter() {
            if self.taken.contains(&tile) {
                continue;
            }
            let d = tile.distance(target);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((tile, d));
            }
        }
        best.map(|(tile, _)| tile)
    }
}

/// Assign a tile to every unpositioned occupant of every room
///
/// Occupants that find no free tile stay unpositioned and are reported.
pub(crate) fn place_occupants(
    rooms: &mut [Room],
    corridors: &[Corridor],
    root: &RandomSource,
    warnings: &mut Warnings,
) -> Result<(), GenerationError> {
    let centers: Vec<Option<Tile>> = rooms.iter().map(Room::center).collect();

    for (idx, room) in rooms.iter_mut().enumerate() {
        let geometry = room.try_geometry()?.clone();
        let entry_target = corridors
            .iter()
            .filter_map(|c| c.other_end(idx))
            .find_map(|other| centers[other]);
        let mut picker = TilePicker {
            room: room.id,
            geometry: &geometry,
            root,
            entry_target,
            taken: room.occupied_tiles().collect(),
        };
        let room_id = room.id;
        let mut unplaced = |occupant: String| {
            warnings.push(GenerationError::OccupantUnplaced {
                room: room_id,
                occupant,
            })
        };

        for (i, enemy) in room.enemies.iter_mut().enumerate() {
            if enemy.position().is_some() {
                continue;
            }
            match picker.pick(OccupantKind::Enemy, i, Placement::Anywhere) {
                Some(tile) => enemy.assign_position(tile),
                None => unplaced(format!("enemy {}", enemy.kind)),
            }
        }
        for (i, artifact) in room.artifacts.iter_mut().enumerate() {
            if artifact.position().is_some() {
                continue;
            }
            match picker.pick(OccupantKind::Artifact, i, Placement::Anywhere) {
                Some(tile) => artifact.assign_position(tile),
                None => unplaced(format!("artifact {}", artifact.name)),
            }
        }
        for (i, item) in room.items.iter_mut().enumerate() {
            if item.position().is_some() {
                continue;
            }
            match picker.pick(OccupantKind::Item, i, item.placement) {
                Some(tile) => item.assign_position(tile),
                None => unplaced(format!("item {}", item.name)),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::corridor::CorridorKind;
    use crate::dungeon::room::{RoomShape, RoomSize, RoomType};
    use crate::dungeon::DungeonStyle;
    use crate::occupant::{Enemy, EnemyType, ItemCategory};

    fn placed(id: u32, room_type: RoomType, x: i32, y: i32, w: i32, h: i32) -> Room {
        let mut room = Room::new(RoomId(id), room_type, RoomSize::Small, w, h);
        room.resolve_shape(|_| RoomShape::Rectangle);
        room.place(Tile::new(x, y), &mut RandomSource::new(0));
        room
    }

    fn item(id: &str, room_type: Option<RoomType>, placement: Placement) -> ItemConfig {
        ItemConfig {
            id: id.into(),
            name: id.to_uppercase(),
            category: ItemCategory::Furniture,
            room_type,
            placement,
            weight: 1,
            style: DungeonStyle::Dungeon,
        }
    }

    #[test]
    fn test_furnish_respects_affinity() {
        let mut rooms = vec![
            placed(0, RoomType::Entrance, 2, 2, 1, 1),
            placed(1, RoomType::Laboratory, 10, 2, 6, 6),
            placed(2, RoomType::Normal, 20, 2, 6, 6),
        ];
        let items = vec![
            item("flask", Some(RoomType::Laboratory), Placement::Anywhere),
            item("torch", None, Placement::Wall),
        ];
        let mut warnings = Warnings::default();
        furnish(&mut rooms, &items, &mut RandomSource::new(3), &mut warnings);

        assert!(rooms[0].items.is_empty());
        for room in &rooms[1..] {
            let n = room.items.len() as u32;
            assert!((MIN_ITEMS_PER_ROOM..=MAX_ITEMS_PER_ROOM).contains(&n));
        }
        assert!(rooms[2].items.iter().all(|i| i.config_id == "torch"));
        assert_eq!(warnings.len(), 0);
    }

    #[test]
    fn test_furnish_without_candidates_warns() {
        let mut rooms = vec![placed(0, RoomType::Treasury, 2, 2, 4, 4)];
        let items = vec![item("flask", Some(RoomType::Laboratory), Placement::Anywhere)];
        let mut warnings = Warnings::default();
        furnish(&mut rooms, &items, &mut RandomSource::new(3), &mut warnings);
        assert!(rooms[0].items.is_empty());
        assert!(matches!(warnings.into_vec()[0], GenerationError::EmptyPool { .. }));
    }

    #[test]
    fn test_occupants_get_distinct_tiles_by_rule() {
        let mut rooms = vec![placed(0, RoomType::Normal, 2, 2, 5, 5)];
        rooms[0].enemies = (0..4).map(|_| Enemy::new(EnemyType::Spider)).collect();
        rooms[0].items = vec![
            Item::new("a", "Shelf", ItemCategory::Furniture, Placement::Wall),
            Item::new("b", "Rug", ItemCategory::Decoration, Placement::Anywhere),
        ];
        let mut warnings = Warnings::default();
        place_occupants(&mut rooms, &[], &RandomSource::new(10), &mut warnings).unwrap();
        assert_eq!(warnings.len(), 0);

        let room = &rooms[0];
        let tiles: Vec<Tile> = room.occupied_tiles().collect();
        assert_eq!(tiles.len(), 6);
        let unique: HashSet<Tile> = tiles.iter().copied().collect();
        assert_eq!(unique.len(), 6);
        assert!(tiles.iter().all(|t| room.geometry().interior().contains(t)));
        let shelf = room.items[0].position().unwrap();
        assert!(room.geometry().boundary().contains(&shelf));
    }

    #[test]
    fn test_crowded_room_reports_unplaced() {
        let mut rooms = vec![placed(0, RoomType::Normal, 2, 2, 1, 1)];
        rooms[0].enemies = vec![Enemy::new(EnemyType::Bat), Enemy::new(EnemyType::Troll)];
        let mut warnings = Warnings::default();
        place_occupants(&mut rooms, &[], &RandomSource::new(1), &mut warnings).unwrap();
        assert_eq!(rooms[0].enemies[0].position(), Some(Tile::new(2, 2)));
        assert_eq!(rooms[0].enemies[1].position(), None);
        assert_eq!(
            warnings.into_vec(),
            vec![GenerationError::OccupantUnplaced {
                room: RoomId(0),
                occupant: "enemy Troll".into()
            }]
        );
    }

    #[test]
    fn test_corridor_entry_faces_linked_room() {
        let mut rooms = vec![
            placed(0, RoomType::Normal, 2, 2, 5, 5),
            placed(1, RoomType::Normal, 20, 2, 5, 5),
        ];
        rooms[0].items = vec![Item::new(
            "d",
            "Door mat",
            ItemCategory::Decoration,
            Placement::CorridorEntry,
        )];
        let corridors = vec![Corridor::new(0, 1, 18.0, CorridorKind::Spanning)];
        let mut warnings = Warnings::default();
        place_occupants(&mut rooms, &corridors, &RandomSource::new(1), &mut warnings).unwrap();
        // Right-hand wall, level with the other room's center
        assert_eq!(rooms[0].items[0].position(), Some(Tile::new(6, 4)));
    }

    #[test]
    fn test_placement_is_seed_stable() {
        let build = || {
            let mut rooms = vec![placed(3, RoomType::Lair, 4, 4, 6, 5)];
            rooms[0].enemies = (0..3).map(|_| Enemy::new(EnemyType::Goblin)).collect();
            place_occupants(&mut rooms, &[], &RandomSource::new(55), &mut Warnings::default())
                .unwrap();
            rooms
        };
        assert_eq!(build(), build());
    }
}
