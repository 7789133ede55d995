//! Room arrangement algorithms
//!
//! Scatter (dungeon and cave styles) tries random origins with a one-cell
//! buffer around every room. Spine (spaceship style) lays rooms left to
//! right along the horizontal midline and hangs up to two wings off one
//! spine room.

use tracing::{debug, warn};

use crate::config::GridConfig;
use crate::errors::{GenerationError, PlacementFailure, Warnings};
use crate::rng::RandomSource;
use crate::{CAVE_SEED_SALT, PLACEMENT_ATTEMPTS, SPINE_SPACING, WING_ANCHOR_INDEX};

use super::geometry::{Bounds, Tile};
use super::room::{Room, RoomType};

/// Cave automaton source for one room, independent of the run's draw count
fn cave_source(rng: &RandomSource, room: &Room) -> RandomSource {
    rng.derive(&[CAVE_SEED_SALT, u64::from(room.id.0)])
}

fn place(room: &mut Room, origin: Tile, rng: &RandomSource) {
    let mut cave_rng = cave_source(rng, room);
    room.place(origin, &mut cave_rng);
    debug!(room = %room.id, x = origin.x, y = origin.y, "placed room");
}

fn drop_room(room: &Room, reason: PlacementFailure, warnings: &mut Warnings) {
    warnings.push(GenerationError::PlacementExhausted {
        room: room.id,
        reason,
    });
}

fn collides(footprint: &Bounds, placed: &[Room]) -> bool {
    placed
        .iter()
        .filter_map(Room::bounds)
        .any(|other| footprint.overlaps(&other, 1))
}

/// Random origin for `room` that keeps a one-cell border to the grid edge
/// and to every placed room
fn find_free_origin(
    room: &Room,
    placed: &[Room],
    grid: &GridConfig,
    rng: &mut RandomSource,
) -> Option<Tile> {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let x = rng.range(1, grid.width - room.width() - 1);
        let y = rng.range(1, grid.height - room.height() - 1);
        let origin = Tile::new(x, y);
        let footprint = room.footprint_at(origin);
        if footprint.fits_within(grid, 1) && !collides(&footprint, placed) {
            return Some(origin);
        }
    }
    None
}

/// Place rooms one by one at random free origins
pub(crate) fn scatter(
    rooms: Vec<Room>,
    grid: &GridConfig,
    rng: &mut RandomSource,
    warnings: &mut Warnings,
) -> Vec<Room> {
    let mut placed: Vec<Room> = Vec::with_capacity(rooms.len());
    for mut room in rooms {
        match find_free_origin(&room, &placed, grid, rng) {
            Some(origin) => {
                place(&mut room, origin, rng);
                placed.push(room);
            }
            None => drop_room(&room, PlacementFailure::RetryBudget(PLACEMENT_ATTEMPTS), warnings),
        }
    }
    placed
}

/// A room waiting for a wing slot, and what to report if it gets none
struct WingCandidate {
    room: Room,
    overflow: bool,
}

/// Lay out a spaceship: entrance at the left, exit at the right, the other
/// rooms shuffled between them, leftovers as wings above and below one
/// spine room
pub(crate) fn spine_and_wings(
    rooms: Vec<Room>,
    grid: &GridConfig,
    rng: &mut RandomSource,
    warnings: &mut Warnings,
) -> Vec<Room> {
    let midline = grid.height / 2;
    let mut entrance: Option<Room> = None;
    let mut exit: Option<Room> = None;
    let mut middle: Vec<Room> = Vec::new();
    let mut wings: Vec<WingCandidate> = Vec::new();

    for room in rooms {
        let slot = match room.room_type {
            RoomType::Entrance => &mut entrance,
            RoomType::Exit => &mut exit,
            _ => {
                middle.push(room);
                continue;
            }
        };
        if slot.is_none() {
            *slot = Some(room);
        } else {
            wings.push(WingCandidate {
                room,
                overflow: false,
            });
        }
    }

    let mut placed: Vec<Room> = Vec::new();

    // Fixed ends
    let mut left_edge = 0;
    if let Some(mut room) = entrance {
        let origin = Tile::new(SPINE_SPACING, midline - room.height() / 2);
        left_edge = SPINE_SPACING + room.width();
        place(&mut room, origin, rng);
        placed.push(room);
    }
    let mut right_limit = grid.width - SPINE_SPACING;
    let mut exit_room = None;
    if let Some(mut room) = exit {
        let origin = Tile::new(
            grid.width - room.width() - SPINE_SPACING,
            midline - room.height() / 2,
        );
        right_limit = origin.x - SPINE_SPACING;
        place(&mut room, origin, rng);
        exit_room = Some(room);
    }

    // Spine
    rng.shuffle(&mut middle);
    let mut cursor = left_edge + SPINE_SPACING;
    let mut spine: Vec<usize> = Vec::new();
    let mut remaining = middle.into_iter();
    for mut room in remaining.by_ref() {
        let origin = Tile::new(cursor, midline - room.height() / 2);
        let footprint = room.footprint_at(origin);
        let vertical_ok = footprint.y >= 0 && footprint.y + footprint.height <= grid.height;
        if cursor + room.width() > right_limit || !vertical_ok {
            warn!(room = %room.id, "spine is full, remaining rooms become wing candidates");
            wings.push(WingCandidate {
                room,
                overflow: true,
            });
            break;
        }
        cursor += room.width() + SPINE_SPACING;
        place(&mut room, origin, rng);
        spine.push(placed.len());
        placed.push(room);
    }
    wings.extend(remaining.map(|room| WingCandidate {
        room,
        overflow: true,
    }));
    placed.extend(exit_room);

    // Wings
    let anchor = spine
        .get(WING_ANCHOR_INDEX.min(spine.len().saturating_sub(1)))
        .and_then(|&idx| placed[idx].bounds());
    let Some(anchor) = anchor else {
        for candidate in wings {
            drop_room(&candidate.room, PlacementFailure::NoWingAnchor, warnings);
        }
        return placed;
    };
    let anchor_mid = anchor.x + anchor.width / 2;

    for (slot, candidate) in wings.into_iter().enumerate() {
        let mut room = candidate.room;
        if slot >= 2 {
            let reason = if candidate.overflow {
                PlacementFailure::SpineFull
            } else {
                PlacementFailure::SurplusWing
            };
            drop_room(&room, reason, warnings);
            continue;
        }
        let y = if slot == 0 {
            anchor.y - SPINE_SPACING - room.height()
        } else {
            anchor.y + anchor.height + SPINE_SPACING
        };
        let origin = Tile::new(anchor_mid - room.width() / 2, y);
        let footprint = room.footprint_at(origin);
        if !footprint.fits_within(grid, 0) || collides(&footprint, &placed) {
            drop_room(&room, PlacementFailure::WingBlocked, warnings);
            continue;
        }
        place(&mut room, origin, rng);
        placed.push(room);
    }

    placed
}
