//! Room types and structures
//!
//! Rooms are created unpositioned by the factory, then positioned and
//! geometrised exactly once by the arrangement step of the active style.

use core::fmt;
use core::ops::Range;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::errors::GenerationError;
use crate::occupant::{Artifact, Enemy, Item};
use crate::rng::RandomSource;

use super::geometry::{Bounds, RoomGeometry, Tile};

/// Unique room identifier, monotonically increasing within a run
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct RoomId(pub u32);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room type tags
///
/// Only Entrance and Exit are structurally special. Every other variant
/// is "Normal-like": it joins the spanning tree and gets furnished.
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
pub enum RoomType {
    Entrance,
    Exit,
    #[default]
    Normal,
    KingChamber,
    Treasury,
    Laboratory,
    Engine,
    ControlRoom,
    Lair,
}

impl RoomType {
    /// Entrance or Exit
    pub fn is_endpoint(self) -> bool {
        matches!(self, RoomType::Entrance | RoomType::Exit)
    }

    /// Check if this type takes part in the spanning tree
    pub fn is_normal_like(self) -> bool {
        !self.is_endpoint()
    }
}

/// Size class of a room, relative to the grid
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum RoomSize {
    Small,
    Medium,
    Big,
}

impl RoomSize {
    /// Half-open range of side lengths for a grid side of `side` cells.
    /// Never empty and never below 1.
    pub fn side_range(self, side: i32) -> Range<i32> {
        let (lo, hi) = match self {
            RoomSize::Small => (side / 20, side / 12),
            RoomSize::Medium => (side / 12, side / 8),
            RoomSize::Big => (side / 8, side / 6),
        };
        let lo = lo.max(1);
        lo..hi.max(lo + 1)
    }
}

/// Room outline, chosen once per room by the active style
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
pub enum RoomShape {
    #[default]
    Rectangle,
    Square,
    Circle,
    LShape,
    Cave,
}

/// A room on the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub room_type: RoomType,
    pub size: RoomSize,
    /// Bounding width in cells
    width: i32,
    /// Bounding height in cells
    height: i32,
    shape: Option<RoomShape>,
    origin: Option<Tile>,
    geometry: Option<RoomGeometry>,
    pub enemies: Vec<Enemy>,
    pub artifacts: Vec<Artifact>,
    pub items: Vec<Item>,
}

impl Room {
    /// Create an unpositioned room with no occupants
    pub fn new(id: RoomId, room_type: RoomType, size: RoomSize, width: i32, height: i32) -> Self {
        Self {
            id,
            room_type,
            size,
            width: width.max(1),
            height: height.max(1),
            shape: None,
            origin: None,
            geometry: None,
            enemies: Vec::new(),
            artifacts: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_endpoint(&self) -> bool {
        self.room_type.is_endpoint()
    }

    /// Shape, if the style has resolved it yet
    pub fn shape(&self) -> Option<RoomShape> {
        self.shape
    }

    /// Resolve the shape once; later calls return the first answer.
    ///
    /// A square forces the height to the width.
    pub fn resolve_shape(&mut self, choose: impl FnOnce(&Room) -> RoomShape) -> RoomShape {
        if let Some(shape) = self.shape {
            return shape;
        }
        let shape = choose(self);
        if shape == RoomShape::Square {
            self.height = self.width;
        }
        self.shape = Some(shape);
        shape
    }

    /// Check if the room has a position and tiles
    pub fn is_positioned(&self) -> bool {
        self.geometry.is_some()
    }

    pub fn origin(&self) -> Option<Tile> {
        self.origin
    }

    /// Bounding box at `origin`
    pub fn footprint_at(&self, origin: Tile) -> Bounds {
        Bounds::new(origin.x, origin.y, self.width, self.height)
    }

    /// Bounding box on the grid, once positioned
    pub fn bounds(&self) -> Option<Bounds> {
        self.origin.map(|origin| self.footprint_at(origin))
    }

    /// Center cell of the bounding box, once positioned
    pub fn center(&self) -> Option<Tile> {
        self.origin
            .map(|o| o.offset(self.width / 2, self.height / 2))
    }

    /// Position the room and synthesize its tiles.
    ///
    /// `cave_rng` must be derived from the room identity; it is only
    /// consumed by cave shapes.
    pub(crate) fn place(&mut self, origin: Tile, cave_rng: &mut RandomSource) {
        debug_assert!(self.geometry.is_none(), "room {} placed twice", self.id);
        if self.geometry.is_some() {
            return;
        }
        let shape = self.shape.unwrap_or_default();
        self.origin = Some(origin);
        self.geometry = Some(RoomGeometry::synthesize(
            shape,
            origin,
            self.width,
            self.height,
            cave_rng,
        ));
    }

    /// Interior and boundary tiles
    ///
    /// # Panics
    ///
    /// Panics if the room has not been positioned yet.
    pub fn geometry(&self) -> &RoomGeometry {
        match self.try_geometry() {
            Ok(geometry) => geometry,
            Err(err) => panic!("{err}"),
        }
    }

    /// Interior and boundary tiles, or `GeometryNotInitialized`
    pub fn try_geometry(&self) -> Result<&RoomGeometry, GenerationError> {
        self.geometry
            .as_ref()
            .ok_or(GenerationError::GeometryNotInitialized { room: self.id })
    }

    /// Number of occupants of every kind
    pub fn occupant_count(&self) -> usize {
        self.enemies.len() + self.artifacts.len() + self.items.len()
    }

    /// Tiles already taken by positioned occupants
    pub fn occupied_tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.enemies
            .iter()
            .filter_map(Enemy::position)
            .chain(self.artifacts.iter().filter_map(Artifact::position))
            .chain(self.items.iter().filter_map(Item::position))
    }
}
