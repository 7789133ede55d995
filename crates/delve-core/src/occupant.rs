//! Room occupants: enemies, artifacts and items
//!
//! Occupants are created unpositioned by the room factory (enemies,
//! artifacts) or the furnishing pass (items). Their tile is assigned once,
//! after the owning room has geometry, and never changes afterwards.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::dungeon::Tile;

/// Enemy kinds known to the configuration files
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum EnemyType {
    // Dungeon
    Zombie,
    Spider,
    Vampire,
    Mummy,
    // Spaceship
    Ufo,
    Alien,
    // Cave
    Bat,
    CaveSpider,
    Troll,
    Lurker,
    GiantRat,
    Goblin,
}

/// Artifact names known to the configuration files
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum ArtifactName {
    // Dungeon
    Coin,
    Sword,
    Elixir,
    // Spaceship
    Diamond,
    // Cave
    Crystal,
    AncientRelic,
    HiddenMap,
    MysteriousFungus,
    CavePearl,
}

/// Item category, informational for renderers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum ItemCategory {
    Furniture,
    Architecture,
    Decoration,
}

/// Where inside its room an occupant may be placed
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
pub enum Placement {
    /// Any interior tile
    #[default]
    Anywhere,
    /// A boundary tile
    Wall,
    /// The boundary tile where a corridor attaches
    CorridorEntry,
}

/// Which occupant list an occupant belongs to; part of its seed identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum OccupantKind {
    Enemy,
    Artifact,
    Item,
}

impl OccupantKind {
    /// Stable salt for deriving per-occupant random sources
    pub const fn salt(self) -> u64 {
        match self {
            OccupantKind::Enemy => 0x454E_454D,
            OccupantKind::Artifact => 0x4152_5446,
            OccupantKind::Item => 0x4954_454D,
        }
    }
}

/// An enemy standing in a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyType,
    position: Option<Tile>,
}

impl Enemy {
    pub fn new(kind: EnemyType) -> Self {
        Self {
            kind,
            position: None,
        }
    }

    pub fn position(&self) -> Option<Tile> {
        self.position
    }

    pub(crate) fn assign_position(&mut self, tile: Tile) {
        debug_assert!(self.position.is_none(), "enemy position assigned twice");
        self.position.get_or_insert(tile);
    }
}

/// An artifact lying in a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: ArtifactName,
    position: Option<Tile>,
}

impl Artifact {
    pub fn new(name: ArtifactName) -> Self {
        Self {
            name,
            position: None,
        }
    }

    pub fn position(&self) -> Option<Tile> {
        self.position
    }

    pub(crate) fn assign_position(&mut self, tile: Tile) {
        debug_assert!(self.position.is_none(), "artifact position assigned twice");
        self.position.get_or_insert(tile);
    }
}

/// A piece of furniture, architecture or decoration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier of the configuration record this item came from
    pub config_id: String,
    pub name: String,
    pub category: ItemCategory,
    pub placement: Placement,
    position: Option<Tile>,
}

impl Item {
    pub fn new(
        config_id: impl Into<String>,
        name: impl Into<String>,
        category: ItemCategory,
        placement: Placement,
    ) -> Self {
        Self {
            config_id: config_id.into(),
            name: name.into(),
            category,
            placement,
            position: None,
        }
    }

    pub fn position(&self) -> Option<Tile> {
        self.position
    }

    pub(crate) fn assign_position(&mut self, tile: Tile) {
        debug_assert!(self.position.is_none(), "item position assigned twice");
        self.position.get_or_insert(tile);
    }
}
