//! Room geometry synthesis
//!
//! Turns a shape, a bounding box and an origin into an interior tile set
//! and a boundary tile set. Every shape shares one boundary rule: an
//! interior tile with an orthogonal neighbour outside the interior.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::config::GridConfig;
use crate::rng::RandomSource;
use crate::{CAVE_FILL_PERCENT, CAVE_SMOOTHING_PASSES, CAVE_WALL_THRESHOLD};

use super::room::RoomShape;

/// Orthogonal step offsets
pub const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// A grid cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile shifted by an offset
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbours (east, west, south, north)
    pub fn neighbors(self) -> [Tile; 4] {
        ORTHOGONAL.map(|(dx, dy)| self.offset(dx, dy))
    }

    /// Manhattan distance
    pub fn manhattan(self, other: Tile) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Euclidean distance
    pub fn distance(self, other: Tile) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned box in grid cells; `x + width` and `y + height` are exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if this box overlaps another once both grow by `buffer`
    pub fn overlaps(&self, other: &Bounds, buffer: i32) -> bool {
        let x1 = self.x - buffer;
        let y1 = self.y - buffer;
        let x2 = self.x + self.width + buffer;
        let y2 = self.y + self.height + buffer;

        let ox1 = other.x - buffer;
        let oy1 = other.y - buffer;
        let ox2 = other.x + other.width + buffer;
        let oy2 = other.y + other.height + buffer;

        !(x2 <= ox1 || x1 >= ox2 || y2 <= oy1 || y1 >= oy2)
    }

    /// Check if the box lies on the grid with at least `margin` free cells
    /// on every side
    pub fn fits_within(&self, grid: &GridConfig, margin: i32) -> bool {
        self.x >= margin
            && self.y >= margin
            && self.x + self.width + margin <= grid.width
            && self.y + self.height + margin <= grid.height
    }

    /// Check if a tile lies inside the box
    pub fn contains(&self, tile: Tile) -> bool {
        tile.x >= self.x
            && tile.x < self.x + self.width
            && tile.y >= self.y
            && tile.y < self.y + self.height
    }
}

/// Tile set with stable insertion order
///
/// Seeded draws index into the ordered list, so the same seed always picks
/// the same tile; the hash index only answers membership.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Tile>", into = "Vec<Tile>")]
pub struct TileSet {
    order: Vec<Tile>,
    index: HashSet<Tile>,
}

impl TileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tile; returns false if it was already present
    pub fn insert(&mut self, tile: Tile) -> bool {
        if self.index.insert(tile) {
            self.order.push(tile);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, tile: &Tile) -> bool {
        self.index.contains(tile)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Tile> + '_ {
        self.order.iter().copied()
    }

    pub fn as_slice(&self) -> &[Tile] {
        &self.order
    }
}

impl PartialEq for TileSet {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for TileSet {}

impl FromIterator<Tile> for TileSet {
    fn from_iter<I: IntoIterator<Item = Tile>>(iter: I) -> Self {
        let mut set = TileSet::new();
        for tile in iter {
            set.insert(tile);
        }
        set
    }
}

impl From<Vec<Tile>> for TileSet {
    fn from(tiles: Vec<Tile>) -> Self {
        tiles.into_iter().collect()
    }
}

impl From<TileSet> for Vec<Tile> {
    fn from(set: TileSet) -> Self {
        set.order
    }
}

/// Interior and boundary tiles of a positioned room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomGeometry {
    interior: TileSet,
    boundary: TileSet,
}

impl RoomGeometry {
    /// Synthesize tiles for `shape` inside the box at `origin`.
    ///
    /// `cave_rng` is only consumed by [`RoomShape::Cave`].
    pub fn synthesize(
        shape: RoomShape,
        origin: Tile,
        width: i32,
        height: i32,
        cave_rng: &mut RandomSource,
    ) -> Self {
        let interior = match shape {
            RoomShape::Rectangle => rectangle_tiles(origin, width, height),
            RoomShape::Square => rectangle_tiles(origin, width, width),
            RoomShape::Circle => ellipse_tiles(origin, width, height),
            RoomShape::LShape => l_shape_tiles(origin, width, height),
            RoomShape::Cave => {
                let tiles = CaveGrid::generate(width, height, cave_rng)
                    .largest_region()
                    .floor_tiles(origin);
                if tiles.is_empty() {
                    ellipse_tiles(origin, width, height)
                } else {
                    tiles
                }
            }
        };
        Self::from_interior(interior)
    }

    /// Build geometry from an interior, deriving the boundary
    pub fn from_interior(interior: TileSet) -> Self {
        let boundary = interior
            .iter()
            .filter(|tile| tile.neighbors().iter().any(|n| !interior.contains(n)))
            .collect();
        Self { interior, boundary }
    }

    pub fn interior(&self) -> &TileSet {
        &self.interior
    }

    pub fn boundary(&self) -> &TileSet {
        &self.boundary
    }

    /// Boundary tile nearest to `target` (Euclidean, first minimum wins)
    pub fn closest_boundary_tile(&self, target: Tile) -> Option<Tile> {
        let mut best: Option<(Tile, f64)> = None;
        for tile in self.boundary.iter() {
            let d = tile.distance(target);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((tile, d));
            }
        }
        best.map(|(tile, _)| tile)
    }
}

/// Every cell of the box, row-major
fn rectangle_tiles(origin: Tile, width: i32, height: i32) -> TileSet {
    let mut tiles = TileSet::new();
    for y in origin.y..origin.y + height {
        for x in origin.x..origin.x + width {
            tiles.insert(Tile::new(x, y));
        }
    }
    tiles
}

/// Cells whose centers fall inside the ellipse inscribed in the box
fn ellipse_tiles(origin: Tile, width: i32, height: i32) -> TileSet {
    let cx = f64::from(origin.x) + f64::from(width) / 2.0;
    let cy = f64::from(origin.y) + f64::from(height) / 2.0;
    let rx = f64::from(width) / 2.0;
    let ry = f64::from(height) / 2.0;

    let mut tiles = TileSet::new();
    for y in origin.y..origin.y + height {
        for x in origin.x..origin.x + width {
            let dx = (f64::from(x) + 0.5 - cx) / rx;
            let dy = (f64::from(y) + 0.5 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                tiles.insert(Tile::new(x, y));
            }
        }
    }
    tiles
}

/// Vertical arm (half width, full height) joined with a horizontal arm
/// (full width, bottom half)
fn l_shape_tiles(origin: Tile, width: i32, height: i32) -> TileSet {
    let arm_width = width / 2;
    let arm_height = height / 2;
    let vertical = Bounds::new(origin.x, origin.y, arm_width, height);
    let horizontal = Bounds::new(origin.x, origin.y + arm_height, width, height - arm_height);

    let mut tiles = TileSet::new();
    for y in origin.y..origin.y + height {
        for x in origin.x..origin.x + width {
            let tile = Tile::new(x, y);
            if vertical.contains(tile) || horizontal.contains(tile) {
                tiles.insert(tile);
            }
        }
    }
    tiles
}

/// Wall/floor grid for the cave automaton; `true` is wall
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaveGrid {
    width: i32,
    height: i32,
    walls: Vec<bool>,
}

impl CaveGrid {
    /// Grid with every cell set to `wall`
    pub fn filled(width: i32, height: i32, wall: bool) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            walls: vec![wall; width as usize * height as usize],
        }
    }

    /// Seed a random grid and run the smoothing passes
    ///
    /// The border is always wall; other cells start as wall with
    /// `CAVE_FILL_PERCENT` probability.
    pub fn generate(width: i32, height: i32, rng: &mut RandomSource) -> Self {
        let mut grid = Self::filled(width, height, true);
        for y in 1..grid.height - 1 {
            for x in 1..grid.width - 1 {
                let idx = grid.idx(x, y);
                grid.walls[idx] = rng.percent(CAVE_FILL_PERCENT);
            }
        }
        for _ in 0..CAVE_SMOOTHING_PASSES {
            grid = grid.smoothed();
        }
        grid
    }

    fn idx(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Out-of-grid cells count as wall
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return true;
        }
        self.walls[self.idx(x, y)]
    }

    fn wall_neighbors(&self, x: i32, y: i32) -> usize {
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if (dx, dy) != (0, 0) && self.is_wall(x + dx, y + dy) {
                    count += 1;
                }
            }
        }
        count
    }

    /// One automaton pass: a cell becomes wall when at least
    /// `CAVE_WALL_THRESHOLD` of its 8 neighbours are wall
    pub fn smoothed(&self) -> Self {
        let mut next = self.clone();
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.idx(x, y);
                next.walls[idx] = self.wall_neighbors(x, y) >= CAVE_WALL_THRESHOLD;
            }
        }
        next
    }

    pub fn floor_count(&self) -> usize {
        self.walls.iter().filter(|&&w| !w).count()
    }

    /// Keep only the largest orthogonally connected floor region
    pub fn largest_region(&self) -> Self {
        let mut region_of = vec![usize::MAX; self.walls.len()];
        let mut best: Option<(usize, usize)> = None; // (region, size)
        let mut region = 0;

        for y in 0..self.height {
            for x in 0..self.width {
                let start = self.idx(x, y);
                if self.walls[start] || region_of[start] != usize::MAX {
                    continue;
                }
                let mut size = 0;
                let mut stack = vec![(x, y)];
                region_of[start] = region;
                while let Some((cx, cy)) = stack.pop() {
                    size += 1;
                    for (dx, dy) in ORTHOGONAL {
                        let (nx, ny) = (cx + dx, cy + dy);
                        if self.is_wall(nx, ny) {
                            continue;
                        }
                        let n = self.idx(nx, ny);
                        if region_of[n] == usize::MAX {
                            region_of[n] = region;
                            stack.push((nx, ny));
                        }
                    }
                }
                if best.is_none_or(|(_, s)| size > s) {
                    best = Some((region, size));
                }
                region += 1;
            }
        }

        let mut kept = Self::filled(self.width, self.height, true);
        if let Some((keep, _)) = best {
            for (i, r) in region_of.iter().enumerate() {
                kept.walls[i] = *r != keep;
            }
        }
        kept
    }

    /// Floor cells translated to `origin`, row-major
    pub fn floor_tiles(&self, origin: Tile) -> TileSet {
        let mut tiles = TileSet::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if !self.is_wall(x, y) {
                    tiles.insert(origin.offset(x, y));
                }
            }
        }
        tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synth(shape: RoomShape, w: i32, h: i32) -> RoomGeometry {
        let mut rng = RandomSource::new(3);
        RoomGeometry::synthesize(shape, Tile::new(10, 5), w, h, &mut rng)
    }

    #[test]
    fn test_rectangle_ring() {
        let geo = synth(RoomShape::Rectangle, 5, 4);
        assert_eq!(geo.interior().len(), 20);
        // 20 cells minus the 3x2 core
        assert_eq!(geo.boundary().len(), 14);
        assert!(geo.boundary().contains(&Tile::new(10, 5)));
        assert!(!geo.boundary().contains(&Tile::new(11, 6)));
    }

    #[test]
    fn test_square_uses_width_for_both_sides() {
        let geo = synth(RoomShape::Square, 4, 9);
        assert_eq!(geo.interior().len(), 16);
        assert!(!geo.interior().contains(&Tile::new(10, 9)));
    }

    #[test]
    fn test_single_cell_room_is_its_own_boundary() {
        let geo = synth(RoomShape::Square, 1, 1);
        assert_eq!(geo.interior().as_slice(), &[Tile::new(10, 5)]);
        assert_eq!(geo.boundary().as_slice(), &[Tile::new(10, 5)]);
    }

    #[test]
    fn test_circle_inside_ellipse() {
        let geo = synth(RoomShape::Circle, 9, 7);
        let bounds = Bounds::new(10, 5, 9, 7);
        assert!(geo.interior().iter().all(|t| bounds.contains(t)));
        // Corners fall outside the ellipse, the center is inside
        assert!(!geo.interior().contains(&Tile::new(10, 5)));
        assert!(!geo.interior().contains(&Tile::new(18, 11)));
        assert!(geo.interior().contains(&Tile::new(14, 8)));
        assert!(!geo.boundary().contains(&Tile::new(14, 8)));
        assert!(geo.boundary().len() < geo.interior().len());
    }

    #[test]
    fn test_l_shape_arms() {
        let geo = synth(RoomShape::LShape, 6, 6);
        // Vertical arm 3x6 + horizontal arm 6x3, overlapping in 3x3
        assert_eq!(geo.interior().len(), 18 + 18 - 9);
        // Top-right quadrant is cut away
        assert!(!geo.interior().contains(&Tile::new(15, 5)));
        assert!(geo.interior().contains(&Tile::new(15, 10)));
    }

    #[test]
    fn test_l_shape_boundary_is_rectilinear() {
        let geo = synth(RoomShape::LShape, 6, 6);
        // Inner corner cell touches the cut-away quadrant diagonally only
        assert!(!geo.boundary().contains(&Tile::new(12, 8)));
        // Cells along the notch are boundary
        assert!(geo.boundary().contains(&Tile::new(12, 6)));
        assert!(geo.boundary().contains(&Tile::new(14, 8)));
        for tile in geo.boundary().iter() {
            assert!(tile.neighbors().iter().any(|n| !geo.interior().contains(n)));
        }
        for tile in geo.interior().iter() {
            if !geo.boundary().contains(&tile) {
                assert!(tile.neighbors().iter().all(|n| geo.interior().contains(n)));
            }
        }
    }

    #[test]
    fn test_cave_all_wall_has_no_floor() {
        let grid = CaveGrid::filled(12, 10, true).smoothed().smoothed();
        assert_eq!(grid.floor_count(), 0);
        assert!(grid.floor_tiles(Tile::new(0, 0)).is_empty());
    }

    #[test]
    fn test_cave_all_floor_attracts_corners() {
        let grid = CaveGrid::filled(10, 8, false);
        let once = grid.smoothed();
        // Corners see 5 out-of-grid neighbours, edges only 3
        for (x, y) in [(0, 0), (9, 0), (0, 7), (9, 7)] {
            assert!(once.is_wall(x, y));
        }
        assert!(!once.is_wall(4, 0));
        assert!(!once.is_wall(5, 4));

        let mut settled = grid;
        for _ in 0..CAVE_SMOOTHING_PASSES {
            settled = settled.smoothed();
        }
        assert!(settled.is_wall(0, 0));
        assert!(!settled.is_wall(5, 4));
    }

    #[test]
    fn test_cave_is_reproducible_per_seed() {
        let a = CaveGrid::generate(16, 12, &mut RandomSource::new(77));
        let b = CaveGrid::generate(16, 12, &mut RandomSource::new(77));
        assert_eq!(a, b);
        // The forced border survives smoothing
        for x in 0..16 {
            assert!(a.is_wall(x, 0) && a.is_wall(x, 11));
        }
    }

    #[test]
    fn test_cave_region_is_connected() {
        let geo = synth(RoomShape::Cave, 18, 14);
        assert!(!geo.interior().is_empty());
        let first = geo.interior().as_slice()[0];
        let mut seen = TileSet::new();
        let mut stack = vec![first];
        while let Some(t) = stack.pop() {
            if !geo.interior().contains(&t) || !seen.insert(t) {
                continue;
            }
            stack.extend(t.neighbors());
        }
        assert_eq!(seen.len(), geo.interior().len());
    }

    #[test]
    fn test_tiny_cave_falls_back_to_ellipse() {
        let geo = synth(RoomShape::Cave, 2, 1);
        assert!(!geo.interior().is_empty());
    }

    #[test]
    fn test_closest_boundary_tile() {
        let geo = synth(RoomShape::Rectangle, 5, 5);
        assert_eq!(geo.closest_boundary_tile(Tile::new(30, 7)), Some(Tile::new(14, 7)));
        assert_eq!(geo.closest_boundary_tile(Tile::new(12, 0)), Some(Tile::new(12, 5)));
    }

    #[test]
    fn test_bounds_overlap_with_buffer() {
        let a = Bounds::new(5, 5, 5, 5);
        let b = Bounds::new(8, 8, 5, 5);
        let c = Bounds::new(12, 5, 3, 3);
        assert!(a.overlaps(&b, 0));
        assert!(!a.overlaps(&c, 0));
        // Both boxes grow by one, so a two-cell gap is the minimum
        assert!(!a.overlaps(&c, 1));
        assert!(a.overlaps(&Bounds::new(11, 5, 3, 3), 1));
    }
}
