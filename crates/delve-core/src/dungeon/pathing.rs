//! Corridor path tracing
//!
//! Three routers, one per style: grid A* (dungeon), an orthogonal stepped
//! path (spaceship) and a biased random walk (cave).

use core::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::{HashMap, HashSet};

use crate::config::GridConfig;
use crate::rng::RandomSource;

use super::geometry::Tile;
use super::room::Room;

/// Cells corridors may not cross
///
/// Seeded with every room's interior minus its boundary and grown with
/// each routed path. Boundary cells stay open so several corridors can
/// attach to one side of a room.
#[derive(Debug, Clone, Default)]
pub struct BlockedTiles {
    blocked: HashSet<Tile>,
    open: HashSet<Tile>,
}

impl BlockedTiles {
    /// Block the cores of all positioned rooms
    pub fn from_rooms(rooms: &[Room]) -> Self {
        let mut tiles = Self::default();
        for geometry in rooms.iter().filter_map(|r| r.try_geometry().ok()) {
            tiles.open.extend(geometry.boundary().iter());
            for tile in geometry.interior().iter() {
                if !geometry.boundary().contains(&tile) {
                    tiles.blocked.insert(tile);
                }
            }
        }
        tiles
    }

    /// Block a routed corridor, except where it touches a room boundary
    pub fn add_path(&mut self, path: &[Tile]) {
        for tile in path {
            if !self.open.contains(tile) {
                self.blocked.insert(*tile);
            }
        }
    }

    pub fn contains(&self, tile: Tile) -> bool {
        self.blocked.contains(&tile)
    }

    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }
}

/// A* node for the priority queue
#[derive(Clone, Copy, Eq, PartialEq)]
struct AStarNode {
    tile: Tile,
    g_cost: i32,
    f_cost: i32,
}

impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior; deeper nodes first on ties
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| self.g_cost.cmp(&other.g_cost))
            .then_with(|| other.tile.cmp(&self.tile))
    }
}

impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn reconstruct_path(came_from: &HashMap<Tile, Tile>, end: Tile) -> Vec<Tile> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Find a 4-directional path from `start` to `goal`, both included
///
/// Unit step cost with a Manhattan heuristic. The endpoints themselves are
/// never treated as blocked.
pub fn find_path(
    grid: &GridConfig,
    blocked: &BlockedTiles,
    start: Tile,
    goal: Tile,
) -> Option<Vec<Tile>> {
    if !grid.contains(start.x, start.y) || !grid.contains(goal.x, goal.y) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let mut open_set = BinaryHeap::new();
    let mut g_scores: HashMap<Tile, i32> = HashMap::new();
    let mut came_from: HashMap<Tile, Tile> = HashMap::new();
    let mut closed: HashSet<Tile> = HashSet::new();

    g_scores.insert(start, 0);
    open_set.push(AStarNode {
        tile: start,
        g_cost: 0,
        f_cost: start.manhattan(goal),
    });

    while let Some(current) = open_set.pop() {
        if current.tile == goal {
            return Some(reconstruct_path(&came_from, goal));
        }
        if !closed.insert(current.tile) {
            continue;
        }

        for next in current.tile.neighbors() {
            if !grid.contains(next.x, next.y) || closed.contains(&next) {
                continue;
            }
            if blocked.contains(next) && next != goal {
                continue;
            }

            let new_g = current.g_cost + 1;
            if g_scores.get(&next).is_none_or(|&g| new_g < g) {
                g_scores.insert(next, new_g);
                came_from.insert(next, current.tile);
                open_set.push(AStarNode {
                    tile: next,
                    g_cost: new_g,
                    f_cost: new_g + next.manhattan(goal),
                });
            }
        }
    }

    None
}

/// Step along X to the goal column, then along Y, both ends included
pub fn stepped_path(start: Tile, goal: Tile) -> Vec<Tile> {
    let mut path = vec![start];
    extend_stepped(&mut path, goal);
    path
}

/// Continue `path` orthogonally from its last cell to `goal`
fn extend_stepped(path: &mut Vec<Tile>, goal: Tile) {
    let Some(mut current) = path.last().copied() else {
        path.push(goal);
        return;
    };
    while current.x != goal.x {
        current = current.offset((goal.x - current.x).signum(), 0);
        path.push(current);
    }
    while current.y != goal.y {
        current = current.offset(0, (goal.y - current.y).signum());
        path.push(current);
    }
}

/// Outcome of a biased walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walk {
    pub path: Vec<Tile>,
    /// True if the step budget ran out and the tail was stepped in
    pub exhausted: bool,
}

/// Random walk from `start` toward `goal`
///
/// Each step moves to an in-grid orthogonal neighbour. With probability
/// `bias` it picks among neighbours no farther from the goal than the
/// current cell; otherwise among all of them. After `max_steps` the walk
/// is finished with a stepped leg, so the path always reaches `goal`.
pub fn biased_walk(
    grid: &GridConfig,
    start: Tile,
    goal: Tile,
    max_steps: u32,
    bias: f64,
    rng: &mut RandomSource,
) -> Walk {
    let mut path = vec![start];
    let mut current = start;
    let mut steps = 0;

    while current != goal && steps < max_steps {
        steps += 1;
        let neighbors: Vec<Tile> = current
            .neighbors()
            .into_iter()
            .filter(|n| grid.contains(n.x, n.y))
            .collect();
        let here = current.distance(goal);
        let closer: Vec<Tile> = neighbors
            .iter()
            .copied()
            .filter(|n| n.distance(goal) <= here)
            .collect();

        let pool = if rng.chance(bias) && !closer.is_empty() {
            &closer
        } else {
            &neighbors
        };
        match rng.choose(pool) {
            Some(&next) => {
                current = next;
                path.push(current);
            }
            None => break,
        }
    }

    let exhausted = current != goal;
    if exhausted {
        extend_stepped(&mut path, goal);
    }
    Walk { path, exhausted }
}
