//! Corridor graph construction
//!
//! Every Entrance/Exit room is linked to its nearest Normal-like room, then
//! Kruskal's algorithm joins the Normal-like rooms into a spanning tree:
//! 1. Sort all Normal-like room pairs by center distance
//! 2. Link each endpoint room to its nearest Normal-like room
//! 3. Union the endpoint links
//! 4. Add every sorted pair whose rooms are not yet connected

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::errors::GenerationError;

use super::geometry::Tile;
use super::room::Room;

/// Tracks room connectivity with a disjoint-set forest
///
/// Elements are room arena indices.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
    components: usize,
}

impl UnionFind {
    /// Create a forest of `n` singleton sets
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            components: n,
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of `a`'s set, compressing the path on the way
    pub fn find(&mut self, a: usize) -> usize {
        let mut root = a;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = a;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merge the sets of `a` and `b`; returns false if already merged
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            core::cmp::Ordering::Less => self.parent[ra] = rb,
            core::cmp::Ordering::Greater => self.parent[rb] = ra,
            core::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        self.components -= 1;
        true
    }

    /// Check if two rooms are in the same component
    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Number of disjoint components
    pub fn component_count(&self) -> usize {
        self.components
    }

    /// Check if all rooms are connected
    pub fn all_connected(&self) -> bool {
        self.components <= 1
    }
}

/// Why a corridor exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum CorridorKind {
    /// Entrance/Exit link to the nearest Normal-like room
    Endpoint,
    /// Spanning tree edge between Normal-like rooms
    Spanning,
    /// Endpoint chain used when no Normal-like room exists
    Fallback,
}

/// A connection between two rooms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corridor {
    /// Arena index of the first room
    pub start: usize,
    /// Arena index of the second room
    pub end: usize,
    pub kind: CorridorKind,
    /// Center-to-center distance at creation
    distance: f64,
    path: Vec<Tile>,
}

impl Corridor {
    pub fn new(start: usize, end: usize, distance: f64, kind: CorridorKind) -> Self {
        Self {
            start,
            end,
            kind,
            distance,
            path: Vec::new(),
        }
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Routed cells from one room's boundary to the other's; empty if
    /// routing failed
    pub fn path(&self) -> &[Tile] {
        &self.path
    }

    pub fn is_routed(&self) -> bool {
        !self.path.is_empty()
    }

    /// Check if this corridor links the two rooms, in either direction
    pub fn joins(&self, a: usize, b: usize) -> bool {
        (self.start == a && self.end == b) || (self.start == b && self.end == a)
    }

    /// The room at the other end, if `room` is one of the ends
    pub fn other_end(&self, room: usize) -> Option<usize> {
        if self.start == room {
            Some(self.end)
        } else if self.end == room {
            Some(self.start)
        } else {
            None
        }
    }

    pub(crate) fn set_path(&mut self, path: Vec<Tile>) {
        self.path = path;
    }
}

/// Build the corridor set over positioned rooms
///
/// Corridors come out in routing order: endpoint links first, then
/// spanning edges by ascending length, then fallback links.
pub fn build_corridor_graph(rooms: &[Room]) -> Result<Vec<Corridor>, GenerationError> {
    let centers = rooms
        .iter()
        .map(|room| {
            room.center()
                .ok_or(GenerationError::GeometryNotInitialized { room: room.id })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let distance = |a: usize, b: usize| centers[a].distance(centers[b]);

    let (endpoints, normals): (Vec<usize>, Vec<usize>) =
        (0..rooms.len()).partition(|&i| rooms[i].is_endpoint());

    let mut candidates = Vec::new();
    for (n, &a) in normals.iter().enumerate() {
        for &b in &normals[n + 1..] {
            candidates.push((a, b, distance(a, b)));
        }
    }
    candidates.sort_by(|x, y| x.2.total_cmp(&y.2));

    let mut corridors: Vec<Corridor> = Vec::new();
    for &e in &endpoints {
        let mut nearest: Option<(usize, f64)> = None;
        for &n in &normals {
            let d = distance(e, n);
            if nearest.is_none_or(|(_, best)| d < best) {
                nearest = Some((n, d));
            }
        }
        let Some((n, d)) = nearest else { continue };
        if corridors.iter().any(|c| c.joins(e, n)) {
            continue;
        }
        corridors.push(Corridor::new(e, n, d, CorridorKind::Endpoint));
        candidates.retain(|&(a, b, _)| !((a == e && b == n) || (a == n && b == e)));
    }

    let mut forest = UnionFind::new(rooms.len());
    for corridor in &corridors {
        forest.union(corridor.start, corridor.end);
    }

    for (a, b, d) in candidates {
        if forest.union(a, b) {
            corridors.push(Corridor::new(a, b, d, CorridorKind::Spanning));
        }
    }

    if normals.is_empty() {
        for pair in endpoints.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if forest.union(a, b) {
                corridors.push(Corridor::new(a, b, distance(a, b), CorridorKind::Fallback));
            }
        }
    }

    Ok(corridors)
}

/// Check if the corridors connect every room in `0..room_count`
pub fn corridors_connect_all(room_count: usize, corridors: &[Corridor]) -> bool {
    let mut forest = UnionFind::new(room_count);
    for corridor in corridors {
        forest.union(corridor.start, corridor.end);
    }
    forest.all_connected()
}
