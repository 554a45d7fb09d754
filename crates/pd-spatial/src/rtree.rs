//! R-tree backed nearest-neighbour index.
//!
//! Bulk-loaded once (O(N log N)), then each query is O(log N).  Used for
//! city-scale inputs: tens of thousands of road centres against tens of
//! thousands of tiles.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::index::{Nearest, NearestIndex};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a planar point plus its input position.
#[derive(Clone)]
struct PointEntry {
    point: [f64; 2],
    idx:   usize,
}

impl RTreeObject for PointEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PointEntry {
    /// Squared Euclidean distance in the local plane.  Must stay identical
    /// to `LinearScanIndex`'s expression.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── RTreeIndex ────────────────────────────────────────────────────────────────

/// Nearest-neighbour index over a bulk-loaded `rstar::RTree`.
pub struct RTreeIndex {
    tree: RTree<PointEntry>,
    len:  usize,
}

impl RTreeIndex {
    pub fn new(points: Vec<[f64; 2]>) -> Self {
        let len = points.len();
        let entries: Vec<PointEntry> = points
            .into_iter()
            .enumerate()
            .map(|(idx, point)| PointEntry { point, idx })
            .collect();
        Self { tree: RTree::bulk_load(entries), len }
    }
}

impl NearestIndex for RTreeIndex {
    fn len(&self) -> usize {
        self.len
    }

    fn name(&self) -> &'static str {
        "rtree"
    }

    fn nearest(&self, query: [f64; 2]) -> Option<Nearest> {
        // The iterator yields entries by ascending distance; drain every
        // entry tied with the first so the lowest index wins.
        let mut iter = self.tree.nearest_neighbor_iter_with_distance_2(&query);
        let (first, best_d2) = iter.next()?;
        let mut best = first.idx;
        for (entry, d2) in iter {
            if d2 > best_d2 {
                break;
            }
            best = best.min(entry.idx);
        }
        Some(Nearest { index: best, distance: best_d2.sqrt() })
    }
}
