//! Brute-force nearest-neighbour scan.

use crate::index::{Nearest, NearestIndex};

/// Full O(n) scan per query, no build cost.
///
/// Behaviourally identical to [`RTreeIndex`](crate::RTreeIndex): same
/// nearest point, same distance, lowest index on ties.
pub struct LinearScanIndex {
    points: Vec<[f64; 2]>,
}

impl LinearScanIndex {
    pub fn new(points: Vec<[f64; 2]>) -> Self {
        Self { points }
    }
}

impl NearestIndex for LinearScanIndex {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn name(&self) -> &'static str {
        "linear"
    }

    fn nearest(&self, query: [f64; 2]) -> Option<Nearest> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, p) in self.points.iter().enumerate() {
            let dx = p[0] - query[0];
            let dy = p[1] - query[1];
            let d2 = dx * dx + dy * dy;
            // Strict `<` keeps the earliest index on ties.
            if best.is_none_or(|(_, b)| d2 < b) {
                best = Some((idx, d2));
            }
        }
        best.map(|(index, d2)| Nearest { index, distance: d2.sqrt() })
    }
}
