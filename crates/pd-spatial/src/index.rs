//! Nearest-neighbour trait and strategy selection.
//!
//! # Pluggability
//!
//! The assignment engine calls the index only through [`NearestIndex`], so
//! the brute-force scan and the R-tree are interchangeable.  Which one is
//! used is decided by [`IndexStrategy`], normally `Auto`, which keeps the
//! linear scan for small inputs where building a tree costs more than it
//! saves.
//!
//! # Tie-break
//!
//! When several points are equidistant from a query, the lowest point index
//! wins.  Both implementations compute squared distances with the same
//! expression, so their answers are bit-identical.

use std::fmt;
use std::str::FromStr;

use crate::{LinearScanIndex, RTreeIndex, SpatialError, SpatialResult};

/// `Auto` switches to the R-tree once `points × queries` exceeds this.
pub const DEFAULT_LINEAR_SCAN_MAX_PAIRS: u64 = 250_000;

// ── Query results ─────────────────────────────────────────────────────────────

/// The nearest indexed point to one query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Nearest {
    /// Position of the point in the slice the index was built from.
    pub index: usize,
    /// Euclidean distance in plane units (scaled degrees).
    pub distance: f64,
}

/// Bulk query result: parallel arrays, one entry per query in query order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Neighbors {
    pub index: Vec<usize>,
    pub distance: Vec<f64>,
}

impl Neighbors {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// `(query position, nearest point index, plane distance)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.index
            .iter()
            .zip(&self.distance)
            .enumerate()
            .map(|(q, (&i, &d))| (q, i, d))
    }
}

impl FromIterator<Nearest> for Neighbors {
    fn from_iter<I: IntoIterator<Item = Nearest>>(iter: I) -> Self {
        let (index, distance) = iter.into_iter().map(|n| (n.index, n.distance)).unzip();
        Self { index, distance }
    }
}

// ── NearestIndex trait ────────────────────────────────────────────────────────

/// A static point set answering nearest-neighbour queries.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so bulk queries can be shared across
/// Rayon worker threads (feature `parallel`).
pub trait NearestIndex: Send + Sync {
    /// Number of indexed points.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name for log lines.
    fn name(&self) -> &'static str;

    /// Nearest point to `query`, `None` only when the index is empty.
    fn nearest(&self, query: [f64; 2]) -> Option<Nearest>;

    /// Answer every query in one call.
    ///
    /// # Errors
    ///
    /// [`SpatialError::EmptyIndex`] if the index holds no points.
    fn nearest_all(&self, queries: &[[f64; 2]]) -> SpatialResult<Neighbors> {
        if self.is_empty() {
            return Err(SpatialError::EmptyIndex);
        }

        #[cfg(not(feature = "parallel"))]
        let hits: Vec<Nearest> = queries
            .iter()
            .map(|&q| self.nearest(q).ok_or(SpatialError::EmptyIndex))
            .collect::<SpatialResult<_>>()?;

        #[cfg(feature = "parallel")]
        let hits: Vec<Nearest> = {
            use rayon::prelude::*;

            queries
                .par_iter()
                .map(|&q| self.nearest(q).ok_or(SpatialError::EmptyIndex))
                .collect::<SpatialResult<_>>()?
        };

        Ok(hits.into_iter().collect())
    }
}

// ── IndexStrategy ─────────────────────────────────────────────────────────────

/// Which [`NearestIndex`] implementation to build.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum IndexStrategy {
    /// Linear scan while `points × queries ≤ linear_scan_max_pairs`,
    /// R-tree above.
    Auto { linear_scan_max_pairs: u64 },
    LinearScan,
    RTree,
}

impl Default for IndexStrategy {
    fn default() -> Self {
        IndexStrategy::Auto { linear_scan_max_pairs: DEFAULT_LINEAR_SCAN_MAX_PAIRS }
    }
}

impl IndexStrategy {
    /// Collapse `Auto` to a concrete choice for the given input sizes.
    pub fn resolve(self, points: usize, queries: usize) -> IndexStrategy {
        match self {
            IndexStrategy::Auto { linear_scan_max_pairs } => {
                let pairs = (points as u64).saturating_mul(queries as u64);
                if pairs <= linear_scan_max_pairs {
                    IndexStrategy::LinearScan
                } else {
                    IndexStrategy::RTree
                }
            }
            concrete => concrete,
        }
    }
}

impl fmt::Display for IndexStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexStrategy::Auto { linear_scan_max_pairs } => {
                write!(f, "auto(linear ≤ {linear_scan_max_pairs} pairs)")
            }
            IndexStrategy::LinearScan => f.write_str("linear"),
            IndexStrategy::RTree => f.write_str("rtree"),
        }
    }
}

impl FromStr for IndexStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(IndexStrategy::default()),
            "linear" | "linear-scan" | "brute-force" => Ok(IndexStrategy::LinearScan),
            "rtree" | "r-tree" => Ok(IndexStrategy::RTree),
            other => Err(format!(
                "unknown index strategy {other:?}: expected \"auto\", \"linear\", or \"rtree\""
            )),
        }
    }
}

/// Build the index `strategy` resolves to for `points` and `query_count`.
pub fn build_index(
    strategy:    IndexStrategy,
    points:      Vec<[f64; 2]>,
    query_count: usize,
) -> Box<dyn NearestIndex> {
    let chosen = strategy.resolve(points.len(), query_count);
    log::debug!(
        "building {chosen} index over {} points for {query_count} queries (requested {strategy})",
        points.len()
    );
    match chosen {
        IndexStrategy::LinearScan => Box::new(LinearScanIndex::new(points)),
        // `resolve` never returns `Auto`.
        IndexStrategy::RTree | IndexStrategy::Auto { .. } => Box::new(RTreeIndex::new(points)),
    }
}
