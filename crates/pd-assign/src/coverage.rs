//! Coverage report over a finished run.
//!
//! [`CoverageReport::build`] only reads the roads and the outcome.  The
//! report is `Serialize` so the CLI can dump it as JSON next to the CSVs.
//!
//! An `AlreadyAnnotated` outcome carries densities but no assignments.  Its
//! report ranks roads by the existing densities and leaves every
//! assignment-based figure empty.

use serde::Serialize;

use pd_core::{BoundingBox, DistanceKind, SegmentId};

use crate::{AssignOutcome, AssignPass, AssignStatus, RoadSegment};

/// Default length of the ranked lists.
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoverageReport {
    pub status:      AssignStatus,
    pub distance:    DistanceKind,
    pub threshold_m: Option<f64>,
    pub bbox:        Option<BoundingBox>,
    pub tiles:       TileCoverage,
    pub population:  PopulationCoverage,
    pub roads:       RoadCoverage,
    /// Over roads with a non-zero density only.
    pub density:     Option<DensityStats>,

    pub top_by_population:        Vec<RoadEntry>,
    pub top_by_tile_count:        Vec<RoadEntry>,
    pub farthest_assignments:     Vec<AssignmentEntry>,
    pub roads_without_assignment: Vec<SegmentId>,
    pub roads_without_center:     Vec<SegmentId>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct TileCoverage {
    /// Unique tiles inside the box.
    pub considered:        u64,
    pub used:              u64,
    pub used_pass1:        u64,
    pub used_pass2:        u64,
    pub too_far:           u64,
    pub rows_outside_bbox: u64,
    pub rows_unparsable:   u64,
    pub rows_negative:     u64,
    pub fraction_used:     Option<f64>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct PopulationCoverage {
    pub total_in_bbox:     f64,
    pub assigned:          f64,
    pub uncovered:         f64,
    pub fraction_assigned: Option<f64>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RoadCoverage {
    pub total:                 u64,
    pub without_center:        u64,
    pub with_population:       u64,
    /// `None` when the run made no assignments to count.
    pub with_zero_assignments: Option<u64>,
}

/// Summary statistics of a set of densities.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct DensityStats {
    pub count:  u64,
    pub min:    f64,
    pub max:    f64,
    pub mean:   f64,
    pub median: f64,
    /// Population standard deviation.
    pub stdev:  f64,
    pub total:  f64,
}

impl DensityStats {
    /// `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let total: f64 = sorted.iter().sum();
        let mean = total / n as f64;
        let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) * 0.5
        };

        Some(Self {
            count: n as u64,
            min: sorted[0],
            max: sorted[n - 1],
            mean,
            median,
            stdev: var.sqrt(),
            total,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoadEntry {
    pub segment_id:  SegmentId,
    pub pop_density: f64,
    /// `None` for densities that were already on the input.
    pub tile_count:  Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssignmentEntry {
    pub tile_key:   String,
    pub segment_id: SegmentId,
    pub distance_m: f64,
    pub pop:        f64,
    pub pass:       AssignPass,
}

fn ratio(num: f64, den: f64) -> Option<f64> {
    (den > 0.0).then(|| num / den)
}

impl CoverageReport {
    /// Summarise `outcome`; `roads` must be the slice the run was given.
    pub fn build(roads: &[RoadSegment], outcome: &AssignOutcome, top_n: usize) -> Self {
        let density = &outcome.road_density;
        let counts = outcome.tile_counts();
        let assigned_here = outcome.status != AssignStatus::AlreadyAnnotated;
        let stats = &outcome.stats;

        let used = stats.tiles_used_pass1 + stats.tiles_used_pass2;
        let considered = outcome.tiles.len() as u64;
        let tiles = TileCoverage {
            considered,
            used,
            used_pass1: stats.tiles_used_pass1,
            used_pass2: stats.tiles_used_pass2,
            too_far: stats.tiles_too_far,
            rows_outside_bbox: outcome.filter_stats.rows_outside_bbox,
            rows_unparsable: outcome.filter_stats.rows_unparsable,
            rows_negative: outcome.filter_stats.rows_negative,
            fraction_used: ratio(used as f64, considered as f64),
        };

        let total_in_bbox = outcome.tiles.total_pop();
        let assigned = outcome.total_assigned();
        let population = PopulationCoverage {
            total_in_bbox,
            assigned,
            uncovered: (total_in_bbox - assigned).max(0.0),
            fraction_assigned: ratio(assigned, total_in_bbox),
        };

        let nonzero: Vec<f64> = density.iter().copied().filter(|&d| d > 0.0).collect();
        let roads_cov = RoadCoverage {
            total:                 roads.len() as u64,
            without_center:        outcome.roads_without_center.len() as u64,
            with_population:       nonzero.len() as u64,
            with_zero_assignments: assigned_here
                .then(|| counts.iter().filter(|&&c| c == 0).count() as u64),
        };

        let entry = |i: usize| RoadEntry {
            segment_id:  roads[i].id.clone(),
            pop_density: density[i],
            tile_count:  assigned_here.then_some(counts[i]),
        };

        // Ties keep input order (stable sort).
        let mut by_pop: Vec<usize> = (0..roads.len())
            .filter(|&i| if assigned_here { counts[i] > 0 } else { density[i] > 0.0 })
            .collect();
        let mut by_count = if assigned_here { by_pop.clone() } else { Vec::new() };
        by_pop.sort_by(|&a, &b| density[b].total_cmp(&density[a]));
        by_count.sort_by(|&a, &b| counts[b].cmp(&counts[a]));

        let mut farthest: Vec<_> = outcome.assignments.iter().collect();
        farthest.sort_by(|a, b| b.distance_m.total_cmp(&a.distance_m));

        Self {
            status: outcome.status,
            distance: outcome.distance,
            threshold_m: outcome.threshold_m,
            bbox: outcome.bbox,
            tiles,
            population,
            roads: roads_cov,
            density: DensityStats::from_values(&nonzero),
            top_by_population: by_pop.into_iter().take(top_n).map(entry).collect(),
            top_by_tile_count: by_count.into_iter().take(top_n).map(entry).collect(),
            farthest_assignments: farthest
                .into_iter()
                .take(top_n)
                .map(|a| AssignmentEntry {
                    tile_key:   outcome.tiles.get(a.tile).key.to_string(),
                    segment_id: roads[a.road.index()].id.clone(),
                    distance_m: a.distance_m,
                    pop:        a.pop,
                    pass:       a.pass,
                })
                .collect(),
            roads_without_assignment: (0..roads.len())
                .filter(|&i| assigned_here && counts[i] == 0)
                .map(|i| roads[i].id.clone())
                .collect(),
            roads_without_center: outcome
                .roads_without_center
                .iter()
                .map(|r| roads[r.index()].id.clone())
                .collect(),
        }
    }

    /// Log the headline numbers at `info`.
    pub fn log_summary(&self) {
        log::info!("status: {}", self.status);
        log::info!(
            "tiles: {} considered, {} used ({} pass 1, {} pass 2), {} too far",
            self.tiles.considered,
            self.tiles.used,
            self.tiles.used_pass1,
            self.tiles.used_pass2,
            self.tiles.too_far
        );
        log::info!(
            "rows: {} outside bbox, {} unparsable, {} negative",
            self.tiles.rows_outside_bbox,
            self.tiles.rows_unparsable,
            self.tiles.rows_negative
        );
        match self.population.fraction_assigned {
            Some(f) => log::info!(
                "population: {:.1} of {:.1} assigned ({:.2}%), {:.1} uncovered",
                self.population.assigned,
                self.population.total_in_bbox,
                f * 100.0,
                self.population.uncovered
            ),
            None => log::info!("population: none inside the box"),
        }
        match self.roads.with_zero_assignments {
            Some(idle) => log::info!(
                "roads: {} total, {} with population, {} without tiles, {} without centre",
                self.roads.total,
                self.roads.with_population,
                idle,
                self.roads.without_center
            ),
            None => log::info!(
                "roads: {} total, {} with existing population",
                self.roads.total,
                self.roads.with_population
            ),
        }
        if let Some(d) = &self.density {
            log::info!(
                "density: min {:.2}, max {:.2}, mean {:.2}, median {:.2}, stdev {:.2}",
                d.min,
                d.max,
                d.mean,
                d.median,
                d.stdev
            );
        }
    }
}
