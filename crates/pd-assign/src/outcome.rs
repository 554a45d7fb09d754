//! What one engine run hands back.

use std::fmt;

use serde::{Deserialize, Serialize};

use pd_core::{BoundingBox, DistanceKind, RoadIdx, TileIdx};
use pd_tiles::{FilterStats, TileSet};

use crate::RoadSegment;

/// Which pass produced an assignment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignPass {
    /// Pass 1: a road claimed its nearest tile.
    RoadToTile,
    /// Pass 2: a leftover tile went to its nearest road.
    TileToRoad,
}

impl AssignPass {
    pub fn number(self) -> u8 {
        match self {
            AssignPass::RoadToTile => 1,
            AssignPass::TileToRoad => 2,
        }
    }
}

impl fmt::Display for AssignPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignStatus {
    /// At least one input road already had `pop_density`; nothing was done.
    AlreadyAnnotated,
    /// No road has a resolvable centre.
    NoRoads,
    /// No population row fell inside the box.
    NoTiles,
    Completed,
}

impl fmt::Display for AssignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssignStatus::AlreadyAnnotated => "already annotated",
            AssignStatus::NoRoads => "no roads",
            AssignStatus::NoTiles => "no tiles",
            AssignStatus::Completed => "completed",
        })
    }
}

/// One tile handed to one road.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Assignment {
    pub tile:       TileIdx,
    pub road:       RoadIdx,
    /// Metric distance between road centre and tile centre.
    pub distance_m: f64,
    pub pop:        f64,
    pub pass:       AssignPass,
}

/// Per-pass counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassStats {
    pub tiles_used_pass1: u64,
    pub tiles_used_pass2: u64,
    /// Pass-1 proposals dropped by the threshold.
    pub pass1_too_far:    u64,
    /// Pass-1 proposals that lost their tile to a closer (or lower) road.
    pub pass1_conflicts:  u64,
    /// Tiles left unassigned after pass 2.
    pub tiles_too_far:    u64,
}

/// Result of [`assign_density`](crate::assign_density).
#[derive(Clone, Debug)]
pub struct AssignOutcome {
    pub status:               AssignStatus,
    /// Assigned population per input road, parallel to the input slice.
    /// For `AlreadyAnnotated` this holds the existing values (missing as 0).
    pub road_density:         Vec<f64>,
    /// Pass-1 assignments in tile order, then pass-2 in tile order.
    pub assignments:          Vec<Assignment>,
    pub tiles:                TileSet,
    pub filter_stats:         FilterStats,
    pub roads_without_center: Vec<RoadIdx>,
    pub bbox:                 Option<BoundingBox>,
    pub distance:             DistanceKind,
    pub threshold_m:          Option<f64>,
    pub stats:                PassStats,
    /// Pass-1 proposals within the threshold per tile, parallel to
    /// `tiles`.  Empty when the engine stopped before pass 1.
    pub tile_proposals:       Vec<u32>,
}

impl AssignOutcome {
    /// Outcome with no work done and the given per-road densities.
    pub(crate) fn empty(
        status:       AssignStatus,
        road_density: Vec<f64>,
        distance:     DistanceKind,
        threshold_m:  Option<f64>,
    ) -> Self {
        Self {
            status,
            road_density,
            assignments: Vec::new(),
            tiles: TileSet::new(),
            filter_stats: FilterStats::default(),
            roads_without_center: Vec::new(),
            bbox: None,
            distance,
            threshold_m,
            stats: PassStats::default(),
            tile_proposals: Vec::new(),
        }
    }

    /// Population handed out across both passes.
    pub fn total_assigned(&self) -> f64 {
        self.assignments.iter().map(|a| a.pop).sum()
    }

    /// Number of tiles each road received, parallel to `road_density`.
    pub fn tile_counts(&self) -> Vec<u32> {
        let mut counts = vec![0u32; self.road_density.len()];
        for a in &self.assignments {
            counts[a.road.index()] += 1;
        }
        counts
    }

    /// Tiles that more than one road proposed in pass 1, most proposals
    /// first (ties in tile order).
    pub fn contested_tiles(&self) -> Vec<TileIdx> {
        let mut contested: Vec<usize> =
            (0..self.tile_proposals.len()).filter(|&t| self.tile_proposals[t] > 1).collect();
        contested.sort_by(|&a, &b| self.tile_proposals[b].cmp(&self.tile_proposals[a]));
        contested.into_iter().map(|t| TileIdx(t as u32)).collect()
    }

    /// Road holding `tile`, if any.
    pub fn road_for_tile(&self, tile: TileIdx) -> Option<RoadIdx> {
        self.assignments.iter().find(|a| a.tile == tile).map(|a| a.road)
    }

    /// Write `road_density` into `roads`.
    ///
    /// Does nothing for `AlreadyAnnotated` so existing values survive.
    pub fn apply_to(&self, roads: &mut [RoadSegment]) {
        if self.status == AssignStatus::AlreadyAnnotated {
            return;
        }
        for (road, &d) in roads.iter_mut().zip(&self.road_density) {
            road.pop_density = Some(d);
        }
    }
}
