//! Plain data row types written by output backends.

use pd_assign::{AssignOutcome, RoadSegment};

/// Final density of one road segment.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadDensityRow {
    pub segment_id:  String,
    /// Resolved centre; `None` for roads without geometry or coordinates.
    pub lon:         Option<f64>,
    pub lat:         Option<f64>,
    pub pop_density: f64,
    pub tile_count:  u32,
}

/// One tile handed to one road.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentRow {
    /// Raw `lon,lat` text the tile was keyed by.
    pub tile_key:   String,
    pub tile_lon:   f64,
    pub tile_lat:   f64,
    pub segment_id: String,
    pub distance_m: f64,
    pub pop:        f64,
    /// 1 (road → tile) or 2 (tile → road).
    pub pass:       u8,
}

impl RoadDensityRow {
    /// One row per input road, in input order.
    pub fn from_outcome(roads: &[RoadSegment], outcome: &AssignOutcome) -> Vec<Self> {
        let counts = outcome.tile_counts();
        roads
            .iter()
            .zip(&outcome.road_density)
            .zip(counts)
            .map(|((road, &pop_density), tile_count)| {
                let center = road.center();
                Self {
                    segment_id: road.id.to_string(),
                    lon: center.map(|c| c.lon),
                    lat: center.map(|c| c.lat),
                    pop_density,
                    tile_count,
                }
            })
            .collect()
    }
}

impl AssignmentRow {
    /// One row per assignment, pass 1 first.
    pub fn from_outcome(roads: &[RoadSegment], outcome: &AssignOutcome) -> Vec<Self> {
        outcome
            .assignments
            .iter()
            .map(|a| {
                let tile = outcome.tiles.get(a.tile);
                Self {
                    tile_key:   tile.key.to_string(),
                    tile_lon:   tile.center.lon,
                    tile_lat:   tile.center.lat,
                    segment_id: roads[a.road.index()].id.to_string(),
                    distance_m: a.distance_m,
                    pop:        a.pop,
                    pass:       a.pass.number(),
                }
            })
            .collect()
    }
}
