//! Road-centre resolution and the padded bounding-box extractor.

use pd_core::{BoundingBox, GeoPoint, PdError, PdResult, RoadIdx};

use crate::RoadSegment;

/// Road centres that could be resolved, parallel to the roads they came
/// from, plus the roads that had none.
#[derive(Clone, Debug, Default)]
pub struct RoadCenters {
    pub points:  Vec<GeoPoint>,
    /// `road_idx[i]` is the input position of `points[i]`.  Ascending.
    pub road_idx: Vec<RoadIdx>,
    /// Roads without geometry or usable coordinates.
    pub missing: Vec<RoadIdx>,
}

impl RoadCenters {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Resolve every road's centre in input order.
pub fn resolve_centers(roads: &[RoadSegment]) -> RoadCenters {
    let mut out = RoadCenters {
        points:   Vec::with_capacity(roads.len()),
        road_idx: Vec::with_capacity(roads.len()),
        missing:  Vec::new(),
    };
    for (i, road) in roads.iter().enumerate() {
        let idx = RoadIdx(i as u32);
        match road.center() {
            Some(c) => {
                out.points.push(c);
                out.road_idx.push(idx);
            }
            None => out.missing.push(idx),
        }
    }
    out
}

/// Extent of `centers` padded by `tile_half_width_deg` on every side.
///
/// The padding keeps tiles whose centre sits just outside the raw extent
/// but whose cell overlaps a boundary road.
///
/// # Errors
///
/// [`PdError::EmptyInput`] when `centers` is empty.
pub fn padded_extent(centers: &[GeoPoint], tile_half_width_deg: f64) -> PdResult<BoundingBox> {
    BoundingBox::from_points(centers.iter().copied())
        .map(|b| b.padded(tile_half_width_deg))
        .ok_or_else(|| PdError::EmptyInput("no road segment has a resolvable centre".into()))
}
