//! Road segments as handed over by the street-network provider.

use geo::{Centroid, Coord, LineString};

use pd_core::{GeoPoint, SegmentId};

/// One road segment (one edge of the road network).
///
/// The centre is taken from `geometry` when it has one, else from `coord`.
/// `pop_density` is `Some` once a segment has been annotated; the engine
/// refuses to annotate a road set twice.
#[derive(Clone, Debug, PartialEq)]
pub struct RoadSegment {
    pub id:          SegmentId,
    /// Polyline in (lon, lat) order.
    pub geometry:    Option<Vec<GeoPoint>>,
    /// Explicit centre attributes (`x`/`y`), used when there is no geometry.
    pub coord:       Option<GeoPoint>,
    pub pop_density: Option<f64>,
}

impl RoadSegment {
    pub fn new(id: impl Into<SegmentId>) -> Self {
        Self { id: id.into(), geometry: None, coord: None, pop_density: None }
    }

    pub fn with_coord(mut self, coord: GeoPoint) -> Self {
        self.coord = Some(coord);
        self
    }

    pub fn with_geometry(mut self, geometry: Vec<GeoPoint>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_pop_density(mut self, pop_density: f64) -> Self {
        self.pop_density = Some(pop_density);
        self
    }

    #[inline]
    pub fn is_annotated(&self) -> bool {
        self.pop_density.is_some()
    }

    /// Resolve the centre coordinate.
    ///
    /// Length-weighted centroid of the geometry if it yields a finite point,
    /// otherwise the explicit coordinate if finite, otherwise `None`.
    pub fn center(&self) -> Option<GeoPoint> {
        self.geometry_centroid()
            .or(self.coord)
            .filter(|c| c.is_finite())
    }

    fn geometry_centroid(&self) -> Option<GeoPoint> {
        let pts = self.geometry.as_ref()?;
        let line: LineString<f64> = pts.iter().map(|p| Coord { x: p.lon, y: p.lat }).collect();
        line.centroid()
            .map(|c| GeoPoint::new(c.x(), c.y()))
            .filter(|c| c.is_finite())
    }
}
