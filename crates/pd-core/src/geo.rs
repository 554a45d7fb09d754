//! Geographic coordinate type and bounding boxes.
//!
//! `GeoPoint` stores WGS-84 degrees in `f64`.  Population grids at one
//! arc-second resolution have cell centres ~30 m apart, and the raw CSV text
//! carries more digits than `f32` can hold, so single precision is not enough
//! here.

use crate::distance::EARTH_RADIUS_M;

/// A WGS-84 geographic coordinate, x/y order (`lon`, `lat`).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Both components are finite (no NaN / ±inf from a bad parse).
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Haversine great-circle distance in metres on a spherical Earth.
    pub fn haversine_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
        EARTH_RADIUS_M * c
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

// ── BoundingBox ───────────────────────────────────────────────────────────────

/// Axis-aligned extent in degrees.  All edges are inclusive.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub west:  f64,
    pub east:  f64,
    pub south: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Tight extent of `points`.  Returns `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self {
            west:  first.lon,
            east:  first.lon,
            south: first.lat,
            north: first.lat,
        };
        for p in iter {
            bbox.west  = bbox.west.min(p.lon);
            bbox.east  = bbox.east.max(p.lon);
            bbox.south = bbox.south.min(p.lat);
            bbox.north = bbox.north.max(p.lat);
        }
        Some(bbox)
    }

    /// Grow the box outward by `pad` degrees on every side.
    pub fn padded(self, pad: f64) -> Self {
        Self {
            west:  self.west - pad,
            east:  self.east + pad,
            south: self.south - pad,
            north: self.north + pad,
        }
    }

    /// Inclusive containment test.  NaN coordinates are never contained.
    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lon >= self.west && p.lon <= self.east && p.lat >= self.south && p.lat <= self.north
    }

    /// Strict interior test (edges excluded).
    #[inline]
    pub fn contains_strictly(&self, p: GeoPoint) -> bool {
        p.lon > self.west && p.lon < self.east && p.lat > self.south && p.lat < self.north
    }

    /// Latitude halfway between `south` and `north`.
    #[inline]
    pub fn mid_lat(&self) -> f64 {
        (self.south + self.north) * 0.5
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "west={:.6}, east={:.6}, south={:.6}, north={:.6}",
            self.west, self.east, self.south, self.north
        )
    }
}
