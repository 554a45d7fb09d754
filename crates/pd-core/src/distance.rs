//! Distance models used for threshold tests.
//!
//! Two strategies are available and a run must use exactly one of them for
//! both assignment passes:
//!
//! | Strategy    | Formula                                                        |
//! |-------------|----------------------------------------------------------------|
//! | `Haversine` | great-circle distance on a sphere of radius 6,371,000 m        |
//! | `Planar`    | `√((Δlon·cos φ₀)² + Δlat²) · 111,000 m`, φ₀ fixed per run       |
//!
//! # Known approximation
//!
//! `Planar` uses a single reference latitude φ₀ (the bounding-box midpoint)
//! for the whole region.  Its error grows with the box's north–south extent
//! and is not corrected per point, so near the threshold boundary the two
//! models can disagree for geographically large regions.

use std::fmt;
use std::str::FromStr;

use crate::{BoundingBox, GeoPoint, PdError};

/// Mean Earth radius used by the haversine formula, metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Fixed degree-to-metre ratio used by the planar approximation.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

// ── LocalPlane ────────────────────────────────────────────────────────────────

/// Local equirectangular plane: longitude scaled by `cos(ref_lat)`.
///
/// Nearest-neighbour search always runs in this plane, whatever the
/// threshold model, so indexed and brute-force searches agree exactly.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocalPlane {
    pub ref_lat: f64,
    cos_ref: f64,
}

impl LocalPlane {
    pub fn new(ref_lat: f64) -> Self {
        Self { ref_lat, cos_ref: ref_lat.to_radians().cos() }
    }

    /// Plane centred on the midpoint latitude of `bbox`.
    pub fn for_bbox(bbox: &BoundingBox) -> Self {
        Self::new(bbox.mid_lat())
    }

    /// Project to `[x, y]` plane coordinates (degrees, x scaled).
    #[inline]
    pub fn project(&self, p: GeoPoint) -> [f64; 2] {
        [p.lon * self.cos_ref, p.lat]
    }

    /// Euclidean plane distance in (scaled) degrees.
    #[inline]
    pub fn distance_deg(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        let dx = (a.lon - b.lon) * self.cos_ref;
        let dy = a.lat - b.lat;
        (dx * dx + dy * dy).sqrt()
    }
}

// ── DistanceKind ──────────────────────────────────────────────────────────────

/// Configuration-level choice of distance model (no run-specific state).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DistanceKind {
    #[default]
    Haversine,
    Planar,
}

impl DistanceKind {
    /// Bind the choice to a concrete run extent.
    pub fn model_for(self, bbox: &BoundingBox) -> DistanceModel {
        match self {
            DistanceKind::Haversine => DistanceModel::Haversine,
            DistanceKind::Planar => DistanceModel::Planar(LocalPlane::for_bbox(bbox)),
        }
    }
}

impl fmt::Display for DistanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceKind::Haversine => f.write_str("haversine"),
            DistanceKind::Planar => f.write_str("planar"),
        }
    }
}

impl FromStr for DistanceKind {
    type Err = PdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "haversine" | "exact" => Ok(DistanceKind::Haversine),
            "planar" | "approx" => Ok(DistanceKind::Planar),
            other => Err(PdError::Config(format!(
                "unknown distance model {other:?}: expected \"haversine\" or \"planar\""
            ))),
        }
    }
}

// ── DistanceModel ─────────────────────────────────────────────────────────────

/// A distance model bound to one run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DistanceModel {
    Haversine,
    Planar(LocalPlane),
}

impl DistanceModel {
    /// Distance between `a` and `b` in metres.
    #[inline]
    pub fn distance_m(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        match self {
            DistanceModel::Haversine => a.haversine_m(b),
            DistanceModel::Planar(plane) => plane.distance_deg(a, b) * METERS_PER_DEGREE,
        }
    }
}
