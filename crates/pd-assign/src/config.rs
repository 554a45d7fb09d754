//! Engine configuration.

use serde::{Deserialize, Serialize};

use pd_core::{DistanceKind, PdError, PdResult};
use pd_spatial::IndexStrategy;

/// Half-width of a one arc-second tile, in degrees.
pub const DEFAULT_TILE_HALF_WIDTH_DEG: f64 = 1.0 / 7200.0;

/// Default maximum tile↔road distance, metres.
pub const DEFAULT_DISTANCE_THRESHOLD_M: f64 = 100.0;

/// Parameters of one assignment run.
///
/// Every field has a default, so a JSON config file only needs the keys it
/// changes:
///
/// ```json
/// { "distance_threshold_m": 75.0, "assume_lat_sorted": true }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignConfig {
    /// Box padding and nominal tile half-size, degrees.
    pub tile_half_width_deg:  f64,
    /// Source rows are sorted by ascending latitude (enables early exit).
    pub assume_lat_sorted:    bool,
    /// `None` assigns regardless of distance.
    pub distance_threshold_m: Option<f64>,
    pub distance:             DistanceKind,
    pub index:                IndexStrategy,
}

impl Default for AssignConfig {
    fn default() -> Self {
        Self {
            tile_half_width_deg:  DEFAULT_TILE_HALF_WIDTH_DEG,
            assume_lat_sorted:    false,
            distance_threshold_m: Some(DEFAULT_DISTANCE_THRESHOLD_M),
            distance:             DistanceKind::default(),
            index:                IndexStrategy::default(),
        }
    }
}

impl AssignConfig {
    pub fn tile_half_width(mut self, deg: f64) -> Self {
        self.tile_half_width_deg = deg;
        self
    }

    pub fn assume_lat_sorted(mut self, sorted: bool) -> Self {
        self.assume_lat_sorted = sorted;
        self
    }

    pub fn threshold_m(mut self, threshold: Option<f64>) -> Self {
        self.distance_threshold_m = threshold;
        self
    }

    pub fn distance(mut self, kind: DistanceKind) -> Self {
        self.distance = kind;
        self
    }

    pub fn index(mut self, strategy: IndexStrategy) -> Self {
        self.index = strategy;
        self
    }

    /// Reject values that would make the run meaningless.
    pub fn validate(&self) -> PdResult<()> {
        if !(self.tile_half_width_deg.is_finite() && self.tile_half_width_deg > 0.0) {
            return Err(PdError::Config(format!(
                "tile_half_width_deg must be a positive number, got {}",
                self.tile_half_width_deg
            )));
        }
        if let Some(t) = self.distance_threshold_m {
            if !(t.is_finite() && t >= 0.0) {
                return Err(PdError::Config(format!(
                    "distance_threshold_m must be finite and ≥ 0, got {t}"
                )));
            }
        }
        Ok(())
    }

    /// `true` if a proposal at `distance_m` is rejected by the threshold.
    #[inline]
    pub(crate) fn too_far(&self, distance_m: f64) -> bool {
        self.distance_threshold_m.is_some_and(|t| distance_m > t)
    }
}
