//! `pd-core`: foundational types for the popdensity workspace.
//!
//! This crate is a dependency of every other `pd-*` crate.  It has no `pd-*`
//! dependencies and only `thiserror` (plus optional `serde`) externally.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `RoadIdx`, `TileIdx`, `SegmentId`                     |
//! | [`geo`]         | `GeoPoint`, `BoundingBox`, haversine distance         |
//! | [`distance`]    | `DistanceModel`, `DistanceKind`, `LocalPlane`         |
//! | [`error`]       | `PdError`, `PdResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod distance;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use distance::{DistanceKind, DistanceModel, LocalPlane, EARTH_RADIUS_M, METERS_PER_DEGREE};
pub use error::{PdError, PdResult};
pub use geo::{BoundingBox, GeoPoint};
pub use ids::{RoadIdx, SegmentId, TileIdx};
