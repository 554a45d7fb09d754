//! `pd-assign`: distributes gridded population over road segments.
//!
//! # Run
//!
//! ```text
//! roads ──► centres ──► padded bbox ──► TileFilter(rows) ──► TileSet
//!                                                              │
//!     pass 1: road → nearest tile (one winner per tile) ◄──────┤
//!     pass 2: leftover tile → nearest road               ◄──────┘
//!                                                              │
//!                              AssignOutcome ──► CoverageReport
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`config`]   | `AssignConfig` and its defaults                          |
//! | [`road`]     | `RoadSegment`, centre resolution                         |
//! | [`roads`]    | CSV road loader                                          |
//! | [`bbox`]     | `resolve_centers`, `padded_extent`                       |
//! | [`engine`]   | `assign_density`                                         |
//! | [`outcome`]  | `AssignOutcome`, `Assignment`, `AssignStatus`, `PassStats` |
//! | [`coverage`] | `CoverageReport`, `DensityStats`                         |
//! | [`error`]    | `AssignError`, `AssignResult<T>`                         |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Bulk nearest-neighbour queries on Rayon.               |
//! | `fx-hash`  | FxHash for the raw tile-key map.                       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pd_assign::{assign_density, load_roads_csv, AssignConfig, CoverageReport};
//! use pd_tiles::open_population_csv;
//!
//! let mut roads = load_roads_csv("roads.csv".as_ref())?;
//! let rows = open_population_csv("population.csv".as_ref())?;
//! let outcome = assign_density(&roads, rows, &AssignConfig::default())?;
//! CoverageReport::build(&roads, &outcome, 10).log_summary();
//! outcome.apply_to(&mut roads);
//! ```

pub mod bbox;
pub mod config;
pub mod coverage;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod road;
pub mod roads;

#[cfg(test)]
mod tests;

pub use bbox::{padded_extent, resolve_centers, RoadCenters};
pub use config::{AssignConfig, DEFAULT_DISTANCE_THRESHOLD_M, DEFAULT_TILE_HALF_WIDTH_DEG};
pub use coverage::{
    AssignmentEntry, CoverageReport, DensityStats, PopulationCoverage, RoadCoverage, RoadEntry,
    TileCoverage, DEFAULT_TOP_N,
};
pub use engine::assign_density;
pub use error::{AssignError, AssignResult};
pub use outcome::{AssignOutcome, AssignPass, AssignStatus, Assignment, PassStats};
pub use road::RoadSegment;
pub use roads::{load_roads_csv, load_roads_reader};
