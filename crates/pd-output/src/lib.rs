//! `pd-output`: result writers for popdensity runs.
//!
//! Two tabular backends, the second behind a Cargo feature:
//!
//! | Feature   | Backend | Files created                               |
//! |-----------|---------|---------------------------------------------|
//! | *(none)*  | CSV     | `road_density.csv`, `assignments.csv`       |
//! | `sqlite`  | SQLite  | `output.db`                                 |
//!
//! Both implement [`OutputWriter`] and are driven by [`write_outcome`].
//! The coverage report and the two GeoJSON maps are written separately
//! with [`write_report_json`], [`write_top_roads_geojson`] and
//! [`write_contested_tiles_geojson`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use pd_output::{write_outcome, write_report_json, CsvWriter};
//!
//! let mut writer = CsvWriter::new(Path::new("./output"))?;
//! write_outcome(&mut writer, &roads, &outcome)?;
//! write_report_json(&Path::new("./output").join("coverage_report.json"), &report)?;
//! ```

pub mod csv;
pub mod error;
pub mod export;
pub mod report;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use crate::csv::{CsvWriter, ASSIGNMENTS_CSV, ROAD_DENSITY_CSV};
pub use error::{OutputError, OutputResult};
pub use export::write_outcome;
pub use report::{
    contested_tiles_feature_collection, top_roads_feature_collection,
    write_contested_tiles_geojson, write_report_json, write_top_roads_geojson,
    CONTESTED_TILES_GEOJSON, COVERAGE_REPORT_JSON, TOP_ROADS_GEOJSON,
};
pub use row::{AssignmentRow, RoadDensityRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
