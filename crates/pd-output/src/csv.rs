//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `road_density.csv`
//! - `assignments.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AssignmentRow, OutputResult, RoadDensityRow};

pub const ROAD_DENSITY_CSV: &str = "road_density.csv";
pub const ASSIGNMENTS_CSV: &str = "assignments.csv";

/// Writes run results to two CSV files.
pub struct CsvWriter {
    roads:       Writer<File>,
    assignments: Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut roads = Writer::from_path(dir.join(ROAD_DENSITY_CSV))?;
        roads.write_record(["segment_id", "lon", "lat", "pop_density", "tile_count"])?;

        let mut assignments = Writer::from_path(dir.join(ASSIGNMENTS_CSV))?;
        assignments.write_record([
            "tile_key",
            "tile_lon",
            "tile_lat",
            "segment_id",
            "distance_m",
            "pop",
            "pass",
        ])?;

        Ok(Self { roads, assignments, finished: false })
    }
}

fn opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_roads(&mut self, rows: &[RoadDensityRow]) -> OutputResult<()> {
        for row in rows {
            self.roads.write_record(&[
                row.segment_id.clone(),
                opt(row.lon),
                opt(row.lat),
                row.pop_density.to_string(),
                row.tile_count.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_assignments(&mut self, rows: &[AssignmentRow]) -> OutputResult<()> {
        for row in rows {
            self.assignments.write_record(&[
                row.tile_key.clone(),
                row.tile_lon.to_string(),
                row.tile_lat.to_string(),
                row.segment_id.clone(),
                row.distance_m.to_string(),
                row.pop.to_string(),
                row.pass.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.roads.flush()?;
        self.assignments.flush()?;
        Ok(())
    }
}
