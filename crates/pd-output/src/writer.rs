//! The `OutputWriter` trait implemented by all backend writers.

use crate::{AssignmentRow, OutputResult, RoadDensityRow};

/// Trait implemented by the CSV and SQLite writers.
pub trait OutputWriter {
    /// Write a batch of per-road density rows.
    fn write_roads(&mut self, rows: &[RoadDensityRow]) -> OutputResult<()>;

    /// Write a batch of tile assignments.
    fn write_assignments(&mut self, rows: &[AssignmentRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
