//! Drives an [`OutputWriter`] from a finished run.

use pd_assign::{AssignOutcome, RoadSegment};

use crate::{AssignmentRow, OutputResult, OutputWriter, RoadDensityRow};

/// Write every road and every assignment of `outcome`, then finish.
///
/// `roads` must be the slice the run was given.
pub fn write_outcome<W: OutputWriter>(
    writer:  &mut W,
    roads:   &[RoadSegment],
    outcome: &AssignOutcome,
) -> OutputResult<()> {
    let road_rows = RoadDensityRow::from_outcome(roads, outcome);
    let assignment_rows = AssignmentRow::from_outcome(roads, outcome);
    writer.write_roads(&road_rows)?;
    writer.write_assignments(&assignment_rows)?;
    writer.finish()?;
    log::info!(
        "wrote {} road rows and {} assignment rows",
        road_rows.len(),
        assignment_rows.len()
    );
    Ok(())
}
