//! Bounding-box stream filter.
//!
//! Consumes an ordered row sequence and keeps only rows whose parsed centre
//! lies inside the (padded) box, summing rows that share a raw key.
//!
//! # Latitude-sorted early exit
//!
//! National grids are usually written south-to-north.  When the caller
//! declares the source latitude-sorted, the scan stops at the first
//! out-of-box row north of the box, provided at least one row has already
//! landed inside it.  This only saves time; with the flag off the whole
//! source is read and the result is the same for a sorted source.

use pd_core::BoundingBox;

use crate::{RawRow, TileKey, TileSet, TilesResult};

/// Row counters collected during one filter run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterStats {
    /// Rows pulled from the source, malformed ones included.
    pub rows_read:             u64,
    /// Malformed records and rows with non-numeric or non-finite fields.
    pub rows_unparsable:       u64,
    /// Rows that parsed but carry a negative population.
    pub rows_negative:         u64,
    pub rows_outside_bbox:     u64,
    pub rows_in_bbox:          u64,
    /// In-box rows whose raw key was already present.
    pub duplicate_rows_merged: u64,
    /// The lat-sorted early exit fired before the end of the source.
    pub early_exit:            bool,
}

/// Result of one filter run.
#[derive(Clone, Debug, Default)]
pub struct FilterOutcome {
    pub tiles: TileSet,
    pub stats: FilterStats,
}

/// Streams rows into a [`TileSet`], keeping only those inside `bbox`.
#[derive(Clone, Copy, Debug)]
pub struct TileFilter {
    bbox:              BoundingBox,
    assume_lat_sorted: bool,
}

impl TileFilter {
    /// Full-scan filter over `bbox` (edges inclusive).
    pub fn new(bbox: BoundingBox) -> Self {
        Self { bbox, assume_lat_sorted: false }
    }

    /// Enable the early exit for sources sorted by ascending latitude.
    /// Must stay `false` for unordered or unknown sources.
    pub fn assume_lat_sorted(mut self, sorted: bool) -> Self {
        self.assume_lat_sorted = sorted;
        self
    }

    /// Run the filter to completion (or early exit).
    ///
    /// An empty result is not an error: it means no population data overlaps
    /// the box, and the caller decides what to do about it.
    ///
    /// # Errors
    ///
    /// Only non-recoverable source errors (I/O) are returned; malformed
    /// records are counted in [`FilterStats::rows_unparsable`].
    pub fn run<I>(&self, rows: I) -> TilesResult<FilterOutcome>
    where
        I: IntoIterator<Item = TilesResult<RawRow>>,
    {
        let mut tiles = TileSet::new();
        let mut stats = FilterStats::default();
        let mut seen_in_range = false;

        for item in rows {
            stats.rows_read += 1;

            let row = match item {
                Ok(row) => row,
                Err(e) if e.is_recoverable() => {
                    log::trace!("skipping row {}: {e}", stats.rows_read);
                    stats.rows_unparsable += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let Some((center, value)) = row.parse() else {
                stats.rows_unparsable += 1;
                continue;
            };
            if value < 0.0 {
                stats.rows_negative += 1;
                continue;
            }

            if !self.bbox.contains(center) {
                stats.rows_outside_bbox += 1;
                if self.assume_lat_sorted && seen_in_range && center.lat > self.bbox.north {
                    stats.early_exit = true;
                    break;
                }
                continue;
            }

            seen_in_range = true;
            stats.rows_in_bbox += 1;
            let RawRow { lon, lat, .. } = row;
            if !tiles.accumulate(TileKey { lon, lat }, center, value) {
                stats.duplicate_rows_merged += 1;
            }
        }

        log::info!(
            "population rows read: {}, unparsable: {}, negative: {}, outside bbox: {}, in bbox: {}{}",
            stats.rows_read,
            stats.rows_unparsable,
            stats.rows_negative,
            stats.rows_outside_bbox,
            stats.rows_in_bbox,
            if stats.early_exit { " (lat-sorted early exit)" } else { "" },
        );
        log::info!(
            "unique tiles in bbox: {} ({} duplicate rows merged)",
            tiles.len(),
            stats.duplicate_rows_merged
        );

        Ok(FilterOutcome { tiles, stats })
    }
}
