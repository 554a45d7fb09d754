//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `road_density` and `assignments`.  Opening the writer
//! replaces whatever an earlier run left in the file.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{AssignmentRow, OutputResult, RoadDensityRow};

/// Writes run results to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    ///
    /// Tables left by an earlier run are dropped, so the file always holds
    /// exactly one run.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             DROP TABLE IF EXISTS road_density;
             DROP TABLE IF EXISTS assignments;
             CREATE TABLE road_density (
                 segment_id  TEXT    NOT NULL,
                 lon         REAL,
                 lat         REAL,
                 pop_density REAL    NOT NULL,
                 tile_count  INTEGER NOT NULL
             );
             CREATE TABLE assignments (
                 tile_key   TEXT    PRIMARY KEY,
                 tile_lon   REAL    NOT NULL,
                 tile_lat   REAL    NOT NULL,
                 segment_id TEXT    NOT NULL,
                 distance_m REAL    NOT NULL,
                 pop        REAL    NOT NULL,
                 pass       INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_roads(&mut self, rows: &[RoadDensityRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO road_density \
                 (segment_id, lon, lat, pop_density, tile_count) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.segment_id,
                    row.lon,
                    row.lat,
                    row.pop_density,
                    row.tile_count,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_assignments(&mut self, rows: &[AssignmentRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO assignments \
                 (tile_key, tile_lon, tile_lat, segment_id, distance_m, pop, pass) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tile_key,
                    row.tile_lon,
                    row.tile_lat,
                    row.segment_id,
                    row.distance_m,
                    row.pop,
                    row.pass,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
