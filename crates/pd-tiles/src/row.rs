//! Population CSV row source.
//!
//! # CSV format
//!
//! A header-bearing delimited file whose first three columns are, in order,
//! longitude, latitude and population.  Column names are taken from the
//! header for logging only; position is what matters.  Extra columns are
//! ignored.
//!
//! ```csv
//! longitude,latitude,population_2020
//! 15.4379166666667,47.0229166666667,3.4418
//! 15.4381944444444,47.0229166666667,3.6102
//! ```
//!
//! Fields are kept as trimmed text.  Tile identity is the text, not the
//! parsed float, because reparsing can merge or split cells whose text
//! differs only in trailing digits.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use pd_core::GeoPoint;

use crate::{TilesError, TilesResult};

/// Population CSV used when the caller gives no path.
pub const DEFAULT_POPULATION_CSV: &str = "data/population_data/aut_general_2020.csv";

// ── RawRow ────────────────────────────────────────────────────────────────────

/// One source row as text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRow {
    pub lon:   String,
    pub lat:   String,
    pub value: String,
}

impl RawRow {
    pub fn new(lon: impl Into<String>, lat: impl Into<String>, value: impl Into<String>) -> Self {
        Self { lon: lon.into(), lat: lat.into(), value: value.into() }
    }

    /// Parse to `(centre, population)`.
    ///
    /// Returns `None` unless all three fields are finite numbers.  Negative
    /// populations parse; the filter drops them.
    pub fn parse(&self) -> Option<(GeoPoint, f64)> {
        let lon: f64 = self.lon.trim().parse().ok()?;
        let lat: f64 = self.lat.trim().parse().ok()?;
        let value: f64 = self.value.trim().parse().ok()?;
        let center = GeoPoint::new(lon, lat);
        (center.is_finite() && value.is_finite()).then_some((center, value))
    }
}

// ── CsvRowSource ──────────────────────────────────────────────────────────────

/// Streams [`RawRow`]s out of a population CSV, one record at a time.
///
/// Yields `Err(TilesError::MalformedRecord)` for records the filter should
/// count and skip (too few fields, invalid UTF-8) and `Err(TilesError::Csv)`
/// for I/O failures, which end the scan.
pub struct CsvRowSource<R: Read> {
    reader:  csv::Reader<R>,
    record:  StringRecord,
    columns: [String; 3],
}

impl<R: Read> CsvRowSource<R> {
    /// Wrap any `Read` source.  Reads the header immediately.
    ///
    /// Useful for testing (pass a `std::io::Cursor`).
    pub fn from_reader(reader: R) -> TilesResult<Self> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?;
        if headers.len() < 3 {
            return Err(TilesError::Header(format!(
                "expected at least 3 columns (lon, lat, population), found {}",
                headers.len()
            )));
        }
        let columns = [
            headers[0].to_owned(),
            headers[1].to_owned(),
            headers[2].to_owned(),
        ];

        Ok(Self { reader, record: StringRecord::new(), columns })
    }

    /// Header names of the lon, lat and population columns.
    pub fn columns(&self) -> &[String; 3] {
        &self.columns
    }
}

impl<R: Read> Iterator for CsvRowSource<R> {
    type Item = TilesResult<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) if self.record.len() < 3 => {
                let line = self.record.position().map_or(0, |p| p.line());
                Some(Err(TilesError::MalformedRecord(format!(
                    "line {line}: expected at least 3 fields, found {}",
                    self.record.len()
                ))))
            }
            Ok(true) => Some(Ok(RawRow::new(&self.record[0], &self.record[1], &self.record[2]))),
            Err(e) if e.is_io_error() => Some(Err(TilesError::Csv(e))),
            Err(e) => Some(Err(TilesError::MalformedRecord(e.to_string()))),
        }
    }
}

/// Open a population CSV from disk.
///
/// # Errors
///
/// [`TilesError::SourceNotFound`] if `path` does not exist; other open and
/// header failures as [`TilesError::Io`] / [`TilesError::Header`].
pub fn open_population_csv(path: &Path) -> TilesResult<CsvRowSource<File>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => TilesError::SourceNotFound(path.to_path_buf()),
        _ => TilesError::Io(e),
    })?;
    let source = CsvRowSource::from_reader(file)?;
    let [lon, lat, pop] = source.columns();
    log::debug!("{}: lon={lon}, lat={lat}, population={pop}", path.display());
    Ok(source)
}
