//! `pd-tiles`: population-grid rows, tile aggregation, and stream filtering.
//!
//! # Pipeline
//!
//! ```text
//! CSV file ──► CsvRowSource ──► TileFilter (bbox, lat-sorted early exit) ──► TileSet
//!              (raw text rows)   (parse, count, sum duplicate keys)
//! ```
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`row`]    | `RawRow`, `CsvRowSource`, `open_population_csv`            |
//! | [`tile`]   | `TileKey`, `PopulationTile`, `TileSet`                     |
//! | [`filter`] | `TileFilter`, `FilterOutcome`, `FilterStats`               |
//! | [`error`]  | `TilesError`, `TilesResult<T>`                             |
//!
//! Memory is bounded by the number of tiles inside the box, never by the
//! size of the source: rows are pulled one at a time and dropped unless
//! they land inside the box.

pub mod error;
pub mod filter;
pub mod row;
pub mod tile;


pub use error::{TilesError, TilesResult};
pub use filter::{FilterOutcome, FilterStats, TileFilter};
pub use row::{open_population_csv, CsvRowSource, RawRow, DEFAULT_POPULATION_CSV};
pub use tile::{PopulationTile, TileKey, TileSet};
