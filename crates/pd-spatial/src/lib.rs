//! `pd-spatial`: nearest-neighbour indexing over planar point sets.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`index`]  | `NearestIndex` trait, `Nearest`, `Neighbors`, `IndexStrategy` |
//! | [`rtree`]  | `RTreeIndex` (rstar bulk-loaded R-tree)                      |
//! | [`linear`] | `LinearScanIndex` (O(n·m) brute force)                       |
//! | [`error`]  | `SpatialError`, `SpatialResult<T>`                           |
//!
//! Points are `[x, y]` coordinates in a local equirectangular plane (see
//! `pd_core::LocalPlane`).  Both implementations break distance ties towards
//! the lowest point index, so swapping one for the other never changes an
//! answer.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | `nearest_all` fans queries out over Rayon.                 |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `IndexStrategy`.      |

pub mod error;
pub mod index;
pub mod linear;
pub mod rtree;


pub use error::{SpatialError, SpatialResult};
pub use index::{build_index, IndexStrategy, Nearest, NearestIndex, Neighbors};
pub use linear::LinearScanIndex;
pub use rtree::RTreeIndex;
