//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `pd-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("nearest-neighbour query against an empty index")]
    EmptyIndex,
}

pub type SpatialResult<T> = Result<T, SpatialError>;
