use std::path::PathBuf;

use pd_core::PdError;
use pd_spatial::SpatialError;
use pd_tiles::TilesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssignError {
    #[error(transparent)]
    Core(#[from] PdError),

    #[error("population source: {0}")]
    Tiles(#[from] TilesError),

    #[error("spatial index: {0}")]
    Spatial(#[from] SpatialError),

    #[error("road source not found: {}", .0.display())]
    RoadSourceNotFound(PathBuf),

    #[error("road CSV error: {0}")]
    RoadCsv(#[from] csv::Error),

    #[error("road {id}: {msg}")]
    RoadParse { id: String, msg: String },
}

pub type AssignResult<T> = Result<T, AssignError>;
