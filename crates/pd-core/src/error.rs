//! Workspace error type.
//!
//! Sub-crates define their own error enums and convert them into `PdError`
//! via `From` impls where the engine needs a single error surface.

use thiserror::Error;

/// The top-level error type for `pd-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum PdError {
    /// No road segment exposes a resolvable centre coordinate.
    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `pd-*` crates.
pub type PdResult<T> = Result<T, PdError>;
