use std::time::Duration;

use crate::Pos;

/// Errors reported by the grid, the rules and the simulation driver.
///
/// All of them are precondition violations detected at the offending call;
/// none of them leave the grid partially updated.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    InvalidDimension { rows: usize, cols: usize },
    #[error("grid has not been built")]
    NotBuilt,
    #[error("population is {found_rows}x{found_cols}, expected {rows}x{cols}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        found_rows: usize,
        found_cols: usize,
    },
    #[error("population rows have uneven lengths (row {row} has {len} cells, expected {cols})")]
    RaggedPopulation { row: usize, len: usize, cols: usize },
    #[error("invalid rule: {0}")]
    InvalidRule(String),
    #[error("position ({}, {}) is outside the grid", .0.x, .0.y)]
    OutOfBounds(Pos),
    #[error("tick interval {0:?} cannot be scheduled")]
    InvalidInterval(Duration),
    #[error("unknown preset `{0}`")]
    UnknownPreset(String),
    #[error("simulation thread is no longer running")]
    Disconnected,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
