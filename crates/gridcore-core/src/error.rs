//! Error type for sheet-boundary operations.

use thiserror::Error;

use gridcore_engine::FormulaException;

/// Everything that can go wrong entering or reading a cell, surfaced as a
/// structured variant rather than inferred from an error message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SheetError {
    #[error("cell address out of range: {0}")]
    InvalidPosition(String),

    #[error(transparent)]
    Formula(#[from] FormulaException),

    #[error("formula would create a circular dependency")]
    CircularDependency,
}

pub type Result<T> = std::result::Result<T, SheetError>;
