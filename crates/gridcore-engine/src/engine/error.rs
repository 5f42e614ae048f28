//! The error raised when formula text cannot be turned into an [`crate::engine::Ast`].
//!
//! The lexer and parser each set one of these variants directly at the point of
//! failure, so callers can match on the category without ever having to infer it
//! from a formatted message string.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FormulaException {
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("{0:?} is not a valid number")]
    InvalidNumber(String),
    #[error("{0:?} is not a valid cell reference")]
    InvalidReference(String),
    #[error("unexpected end of formula")]
    UnexpectedEof,
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),
    #[error("trailing input after formula: {0}")]
    TrailingInput(String),
}
