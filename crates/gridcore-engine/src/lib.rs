//! Gridcore spreadsheet engine.
//!
//! This crate provides the core computation primitives for a spreadsheet:
//!
//! - [`engine::Position`] - cell address parsing (A1 notation ↔ row/col) and bounds checking
//! - [`engine::Cell`] - the empty / text / formula cell variants
//! - [`engine::Value`] and [`engine::FormulaError`] - the evaluated value and its error categories
//! - [`engine::parse_formula`] and [`engine::Ast`] - the formula language: lexer, parser, AST
//! - [`engine::CycleDetector`] - circular dependency detection over a position graph
//!
//! The engine has no notion of a grid or storage; that lives in `gridcore-core`. It only
//! knows how to parse, print, and evaluate a single formula given something that can answer
//! "what is the value at this position" ([`engine::CellLookup`]).

pub mod engine;

pub use engine::{
    Ast, Cell, CellLookup, CycleDetector, FormulaError, FormulaException, Position, Value,
    format_number, parse_formula,
};
