//! The contents of a single cell: empty, plain text, or a parsed formula.

use super::{Ast, FormulaException, Position, Value, parse_formula};

/// Resolves a cell reference to its current value. The sheet implements this so the
/// formula AST never needs to know how cells are stored or how caching works.
pub trait CellLookup {
    fn lookup(&self, pos: Position) -> Value;
}

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    /// `source` is the canonical printed form of `ast`, not the text the user typed.
    Formula { source: String, ast: Ast, refs: Vec<Position> },
}

impl Cell {
    /// Parse `text` and build the cell it describes. A leading `=` (with more text
    /// after it) starts a formula; anything else, including the empty string and a
    /// lone `=`, is stored verbatim as text (an empty string collapses to `Empty`
    /// rather than an empty `Text`). A leading `'` is kept as part of the stored
    /// text — it is stripped only when the cell's value is computed, in [`Cell::value`].
    pub fn set(text: &str) -> Result<Cell, FormulaException> {
        if text.is_empty() {
            return Ok(Cell::Empty);
        }
        if text.len() > 1 && !text.starts_with('\'') {
            if let Some(source) = text.strip_prefix('=') {
                let ast = parse_formula(source)?;
                let refs = ast.referenced_cells();
                let source = ast.print();
                return Ok(Cell::Formula { source, ast, refs });
            }
        }
        Ok(Cell::Text(text.to_string()))
    }

    /// The text that would reproduce this cell if fed back through [`Cell::set`].
    /// For a `Text` cell this is always exactly the stored string, apostrophe and all.
    pub fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Formula { source, .. } => format!("={source}"),
        }
    }

    pub fn value(&self, lookup: &dyn CellLookup) -> Value {
        match self {
            Cell::Empty => Value::Text(String::new()),
            Cell::Text(s) => Value::Text(s.strip_prefix('\'').unwrap_or(s).to_string()),
            Cell::Formula { ast, .. } => ast.evaluate(lookup),
        }
    }

    pub fn referenced_cells(&self) -> &[Position] {
        match self {
            Cell::Formula { refs, .. } => refs,
            Cell::Empty | Cell::Text(_) => &[],
        }
    }
}
