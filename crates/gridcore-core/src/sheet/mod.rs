//! The sheet: sparse cell storage, a dependency graph, and a kept-fresh value cache.

use std::collections::{HashMap, HashSet, VecDeque};
use std::io::{self, Write};

use gridcore_engine::{Cell, CellLookup, CycleDetector, FormulaError, Position, Value, format_number};

use crate::error::{Result, SheetError};

/// A sparse two-dimensional grid of [`Cell`]s with dependency tracking between formula
/// cells and an eagerly-maintained cache of their evaluated values.
///
/// `deps` holds each formula cell's direct forward edges (what it reads); `dependents`
/// is the derived reverse index (who reads it), rebuilt whenever `deps` changes. Keeping
/// both lets `SetCell`/`ClearCell` walk forward to detect cycles and backward to know
/// which cached values need refreshing.
#[derive(Default)]
pub struct Sheet {
    data: HashMap<Position, Cell>,
    cache: HashMap<Position, Value>,
    deps: HashMap<Position, Vec<Position>>,
    dependents: HashMap<Position, HashSet<Position>>,
    height: usize,
    width: usize,
}

impl Sheet {
    pub fn new() -> Sheet {
        Sheet::default()
    }

    /// Parse `text` into a cell at `pos` and install it. Fails with no state change if
    /// `pos` is out of range, if `text` is malformed formula source, or if the new
    /// dependency edges would close a cycle.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        self.require_valid(pos)?;

        let existed = self.data.contains_key(&pos);
        let old_text = self.data.get(&pos).map(Cell::text).unwrap_or_default();
        let old_deps = self.deps.get(&pos).cloned();

        let new_cell = Cell::set(text)?;
        self.install(pos, new_cell);

        if CycleDetector::would_cycle(pos, &self.deps) {
            tracing::debug!(%pos, "rejecting edit that would close a dependency cycle");
            if existed {
                let restored = Cell::set(&old_text).expect("previously accepted text re-parses");
                self.install(pos, restored);
            } else {
                self.data.remove(&pos);
                self.set_deps(pos, old_deps);
                self.rebuild_dependents();
            }
            return Err(SheetError::CircularDependency);
        }

        self.height = self.height.max(pos.row + 1);
        self.width = self.width.max(pos.col + 1);
        self.propagate_from(pos);
        Ok(())
    }

    fn install(&mut self, pos: Position, cell: Cell) {
        let refs = cell.referenced_cells().to_vec();
        self.data.insert(pos, cell);
        self.set_deps(pos, if refs.is_empty() { None } else { Some(refs) });
        self.rebuild_dependents();
    }

    fn set_deps(&mut self, pos: Position, deps: Option<Vec<Position>>) {
        match deps {
            Some(deps) => {
                self.deps.insert(pos, deps);
            }
            None => {
                self.deps.remove(&pos);
            }
        }
    }

    pub fn get_cell(&self, pos: Position) -> Result<Option<&Cell>> {
        self.require_valid(pos)?;
        Ok(self.data.get(&pos))
    }

    /// Alias kept for parity with the public interface's naming; identical to [`Sheet::get_cell`].
    pub fn get_concrete_cell(&self, pos: Position) -> Result<Option<&Cell>> {
        self.get_cell(pos)
    }

    /// Current value at `pos`, evaluating through the cell's formula if needed.
    pub fn get_value(&self, pos: Position) -> Result<Value> {
        self.require_valid(pos)?;
        Ok(match self.data.get(&pos) {
            Some(cell) => cell.value(self),
            None => Value::Text(String::new()),
        })
    }

    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        self.require_valid(pos)?;
        if self.data.remove(&pos).is_some() {
            self.cache.remove(&pos);
            self.deps.remove(&pos);
            self.rebuild_dependents();
            self.recompute_extents();
            self.propagate_from(pos);
        }
        Ok(())
    }

    pub fn get_printable_size(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn get_cached_value(&self, pos: Position) -> Result<Value> {
        self.require_valid(pos)?;
        Ok(self.cache.get(&pos).cloned().unwrap_or_else(|| Value::Text(String::new())))
    }

    pub fn get_referenced_positions(&self, pos: Position) -> Result<Vec<Position>> {
        self.require_valid(pos)?;
        Ok(self.deps.get(&pos).cloned().unwrap_or_default())
    }

    /// Emit evaluated values row-major over the printable rectangle, tab-separated,
    /// one row per line. Trailing columns with no cell still contribute an empty field.
    pub fn print_values<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_rows(out, |cell, sheet| display_value(&cell.value(sheet)))
    }

    /// Same traversal as [`Sheet::print_values`] but emits each cell's source text.
    pub fn print_texts<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_rows(out, |cell, _sheet| cell.text())
    }

    fn print_rows<W: Write>(
        &self,
        out: &mut W,
        render: impl Fn(&Cell, &Sheet) -> String,
    ) -> io::Result<()> {
        for row in 0..self.height {
            for col in 0..self.width {
                if col > 0 {
                    write!(out, "\t")?;
                }
                let field = match self.data.get(&Position::new(col, row)) {
                    Some(cell) => render(cell, self),
                    None => String::new(),
                };
                write!(out, "{field}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn require_valid(&self, pos: Position) -> Result<()> {
        if pos.is_valid() { Ok(()) } else { Err(SheetError::InvalidPosition(pos.format())) }
    }

    fn rebuild_dependents(&mut self) {
        self.dependents.clear();
        for (&src, targets) in &self.deps {
            for &target in targets {
                self.dependents.entry(target).or_default().insert(src);
            }
        }
    }

    fn recompute_extents(&mut self) {
        let mut height = 0;
        let mut width = 0;
        for pos in self.data.keys() {
            height = height.max(pos.row + 1);
            width = width.max(pos.col + 1);
        }
        self.height = height;
        self.width = width;
    }

    /// Recompute `start`'s cached value and everything transitively downstream of it,
    /// so `cache` always reflects the current graph rather than just the last write.
    ///
    /// A plain BFS over `dependents` is not enough: two dependents can be reachable
    /// from `start` by paths of different length (e.g. `C1 = A1 + B1` where
    /// `B1 = D1` and `D1 = A1`), and a node reached by the short path must not be
    /// recomputed until every dependency reached by a longer path has settled first.
    /// So this processes the affected subgraph in topological order — each node only
    /// once every one of its own affected dependencies has already been refreshed —
    /// via Kahn's algorithm keyed on in-degree within that subgraph.
    fn propagate_from(&mut self, start: Position) {
        let mut affected = HashSet::from([start]);
        let mut stack = vec![start];
        while let Some(pos) = stack.pop() {
            if let Some(dependents) = self.dependents.get(&pos) {
                for &next in dependents {
                    if affected.insert(next) {
                        stack.push(next);
                    }
                }
            }
        }

        let mut indegree: HashMap<Position, usize> = affected
            .iter()
            .map(|&pos| {
                let count = self
                    .deps
                    .get(&pos)
                    .map(|deps| deps.iter().filter(|d| affected.contains(d)).count())
                    .unwrap_or(0);
                (pos, count)
            })
            .collect();

        let mut queue: VecDeque<Position> =
            indegree.iter().filter(|&(_, &count)| count == 0).map(|(&pos, _)| pos).collect();

        while let Some(pos) = queue.pop_front() {
            let value = match self.data.get(&pos) {
                Some(cell) => cell.clone().value(self),
                None => Value::Text(String::new()),
            };
            self.cache.insert(pos, value);

            if let Some(dependents) = self.dependents.get(&pos) {
                for &next in dependents {
                    if let Some(count) = indegree.get_mut(&next) {
                        *count -= 1;
                        if *count == 0 {
                            queue.push_back(next);
                        }
                    }
                }
            }
        }
    }
}

impl CellLookup for Sheet {
    fn lookup(&self, pos: Position) -> Value {
        if !pos.is_valid() {
            return Value::Error(FormulaError::Ref);
        }
        self.cache.get(&pos).cloned().unwrap_or_else(|| Value::Text(String::new()))
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Text(s) => s.clone(),
        Value::Number(n) => format_number(*n),
        Value::Error(e) => e.literal().to_string(),
    }
}
