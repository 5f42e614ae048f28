//! Circular dependency detection over a cell's formula graph.
//!
//! When a formula is entered, the sheet must verify it would not create a cycle
//! (e.g. A1 references B1, B1 references C1, C1 references A1) before accepting it.
//! This walks the dependency graph depth-first, keeping the recursion stack separate
//! from the set of already-fully-explored nodes so a diamond-shaped dependency graph
//! (B and C both depending on D) is never mistaken for a cycle.

use std::collections::HashMap;
use std::collections::HashSet;

use super::Position;

/// Stateless cycle checker over an explicit `dependency -> depends-on` map.
pub struct CycleDetector;

impl CycleDetector {
    /// True if adding `start` with dependency edges from `deps` would create a cycle
    /// reachable from `start`. `deps` must reflect the graph as it would be *after*
    /// the candidate edges are added.
    pub fn would_cycle(start: Position, deps: &HashMap<Position, Vec<Position>>) -> bool {
        let mut visited = HashSet::new();
        let mut on_stack = HashSet::new();
        Self::visit(start, deps, &mut visited, &mut on_stack)
    }

    fn visit(
        current: Position,
        deps: &HashMap<Position, Vec<Position>>,
        visited: &mut HashSet<Position>,
        on_stack: &mut HashSet<Position>,
    ) -> bool {
        if on_stack.contains(&current) {
            return true;
        }
        if visited.contains(&current) {
            return false;
        }

        on_stack.insert(current);
        let found = deps
            .get(&current)
            .map(|neighbors| neighbors.iter().any(|&next| Self::visit(next, deps, visited, on_stack)))
            .unwrap_or(false);
        on_stack.remove(&current);
        visited.insert(current);

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(col: usize, row: usize) -> Position {
        Position::new(col, row)
    }

    #[test]
    fn no_edges_means_no_cycle() {
        let deps = HashMap::new();
        assert!(!CycleDetector::would_cycle(pos(0, 0), &deps));
    }

    #[test]
    fn direct_self_reference_is_a_cycle() {
        let mut deps = HashMap::new();
        deps.insert(pos(0, 0), vec![pos(0, 0)]);
        assert!(CycleDetector::would_cycle(pos(0, 0), &deps));
    }

    #[test]
    fn indirect_chain_back_to_start_is_a_cycle() {
        let mut deps = HashMap::new();
        deps.insert(pos(0, 0), vec![pos(1, 0)]);
        deps.insert(pos(1, 0), vec![pos(2, 0)]);
        deps.insert(pos(2, 0), vec![pos(0, 0)]);
        assert!(CycleDetector::would_cycle(pos(0, 0), &deps));
    }

    #[test]
    fn diamond_shaped_graph_is_not_a_cycle() {
        let mut deps = HashMap::new();
        deps.insert(pos(0, 0), vec![pos(1, 0), pos(2, 0)]);
        deps.insert(pos(1, 0), vec![pos(3, 0)]);
        deps.insert(pos(2, 0), vec![pos(3, 0)]);
        assert!(!CycleDetector::would_cycle(pos(0, 0), &deps));
    }

    #[test]
    fn cycle_elsewhere_in_the_graph_does_not_affect_an_unrelated_start() {
        let mut deps = HashMap::new();
        deps.insert(pos(1, 0), vec![pos(2, 0)]);
        deps.insert(pos(2, 0), vec![pos(1, 0)]);
        deps.insert(pos(0, 0), vec![pos(3, 0)]);
        assert!(!CycleDetector::would_cycle(pos(0, 0), &deps));
    }
}
