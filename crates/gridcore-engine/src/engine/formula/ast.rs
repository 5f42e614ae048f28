//! The parsed formula expression tree: evaluation, canonical printing, and reference extraction.

use std::collections::HashSet;

use crate::engine::{CellLookup, FormulaError, Position, Value, format_number};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div => 2,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }

    /// Left-associative and not commutative: `a op (b op c) != (a op b) op c`, so the
    /// right operand needs parens whenever it has the same precedence as this operator.
    fn is_non_commutative(self) -> bool {
        matches!(self, BinOp::Sub | BinOp::Div)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Ast {
    Number(f64),
    Ref(Position),
    Neg(Box<Ast>),
    Pos(Box<Ast>),
    BinOp(BinOp, Box<Ast>, Box<Ast>),
}

impl Ast {
    /// Evaluate against a value source, propagating errors left-to-right (the first
    /// operand observed to be an error wins; see the engine's propagation policy).
    pub fn evaluate(&self, lookup: &dyn CellLookup) -> Value {
        match self {
            Ast::Number(n) => Value::Number(*n),
            Ast::Ref(pos) => Self::evaluate_ref(*pos, lookup),
            Ast::Neg(inner) => Self::apply_unary(inner.evaluate(lookup), |n| -n),
            Ast::Pos(inner) => Self::apply_unary(inner.evaluate(lookup), |n| n),
            Ast::BinOp(op, lhs, rhs) => Self::evaluate_binop(*op, lhs, rhs, lookup),
        }
    }

    fn evaluate_ref(pos: Position, lookup: &dyn CellLookup) -> Value {
        if !pos.is_valid() {
            return Value::Error(FormulaError::Ref);
        }
        match lookup.lookup(pos) {
            Value::Number(n) => Value::Number(n),
            Value::Error(e) => Value::Error(e),
            Value::Text(s) if s.is_empty() => Value::Number(0.0),
            // The entire text must parse as a number; incidental whitespace (e.g. " 7 ")
            // is not tolerated and falls through to `#VALUE!` like any other non-numeric text.
            Value::Text(s) => match s.parse::<f64>() {
                Ok(n) if n.is_finite() => Value::Number(n),
                Ok(_) => Value::Error(FormulaError::Arithmetic),
                Err(_) => Value::Error(FormulaError::Value),
            },
        }
    }

    fn apply_unary(operand: Value, f: impl Fn(f64) -> f64) -> Value {
        match operand {
            Value::Number(n) => finite_or_arithmetic_error(f(n)),
            Value::Error(e) => Value::Error(e),
            Value::Text(_) => unreachable!("evaluate never yields Text"),
        }
    }

    fn evaluate_binop(op: BinOp, lhs: &Ast, rhs: &Ast, lookup: &dyn CellLookup) -> Value {
        let left = lhs.evaluate(lookup);
        if let Value::Error(e) = left {
            return Value::Error(e);
        }
        let right = rhs.evaluate(lookup);
        if let Value::Error(e) = right {
            return Value::Error(e);
        }
        let (Value::Number(a), Value::Number(b)) = (left, right) else {
            unreachable!("non-error operands evaluate to numbers")
        };
        if op == BinOp::Div && b == 0.0 {
            return Value::Error(FormulaError::Arithmetic);
        }
        let result = match op {
            BinOp::Add => a + b,
            BinOp::Sub => a - b,
            BinOp::Mul => a * b,
            BinOp::Div => a / b,
        };
        finite_or_arithmetic_error(result)
    }

    /// Deduplicated, first-occurrence-order list of cell references in this tree.
    pub fn referenced_cells(&self) -> Vec<Position> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.collect_refs(&mut out, &mut seen);
        out
    }

    fn collect_refs(&self, out: &mut Vec<Position>, seen: &mut HashSet<Position>) {
        match self {
            Ast::Number(_) => {}
            Ast::Ref(pos) => {
                if seen.insert(*pos) {
                    out.push(*pos);
                }
            }
            Ast::Neg(inner) | Ast::Pos(inner) => inner.collect_refs(out, seen),
            Ast::BinOp(_, lhs, rhs) => {
                lhs.collect_refs(out, seen);
                rhs.collect_refs(out, seen);
            }
        }
    }

    /// The canonical printed form: parentheses appear only where needed to preserve
    /// precedence and left-associativity, never because the original source had them.
    pub fn print(&self) -> String {
        self.render(0)
    }

    fn own_precedence(&self) -> u8 {
        match self {
            Ast::Number(_) | Ast::Ref(_) | Ast::Neg(_) | Ast::Pos(_) => u8::MAX,
            Ast::BinOp(op, _, _) => op.precedence(),
        }
    }

    fn render(&self, min_prec: u8) -> String {
        let text = match self {
            Ast::Number(n) => format_number(*n),
            Ast::Ref(pos) => pos.format(),
            Ast::Neg(inner) => format!("-{}", Self::render_unary_operand(inner)),
            Ast::Pos(inner) => format!("+{}", Self::render_unary_operand(inner)),
            Ast::BinOp(op, lhs, rhs) => {
                let prec = op.precedence();
                let right_min = if op.is_non_commutative() { prec + 1 } else { prec };
                format!("{} {} {}", lhs.render(prec), op.symbol(), rhs.render(right_min))
            }
        };
        if self.own_precedence() < min_prec { format!("({text})") } else { text }
    }

    /// A factor's unary operand may only ever be another factor; a binary
    /// expression reaching this position always came from explicit parens.
    fn render_unary_operand(inner: &Ast) -> String {
        match inner {
            Ast::BinOp(..) => format!("({})", inner.render(0)),
            _ => inner.render(u8::MAX),
        }
    }
}

fn finite_or_arithmetic_error(n: f64) -> Value {
    if n.is_finite() { Value::Number(n) } else { Value::Error(FormulaError::Arithmetic) }
}
