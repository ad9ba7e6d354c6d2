//! Chain resolution: rather than encoding precedence into
//! the grammar, the parser collects a flat `Chain` of operators at parse
//! time and a dedicated pass here folds it into a proper `Expr::Binary`
//! tree. This keeps the parser itself precedence-agnostic and lets
//! non-associative operators (comparisons) reject illegal chaining
//! (`a < b < c`) with a clear `ChainError` instead of silently picking an
//! associativity.

use crate::ast::{self, BinOp, Expr, Node, Span};
use crate::error::ChainError;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assoc {
    Left,
    NonAssoc,
}

/// Binding power and associativity for each chainable operator, lowest
/// precedence first. Operators at the same tier bind equally tightly.
const TIERS: &[(&[&str], Assoc)] = &[
    (&["||"], Assoc::Left),
    (&["&&"], Assoc::Left),
    (&["==", "!=", "<", ">", "<=", ">="], Assoc::NonAssoc),
    (&["+", "-"], Assoc::Left),
    (&["*", "/", "%"], Assoc::Left),
];

fn tier_of(op: &str) -> usize {
    TIERS.iter().position(|(ops, _)| ops.contains(&op)).expect("unknown chain operator")
}

fn to_binop(op: &str) -> BinOp {
    match op {
        "+" => BinOp::Add,
        "-" => BinOp::Sub,
        "*" => BinOp::Mul,
        "/" => BinOp::Div,
        "%" => BinOp::Mod,
        "&&" => BinOp::And,
        "||" => BinOp::Or,
        "<" => BinOp::Lt,
        ">" => BinOp::Gt,
        "<=" => BinOp::Lte,
        ">=" => BinOp::Gte,
        "==" => BinOp::Eq,
        "!=" => BinOp::Neq,
        _ => unreachable!("unknown chain operator {op:?}"),
    }
}

/// Resolve a flat chain into a precedence-correct binary tree, rejecting
/// illegal non-associative chaining < c`).
pub fn resolve_chain(chain: &ast::Chain) -> Result<Node<Expr>, ChainError> {
    let mut operands: Vec<Node<Expr>> = vec![chain.first.clone()];
    let mut operators: Vec<(&str, Span)> = Vec::new();
    for (op, span, rhs) in &chain.rest {
        operators.push((op.as_str(), *span));
        operands.push(rhs.clone());
    }
    reject_illegal_nonassoc_chaining(&operators)?;
    fold_by_precedence(operands, operators)
}

/// Two same-tier non-associative operators are illegal not just when they
/// sit raw-adjacent in the chain, but whenever everything *between* them
/// binds tighter: `fold_by_precedence` always reduces the globally
/// tightest-binding tier first, so any run of strictly-higher-tier
/// operators between two same-tier entries collapses into a single operand
/// before either of them is touched, leaving them adjacent at fold time
/// (`a < b + c < d` folds `+` first, then directly nests the two `<`s).
/// An operator of lower-or-equal tier between them, by contrast, survives
/// untouched until later and keeps them apart (`a < b && c < d` is fine).
/// So for each non-assoc tier, filter out only the strictly-tighter
/// entries and look for two same-tier operators landing next to each other
/// in what remains.
fn reject_illegal_nonassoc_chaining(operators: &[(&str, Span)]) -> Result<(), ChainError> {
    for (tier, (_, assoc)) in TIERS.iter().enumerate() {
        if *assoc != Assoc::NonAssoc {
            continue;
        }
        let surviving: Vec<(usize, &str, Span)> = operators
            .iter()
            .enumerate()
            .filter(|(_, (op, _))| tier_of(op) <= tier)
            .map(|(i, (op, span))| (i, *op, *span))
            .collect();
        for window in surviving.windows(2) {
            let (_, a, a_span) = window[0];
            let (b_index, b, _) = window[1];
            if tier_of(a) == tier && tier_of(b) == tier {
                return Err(ChainError {
                    operator_index: b_index,
                    pos: crate::error::Position { line: a_span.line, col: a_span.col },
                    reason: format!("comparison operators do not chain: `{a}` followed by `{b}`"),
                });
            }
        }
    }
    Ok(())
}

/// Classic operator-precedence parsing over the flattened operand/operator
/// lists: repeatedly find the tightest-binding operator, reduce its two
/// neighboring operands, and splice the result back in.
fn fold_by_precedence(mut operands: Vec<Node<Expr>>, mut operators: Vec<(&str, Span)>) -> Result<Node<Expr>, ChainError> {
    while !operators.is_empty() {
        // Among operators at the tightest-binding tier present, fold the
        // leftmost first so same-tier (left-associative) chains reduce
        // left-to-right, e.g. `10 - 3 - 2` as `(10 - 3) - 2`.
        let max_tier = operators.iter().map(|(op, _)| tier_of(op)).max().expect("non-empty operators");
        let tightest = operators.iter().position(|(op, _)| tier_of(op) == max_tier).expect("max tier present");
        let (op, span) = operators.remove(tightest);
        let lhs = operands.remove(tightest);
        let rhs = operands.remove(tightest);
        let node = Rc::new(Expr::Binary(to_binop(op), lhs, rhs, span, ast::TypeSlot::new()));
        operands.insert(tightest, node);
    }
    Ok(operands.into_iter().next().expect("at least one operand"))
}
