//! Error kinds shared across the front end and the algebra.
//!
//! The parser, loader, and type inference *collect* errors and keep going
//! rather than failing on the first one. Runtime algebraic operations
//! never construct one of these for domain-valid input; they signal
//! degenerate cases with empty distributions instead.

use std::fmt;

/// A source position. Column is 1-based, line is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("{pos}: unexpected token {found:?}, expected one of {expected:?}")]
    UnexpectedToken {
        pos: Position,
        found: String,
        expected: Vec<String>,
    },
    #[error("{pos}: unterminated string literal")]
    UnterminatedString { pos: Position },
    #[error("{pos}: invalid number literal {text:?}")]
    InvalidNumber { pos: Position, text: String },
    #[error("{pos}: unexpected end of input")]
    UnexpectedEof { pos: Position },
    #[error("{pos}: unexpected character {found:?}")]
    UnexpectedChar { pos: Position, found: char },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("chain error at operator #{operator_index} (approx {pos}): {reason}")]
pub struct ChainError {
    pub operator_index: usize,
    pub pos: Position,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("cannot resolve import {import:?} from {importer:?}: {reason}")]
    NotFound {
        importer: String,
        import: String,
        reason: String,
    },
    #[error("cyclic import: {}", chain.join(" -> "))]
    Cycle { chain: Vec<String> },
    #[error("import depth exceeded maximum of {max_depth} while loading {path:?}")]
    DepthExceeded { path: String, max_depth: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("{pos}: {name:?} is already defined in this scope")]
    Redeclaration { pos: Position, name: String },
    #[error("{pos}: imported alias {name:?} collides with an existing binding")]
    AliasCollision { pos: Position, name: String },
    #[error("{pos}: unresolved identifier {name:?}")]
    Unresolved { pos: Position, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("{pos}: type mismatch, expected {expected}, found {found}")]
    Mismatch {
        pos: Position,
        expected: String,
        found: String,
    },
    #[error("{pos}: expected {expected} arguments, found {found}")]
    Arity {
        pos: Position,
        expected: usize,
        found: usize,
    },
    #[error("{pos}: no member {member:?} on {receiver}")]
    BadMember {
        pos: Position,
        receiver: String,
        member: String,
    },
    #[error("{pos}: {ty} is not indexable")]
    NotIndexable { pos: Position, ty: String },
    #[error("{pos}: unresolved type {name:?}")]
    UnresolvedType { pos: Position, name: String },
    #[error("{pos}: parameter {name:?} needs a declared type, a default value, or both")]
    UnderspecifiedParameter { pos: Position, name: String },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("queue is unstable (utilisation >= 1)")]
    UnstableQueue,
    #[error("invalid probability {0} after composition")]
    InvalidProbability(f64),
    #[error("negative weight {0}")]
    NegativeWeight(f64),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal invariant violated: {0}")]
pub struct InternalInvariant(pub String);

/// An accumulator used by stages that collect rather than fail fast.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics<E> {
    pub errors: Vec<E>,
}

impl<E> Diagnostics<E> {
    pub fn new() -> Self {
        Diagnostics { errors: Vec::new() }
    }

    pub fn push(&mut self, e: E) {
        self.errors.push(e);
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn extend(&mut self, other: Diagnostics<E>) {
        self.errors.extend(other.errors);
    }
}
