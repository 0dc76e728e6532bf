use crate::automata::{StateId, Symbol};
use thiserror::Error;

/// Failures of the infix to postfix rewrite.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PostfixError {
    #[error("unmatched ')' at position {position}")]
    UnmatchedClose { position: usize },
    #[error("unmatched '(' in expression")]
    UnmatchedOpen,
    #[error("invalid character `{character}` at position {position}")]
    InvalidCharacter { character: char, position: usize },
}

/// Failures of the postfix evaluator. Postfix produced by
/// [`to_postfix`](crate::to_postfix) never triggers these except for an empty
/// expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("expression is empty")]
    EmptyExpression,
    #[error("operator `{operator}` at position {position} is missing an operand")]
    MissingOperand { operator: char, position: usize },
    #[error("unexpected character `{character}` at position {position} in postfix expression")]
    UnexpectedCharacter { character: char, position: usize },
    #[error("{count} operands left without an operator")]
    DanglingOperands { count: usize },
}

/// The first invariant an automaton violates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    #[error("invalid initial state {0}")]
    InvalidInitialState(StateId),
    #[error("invalid accepting state {0}")]
    InvalidAcceptingState(StateId),
    #[error("invalid transition source {0}")]
    InvalidTransitionSource(StateId),
    #[error("invalid transition destination {0}")]
    InvalidTransitionDestination(StateId),
    #[error("invalid transition symbol {symbol} leaving {state}")]
    InvalidTransitionSymbol { state: StateId, symbol: Symbol },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Postfix(#[from] PostfixError),
    #[error(transparent)]
    Build(#[from] BuildError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("malformed automaton report: {0}")]
    Malformed(String),
}
