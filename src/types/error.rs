use thiserror::Error;

use super::Value;
use crate::expression::ExprError;
use crate::parse::ParseError;

/// Errors raised while building a [`DecisionTable`](super::DecisionTable).
///
/// Every rule expression is compiled up front, so a malformed rule is
/// rejected here instead of surfacing on the first evaluation.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("rule {index} ('{title}') has an empty expression")]
    EmptyExpression { index: usize, title: String },

    #[error("invalid expression '{expression}' in rule {index} ('{title}'): {source}")]
    InvalidExpression {
        index: usize,
        title: String,
        expression: String,
        source: ParseError,
    },
}

/// Errors raised by [`DecisionTable::evaluate()`](super::DecisionTable::evaluate).
///
/// Any of these aborts the evaluation; no partial result is produced.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("rule {index} ('{title}') failed to evaluate: {source}")]
    Runtime {
        index: usize,
        title: String,
        source: ExprError,
    },

    #[error("rule {index} ('{title}') produced {found}, expected a boolean")]
    NotBoolean {
        index: usize,
        title: String,
        found: Value,
    },
}

impl CompileError {
    /// Position of the offending rule in the table.
    #[must_use]
    pub fn rule_index(&self) -> usize {
        match self {
            CompileError::EmptyExpression { index, .. }
            | CompileError::InvalidExpression { index, .. } => *index,
        }
    }
}

impl EvalError {
    /// Position of the rule whose evaluation failed.
    #[must_use]
    pub fn rule_index(&self) -> usize {
        match self {
            EvalError::Runtime { index, .. } | EvalError::NotBoolean { index, .. } => *index,
        }
    }

    /// Title of the rule whose evaluation failed.
    #[must_use]
    pub fn rule_title(&self) -> &str {
        match self {
            EvalError::Runtime { title, .. } | EvalError::NotBoolean { title, .. } => title,
        }
    }
}
