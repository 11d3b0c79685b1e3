//! The expression-evaluation seam.
//!
//! A [`DecisionTable`](crate::DecisionTable) never interprets rule expressions
//! itself. It hands each expression string to an [`ExpressionEvaluator`] once,
//! when the table is built, and keeps the returned [`CompiledExpression`] for
//! every later evaluation. Parsing and evaluation are separate steps with
//! separate error types: [`ParseError`] rejects a table at construction,
//! [`ExprError`] fails a single evaluation.
//!
//! [`BuiltinEvaluator`] is the evaluator used unless another one is supplied.

mod builtin;

use std::fmt;

use thiserror::Error;

use crate::parse::ParseError;
use crate::Value;

pub use builtin::BuiltinEvaluator;

/// Read-only variable lookup used while evaluating an expression.
pub trait Bindings {
    /// Look up a variable by name. Returns `None` when it is unbound.
    fn lookup(&self, name: &str) -> Option<&Value>;
}

/// Parses expression source text into an evaluable form.
pub trait ExpressionEvaluator: Send + Sync + fmt::Debug {
    /// Compile `source` into an expression that can be evaluated repeatedly.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if `source` is not valid in this evaluator's grammar.
    fn compile(&self, source: &str) -> Result<Box<dyn CompiledExpression>, ParseError>;
}

/// An expression that has already been parsed and validated.
pub trait CompiledExpression: Send + Sync + fmt::Debug {
    /// Evaluate against the given bindings.
    ///
    /// # Errors
    ///
    /// Returns [`ExprError`] when evaluation fails at runtime.
    fn evaluate(&self, bindings: &dyn Bindings) -> Result<Value, ExprError>;
}

/// Runtime failures while evaluating a compiled expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("unbound variable '{name}'")]
    UnboundVariable { name: String },

    #[error("type mismatch: cannot apply '{op}' to {left} and {right}")]
    TypeMismatch {
        op: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("'{op}' expects a {expected} operand, found {found}")]
    InvalidOperand {
        op: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in '{op}'")]
    Overflow { op: String },

    /// Escape hatch for evaluators that do not fit the variants above.
    #[error("{0}")]
    Custom(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_variable_message() {
        let err = ExprError::UnboundVariable { name: "age".into() };
        assert_eq!(err.to_string(), "unbound variable 'age'");
    }

    #[test]
    fn type_mismatch_message() {
        let err = ExprError::TypeMismatch {
            op: "<".into(),
            left: "string",
            right: "int",
        };
        assert_eq!(
            err.to_string(),
            "type mismatch: cannot apply '<' to string and int"
        );
    }

    #[test]
    fn invalid_operand_message() {
        let err = ExprError::InvalidOperand {
            op: "AND".into(),
            expected: "boolean",
            found: "int",
        };
        assert_eq!(err.to_string(), "'AND' expects a boolean operand, found int");
    }

    #[test]
    fn custom_message() {
        let err = ExprError::Custom("lookup service unavailable".into());
        assert_eq!(err.to_string(), "lookup service unavailable");
    }
}
