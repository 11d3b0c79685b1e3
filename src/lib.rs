//! Ordered decision tables over pluggable boolean expressions.
//!
//! A [`DecisionTable`] holds rules in precedence order. Each rule pairs a
//! boolean expression with an outcome; [`DecisionTable::evaluate()`] runs the
//! rules against a [`Context`] and reports which ones fired and which outcome
//! won. Expressions are compiled once, when the table is built, by an
//! [`ExpressionEvaluator`]; [`BuiltinEvaluator`] is used unless another is
//! supplied.

mod compile;
mod error;
mod evaluate;
pub mod expression;
pub mod parse;
mod types;

pub use error::ArbiterError;
pub use evaluate::RND_VARIABLE;
pub use expression::{
    Bindings, BuiltinEvaluator, CompiledExpression, ExprError, ExpressionEvaluator,
};
pub use parse::ParseError;
pub use types::{
    lit, roll, var, ArithOp, CompareOp, CompileError, Context, DecisionTable,
    DecisionTableBuilder, EvalError, Expr, ResultSet, Rule, RuleBuilder, ScoreTable,
    TableDefinition, Value, RND_RANGE,
};
