mod context;
mod definition;
mod error;
mod expr;
mod result_set;
mod rule;
mod score_table;
mod table;
mod value;

pub use context::Context;
pub use definition::TableDefinition;
pub use error::{CompileError, EvalError};
pub use expr::{lit, var, ArithOp, CompareOp, Expr};
pub use result_set::ResultSet;
pub use rule::{Rule, RuleBuilder};
pub use score_table::ScoreTable;
pub use table::{roll, DecisionTable, DecisionTableBuilder, RND_RANGE};
pub use value::Value;
