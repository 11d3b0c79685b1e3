use thiserror::Error;

use crate::parse::ParseError;
use crate::{CompileError, EvalError};

/// Unified error type covering parsing, table construction, evaluation and
/// definition loading.
///
/// Returned by convenience methods like
/// [`DecisionTable::from_yaml()`](crate::DecisionTable::from_yaml) and
/// [`DecisionTable::from_file()`](crate::DecisionTable::from_file).
#[derive(Debug, Error)]
pub enum ArbiterError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("invalid table definition: {0}")]
    Definition(#[from] serde_yaml::Error),
}
