mod error;
mod grammar;

pub use error::ParseError;

use crate::Expr;

/// Parse a single boolean expression in the built-in expression language.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not a complete, valid expression.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    use winnow::Parser;
    grammar::expression
        .parse(input)
        .map_err(|e| ParseError::new(e.to_string()))
}
