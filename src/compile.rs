use std::sync::Arc;

use crate::expression::{CompiledExpression, ExpressionEvaluator};
use crate::{CompileError, Rule};

/// Compile every rule expression, in table order, failing on the first
/// empty or unparseable one.
pub(crate) fn compile(
    evaluator: &dyn ExpressionEvaluator,
    rules: &[Rule],
) -> Result<Vec<Arc<dyn CompiledExpression>>, CompileError> {
    rules
        .iter()
        .enumerate()
        .map(|(index, rule)| compile_rule(evaluator, index, rule))
        .collect()
}

fn compile_rule(
    evaluator: &dyn ExpressionEvaluator,
    index: usize,
    rule: &Rule,
) -> Result<Arc<dyn CompiledExpression>, CompileError> {
    if rule.expression.trim().is_empty() {
        return Err(CompileError::EmptyExpression {
            index,
            title: rule.title.clone(),
        });
    }
    evaluator
        .compile(&rule.expression)
        .map(Arc::from)
        .map_err(|source| CompileError::InvalidExpression {
            index,
            title: rule.title.clone(),
            expression: rule.expression.clone(),
            source,
        })
}
