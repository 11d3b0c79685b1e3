use std::sync::Arc;

use tracing::trace;

use crate::expression::{Bindings, CompiledExpression};
use crate::{EvalError, ResultSet, Rule, Value};

/// Name under which the table's random roll is visible to expressions.
pub const RND_VARIABLE: &str = "rnd";

/// Bindings seen by rule expressions: the table's `rnd` layered over the
/// caller's input. The input itself is never modified.
pub(crate) struct Scope<'a, B: ?Sized> {
    rnd: Value,
    input: &'a B,
}

impl<'a, B: Bindings + ?Sized> Scope<'a, B> {
    pub(crate) fn new(rnd: i32, input: &'a B) -> Self {
        Self {
            rnd: Value::from(rnd),
            input,
        }
    }
}

impl<B: Bindings + ?Sized> Bindings for Scope<'_, B> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        if name == RND_VARIABLE {
            Some(&self.rnd)
        } else {
            self.input.lookup(name)
        }
    }
}

/// Run the rules in order against `scope`.
///
/// Every rule gets an entry in the result; rules after the first match are
/// not evaluated when `break_on_match` is set. Later matches overwrite the
/// final decision otherwise.
pub(crate) fn evaluate(
    rules: &[Rule],
    compiled: &[Arc<dyn CompiledExpression>],
    break_on_match: bool,
    scope: &dyn Bindings,
) -> Result<ResultSet, EvalError> {
    let mut results = Vec::with_capacity(rules.len());
    let mut final_decision = None;
    let mut finished = false;

    for (index, (rule, expr)) in rules.iter().zip(compiled).enumerate() {
        results.push(rule.unfired());

        if finished {
            trace!(index, title = %rule.title, "skipped after earlier match");
            continue;
        }

        let value = expr
            .evaluate(scope)
            .map_err(|source| EvalError::Runtime {
                index,
                title: rule.title.clone(),
                source,
            })?;
        let result = value.as_bool().ok_or_else(|| EvalError::NotBoolean {
            index,
            title: rule.title.clone(),
            found: value.clone(),
        })?;

        let matched = rule.matches(result);
        trace!(index, title = %rule.title, result, matched, "rule evaluated");

        if matched {
            final_decision.clone_from(&rule.outcome);
            results[index].outcome.clone_from(&rule.outcome);
            if break_on_match {
                finished = true;
            }
        }
    }

    Ok(ResultSet::new(results, final_decision))
}
