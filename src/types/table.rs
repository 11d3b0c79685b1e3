use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use super::error::{CompileError, EvalError};
use super::result_set::ResultSet;
use super::rule::{Rule, RuleBuilder};
use super::value::Value;
use crate::evaluate::Scope;
use crate::expression::{Bindings, BuiltinEvaluator, CompiledExpression, ExpressionEvaluator};

/// Range a table's `rnd` roll is drawn from by [`roll()`].
pub const RND_RANGE: Range<i32> = 0..100;

/// Draw a table roll uniformly from [`RND_RANGE`].
pub fn roll<R: Rng>(rng: &mut R) -> i32 {
    rng.random_range(RND_RANGE)
}

/// Builder for constructing a [`DecisionTable`].
///
/// # Example
///
/// ```
/// use arbiter::{Context, DecisionTableBuilder, Value};
///
/// let table = DecisionTableBuilder::new()
///     .title("eligibility")
///     .break_on_match(true)
///     .rule("Under 21", |r| r.when("age < 21").outcome("Under 21"))
///     .rule("Very Low Income", |r| r.when("income < 1").outcome("Very Low Income"))
///     .build()
///     .unwrap();
///
/// let result = table
///     .evaluate(&Context::new().set("age", 20_i64).set("income", 10_i64))
///     .unwrap();
/// assert_eq!(result.final_decision(), Some(&Value::from("Under 21")));
/// ```
#[derive(Debug)]
pub struct DecisionTableBuilder {
    title: String,
    description: String,
    break_on_match: bool,
    default_outcome: Option<Value>,
    rnd: i32,
    rules: Vec<Rule>,
    evaluator: Arc<dyn ExpressionEvaluator>,
}

impl Default for DecisionTableBuilder {
    fn default() -> Self {
        Self::with_evaluator(Arc::new(BuiltinEvaluator))
    }
}

impl DecisionTableBuilder {
    /// A builder whose rules are compiled by [`BuiltinEvaluator`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder whose rules are compiled by `evaluator`.
    #[must_use]
    pub fn with_evaluator(evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            break_on_match: false,
            default_outcome: None,
            rnd: 0,
            rules: Vec::new(),
            evaluator,
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Stop at the first matching rule instead of letting later matches win.
    #[must_use]
    pub fn break_on_match(mut self, enabled: bool) -> Self {
        self.break_on_match = enabled;
        self
    }

    /// Value that represents "no rule matched". Stored on the table; it is
    /// not substituted into [`ResultSet::final_decision()`].
    #[must_use]
    pub fn default_outcome(mut self, outcome: impl Into<Value>) -> Self {
        self.default_outcome = Some(outcome.into());
        self
    }

    /// Fix the value expressions see as `rnd`.
    #[must_use]
    pub fn rnd(mut self, rnd: i32) -> Self {
        self.rnd = rnd;
        self
    }

    /// Draw `rnd` from `rng`. See [`roll()`].
    #[must_use]
    pub fn roll<R: Rng>(mut self, rng: &mut R) -> Self {
        self.rnd = roll(rng);
        self
    }

    /// Append a rule. The closure should call `.when(expression)`; a rule
    /// without one fails [`build()`](Self::build) with
    /// [`CompileError::EmptyExpression`].
    #[must_use]
    pub fn rule(mut self, title: &str, f: impl FnOnce(RuleBuilder) -> RuleBuilder) -> Self {
        let builder = f(RuleBuilder {
            rule: Rule {
                title: title.to_owned(),
                ..Rule::default()
            },
        });
        self.rules.push(builder.rule);
        self
    }

    /// Append an already-built rule.
    #[must_use]
    pub fn push(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Compile every rule expression and produce an immutable table.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] for the first rule whose expression is empty
    /// or rejected by the evaluator.
    pub fn build(self) -> Result<DecisionTable, CompileError> {
        let compiled = crate::compile::compile(self.evaluator.as_ref(), &self.rules)?;
        debug!(
            table = %self.title,
            rules = self.rules.len(),
            break_on_match = self.break_on_match,
            rnd = self.rnd,
            "decision table built"
        );
        Ok(DecisionTable {
            title: self.title,
            description: self.description,
            break_on_match: self.break_on_match,
            default_outcome: self.default_outcome,
            rnd: self.rnd,
            rules: self.rules,
            compiled,
        })
    }
}

/// An ordered set of rules with its matching policy. Immutable once built,
/// thread-safe, and cheap to clone.
#[derive(Debug, Clone)]
pub struct DecisionTable {
    title: String,
    description: String,
    break_on_match: bool,
    default_outcome: Option<Value>,
    rnd: i32,
    rules: Vec<Rule>,
    compiled: Vec<Arc<dyn CompiledExpression>>,
}

impl DecisionTable {
    /// Evaluate the rules, in order, against `input`.
    ///
    /// Expressions see `input` plus the table's roll under
    /// [`RND_VARIABLE`](crate::RND_VARIABLE), which shadows any caller
    /// binding of the same name. `input` is not modified.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] if an evaluated expression fails or does not
    /// produce a boolean. No partial result is returned.
    pub fn evaluate<B: Bindings + ?Sized>(&self, input: &B) -> Result<ResultSet, EvalError> {
        let span = tracing::debug_span!("evaluate", table = %self.title, rnd = self.rnd);
        let _enter = span.enter();

        let scope = Scope::new(self.rnd, input);
        let result =
            crate::evaluate::evaluate(&self.rules, &self.compiled, self.break_on_match, &scope)?;

        debug!(
            matched = result.matched().count(),
            decided = result.final_decision().is_some(),
            "decision table evaluated"
        );
        Ok(result)
    }

    /// Evaluate and return the final decision, or the default outcome when
    /// no rule matched.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate()`](Self::evaluate).
    pub fn decide<B: Bindings + ?Sized>(&self, input: &B) -> Result<Option<Value>, EvalError> {
        let result = self.evaluate(input)?;
        Ok(result
            .into_final_decision()
            .or_else(|| self.default_outcome.clone()))
    }

    /// Copy of this table with a different `rnd`. Compiled rules are shared.
    #[must_use]
    pub fn with_rnd(&self, rnd: i32) -> Self {
        Self {
            rnd,
            ..self.clone()
        }
    }

    /// Copy of this table with a fresh roll drawn from `rng`.
    #[must_use]
    pub fn rerolled<R: Rng>(&self, rng: &mut R) -> Self {
        self.with_rnd(roll(rng))
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn break_on_match(&self) -> bool {
        self.break_on_match
    }

    #[must_use]
    pub fn default_outcome(&self) -> Option<&Value> {
        self.default_outcome.as_ref()
    }

    #[must_use]
    pub fn rnd(&self) -> i32 {
        self.rnd
    }

    /// The table's rules in precedence order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl fmt::Display for DecisionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DecisionTable({:?}, {} rules, {}, rnd = {})",
            self.title,
            self.rules.len(),
            if self.break_on_match {
                "break on match"
            } else {
                "last match wins"
            },
            self.rnd,
        )
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::Context;

    fn sample() -> DecisionTable {
        DecisionTableBuilder::new()
            .title("test one")
            .break_on_match(true)
            .default_outcome("default")
            .rule("Under 21", |r| r.when("age < 21").outcome("Under 21"))
            .rule("Very Low Income", |r| {
                r.when("income < 1").outcome("Very Low Income")
            })
            .build()
            .unwrap()
    }

    #[test]
    fn builder_collects_rules_and_config() {
        let table = sample();
        assert_eq!(table.title(), "test one");
        assert!(table.break_on_match());
        assert_eq!(table.default_outcome(), Some(&Value::from("default")));
        assert_eq!(table.rnd(), 0);
        assert_eq!(table.rules().len(), 2);
        assert_eq!(table.rules()[0].title, "Under 21");
        assert_eq!(table.rules()[1].expression, "income < 1");
    }

    #[test]
    fn builder_rule_without_when_returns_error() {
        let result = DecisionTableBuilder::new()
            .rule("bad_rule", |r| r.outcome("x"))
            .build();
        assert!(matches!(
            result,
            Err(CompileError::EmptyExpression { index: 0, title }) if title == "bad_rule"
        ));
    }

    #[test]
    fn builder_rejects_malformed_expression() {
        let result = DecisionTableBuilder::new()
            .rule("fine", |r| r.when("x == 1"))
            .rule("broken", |r| r.when("x ==="))
            .build();
        let err = result.unwrap_err();
        assert_eq!(err.rule_index(), 1);
        assert!(err.to_string().contains("'broken'"));
    }

    #[test]
    fn push_and_rules_append_in_order() {
        let table = DecisionTableBuilder::new()
            .push(Rule::new("a", "x == 1"))
            .rules([Rule::new("b", "x == 2"), Rule::new("c", "x == 3")])
            .build()
            .unwrap();
        let titles: Vec<&str> = table.rules().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn default_outcome_is_not_injected() {
        let table = sample();
        let result = table
            .evaluate(&Context::new().set("age", 40_i64).set("income", 10_i64))
            .unwrap();
        assert_eq!(result.final_decision(), None);
    }

    #[test]
    fn decide_falls_back_to_default() {
        let table = sample();
        let ctx = Context::new().set("age", 40_i64).set("income", 10_i64);
        assert_eq!(table.decide(&ctx).unwrap(), Some(Value::from("default")));

        let ctx = Context::new().set("age", 18_i64).set("income", 10_i64);
        assert_eq!(table.decide(&ctx).unwrap(), Some(Value::from("Under 21")));
    }

    #[test]
    fn roll_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            assert!(RND_RANGE.contains(&roll(&mut rng)));
        }
    }

    #[test]
    fn roll_is_reproducible_with_seeded_rng() {
        let a = DecisionTableBuilder::new()
            .roll(&mut StdRng::seed_from_u64(42))
            .build()
            .unwrap();
        let b = DecisionTableBuilder::new()
            .roll(&mut StdRng::seed_from_u64(42))
            .build()
            .unwrap();
        assert_eq!(a.rnd(), b.rnd());
    }

    #[test]
    fn with_rnd_keeps_rules() {
        let table = sample().with_rnd(77);
        assert_eq!(table.rnd(), 77);
        assert_eq!(table.rules().len(), 2);

        let rerolled = table.rerolled(&mut StdRng::seed_from_u64(1));
        assert!(RND_RANGE.contains(&rerolled.rnd()));
        assert_eq!(rerolled.title(), "test one");
    }

    #[test]
    fn display() {
        assert_eq!(
            sample().to_string(),
            "DecisionTable(\"test one\", 2 rules, break on match, rnd = 0)"
        );
    }
}
