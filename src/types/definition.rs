use std::sync::Arc;

use rand::Rng;

use super::error::CompileError;
use super::rule::Rule;
use super::table::{DecisionTable, DecisionTableBuilder};
use super::value::Value;
use crate::expression::{BuiltinEvaluator, ExpressionEvaluator};

/// Declarative description of a decision table, as found in configuration.
///
/// With the `serde` feature this deserializes from YAML:
///
/// ```yaml
/// title: eligibility
/// break_on_match: true
/// default_outcome: default
/// rules:
///   - title: Under 21
///     expression: age < 21
///     outcome: Under 21
///   - title: Has income
///     expression: income < 1
///     negate: true
///     outcome: { tier: standard }
/// ```
///
/// A missing `rnd` is rolled when the table is built.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct TableDefinition {
    pub title: String,
    pub description: String,
    pub break_on_match: bool,
    pub default_outcome: Option<Value>,
    pub rnd: Option<i32>,
    pub rules: Vec<Rule>,
}

impl TableDefinition {
    /// Builder preloaded with this definition. `rng` is only consulted when
    /// the definition has no `rnd`.
    pub fn into_builder<R: Rng>(
        self,
        evaluator: Arc<dyn ExpressionEvaluator>,
        rng: &mut R,
    ) -> DecisionTableBuilder {
        let mut builder = DecisionTableBuilder::with_evaluator(evaluator)
            .title(self.title)
            .description(self.description)
            .break_on_match(self.break_on_match)
            .rules(self.rules);
        if let Some(outcome) = self.default_outcome {
            builder = builder.default_outcome(outcome);
        }
        match self.rnd {
            Some(rnd) => builder.rnd(rnd),
            None => builder.roll(rng),
        }
    }

    /// Build with the built-in evaluator, rolling `rnd` from the thread RNG
    /// if unset.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if any rule expression is invalid.
    pub fn build(self) -> Result<DecisionTable, CompileError> {
        self.build_with(Arc::new(BuiltinEvaluator), &mut rand::rng())
    }

    /// Build with the given evaluator and random source.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if any rule expression is invalid.
    pub fn build_with<R: Rng>(
        self,
        evaluator: Arc<dyn ExpressionEvaluator>,
        rng: &mut R,
    ) -> Result<DecisionTable, CompileError> {
        self.into_builder(evaluator, rng).build()
    }
}

#[cfg(feature = "serde")]
impl TableDefinition {
    /// Parse a YAML table definition without building it.
    ///
    /// # Errors
    ///
    /// Returns [`serde_yaml::Error`] if the document does not match the schema.
    pub fn from_yaml(input: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(input)
    }
}

#[cfg(feature = "serde")]
impl DecisionTable {
    /// Parse and build a YAML table definition with the built-in evaluator.
    ///
    /// # Errors
    ///
    /// Returns [`ArbiterError`](crate::ArbiterError) on malformed YAML or an
    /// invalid rule expression.
    pub fn from_yaml(input: &str) -> Result<Self, crate::ArbiterError> {
        Ok(TableDefinition::from_yaml(input)?.build()?)
    }

    /// Parse and build a YAML table definition with a custom evaluator and
    /// random source.
    ///
    /// # Errors
    ///
    /// Returns [`ArbiterError`](crate::ArbiterError) on malformed YAML or an
    /// invalid rule expression.
    pub fn from_yaml_with<R: Rng>(
        input: &str,
        evaluator: Arc<dyn ExpressionEvaluator>,
        rng: &mut R,
    ) -> Result<Self, crate::ArbiterError> {
        Ok(TableDefinition::from_yaml(input)?.build_with(evaluator, rng)?)
    }

    /// Read a YAML table definition from disk and build it.
    ///
    /// # Errors
    ///
    /// Returns [`ArbiterError`](crate::ArbiterError) on I/O failure,
    /// malformed YAML or an invalid rule expression.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::ArbiterError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_yaml(&input)
    }
}
