use std::fmt;

use super::Value;

/// One row of a decision table.
///
/// `title` and `description` are metadata only. The rule matches when
/// `expression` evaluates to `true`, or to `false` if `negate` is set, and a
/// match contributes `outcome` to the result.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Rule {
    pub title: String,
    pub description: String,
    pub expression: String,
    pub negate: bool,
    /// Value contributed on a match. `Some(Value::Null)` does not survive
    /// serde: it serializes as `null` and deserializes as `None`.
    pub outcome: Option<Value>,
}

impl Rule {
    #[must_use]
    pub fn new(title: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            expression: expression.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: impl Into<Value>) -> Self {
        self.outcome = Some(outcome.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }

    /// XOR of the raw expression result with `negate`.
    #[must_use]
    pub fn matches(&self, expression_result: bool) -> bool {
        expression_result != self.negate
    }

    /// Copy of this rule with the outcome cleared, as it appears in a
    /// [`ResultSet`](super::ResultSet) when the rule did not fire.
    pub(crate) fn unfired(&self) -> Self {
        Self {
            title: self.title.clone(),
            description: self.description.clone(),
            expression: self.expression.clone(),
            negate: self.negate,
            outcome: None,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negate {
            write!(f, "{}: NOT ({})", self.title, self.expression)?;
        } else {
            write!(f, "{}: {}", self.title, self.expression)?;
        }
        if let Some(outcome) = &self.outcome {
            write!(f, " => {outcome}")?;
        }
        Ok(())
    }
}

/// Intermediate builder passed to the rule definition closure of
/// [`DecisionTableBuilder::rule()`](super::DecisionTableBuilder::rule).
#[derive(Debug, Default)]
pub struct RuleBuilder {
    pub(crate) rule: Rule,
}

impl RuleBuilder {
    /// Set the rule's boolean expression.
    #[must_use]
    pub fn when(mut self, expression: impl Into<String>) -> Self {
        self.rule.expression = expression.into();
        self
    }

    /// Match when the expression is `false` instead of `true`.
    #[must_use]
    pub fn negate(mut self) -> Self {
        self.rule.negate = true;
        self
    }

    /// Value produced when this rule matches.
    #[must_use]
    pub fn outcome(mut self, outcome: impl Into<Value>) -> Self {
        self.rule.outcome = Some(outcome.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.rule.description = description.into();
        self
    }
}
