use std::fmt;

use super::rule::Rule;
use super::value::Value;

/// Result of one [`DecisionTable::evaluate()`](super::DecisionTable::evaluate) call.
///
/// `rules()` mirrors the table's rules one-for-one and in order. Each entry
/// is a copy of the table rule whose `outcome` is `None` unless that rule
/// matched during this evaluation.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct ResultSet {
    rules: Vec<Rule>,
    final_decision: Option<Value>,
}

impl ResultSet {
    pub(crate) fn new(rules: Vec<Rule>, final_decision: Option<Value>) -> Self {
        Self {
            rules,
            final_decision,
        }
    }

    /// Per-rule view of this evaluation, same length and order as the table.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Outcome selected by this evaluation, or `None` if nothing matched.
    #[must_use]
    pub fn final_decision(&self) -> Option<&Value> {
        self.final_decision.as_ref()
    }

    /// Final decision, falling back to `default` when nothing matched.
    #[must_use]
    pub fn decision_or<'a>(&'a self, default: &'a Value) -> &'a Value {
        self.final_decision.as_ref().unwrap_or(default)
    }

    #[must_use]
    pub fn into_final_decision(self) -> Option<Value> {
        self.final_decision
    }

    /// Whether any rule fired. A rule without an outcome is
    /// indistinguishable from one that did not fire.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.rules.iter().any(|r| r.outcome.is_some())
    }

    /// Rules that fired, with their position in the table.
    pub fn matched(&self) -> impl Iterator<Item = (usize, &Rule)> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, r)| r.outcome.is_some())
    }
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.final_decision {
            Some(v) => write!(f, "decision: {v}")?,
            None => write!(f, "decision: none")?,
        }
        let fired: Vec<&str> = self.matched().map(|(_, r)| r.title.as_str()).collect();
        write!(f, ", matched: [{}]", fired.join(", "))
    }
}
