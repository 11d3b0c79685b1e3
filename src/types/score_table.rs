use super::rule::Rule;

/// A titled set of rules carrying a numeric score.
///
/// Holds data only; no evaluation is defined over it yet.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoreTable {
    pub title: String,
    pub description: String,
    pub rules: Vec<Rule>,
    pub score: f64,
}
