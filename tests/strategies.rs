use arbiter::{CompareOp, Context, DecisionTable, DecisionTableBuilder, Rule, Value};
use proptest::prelude::*;

// --- Fixed variable schema ---
// x    : i64 (0..=20)
// y    : i64 (0..=20)
// rnd  : supplied by the table (0..100)

const VARS: &[&str] = &["x", "y", "rnd"];
const OPS: &[CompareOp] = &[
    CompareOp::Eq,
    CompareOp::Neq,
    CompareOp::Gt,
    CompareOp::Gte,
    CompareOp::Lt,
    CompareOp::Lte,
];

/// Generate a context that aligns with the fixed variable schema.
pub fn arb_context() -> impl Strategy<Value = Context> {
    (0_i64..=20, 0_i64..=20).prop_map(|(x, y)| Context::new().set("x", x).set("y", y))
}

/// A generated comparison `var op literal`, kept in structured form so tests
/// can compute the expected result without going through the evaluator.
#[derive(Debug, Clone)]
pub struct GenCondition {
    pub var: &'static str,
    pub op: CompareOp,
    pub literal: i64,
}

impl GenCondition {
    pub fn source(&self) -> String {
        format!("{} {} {}", self.var, self.op, self.literal)
    }

    /// Reference result of the comparison for the given variable values.
    pub fn holds(&self, x: i64, y: i64, rnd: i64) -> bool {
        let lhs = match self.var {
            "x" => x,
            "y" => y,
            _ => rnd,
        };
        let rhs = self.literal;
        match self.op {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Neq => lhs != rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Gte => lhs >= rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Lte => lhs <= rhs,
        }
    }
}

fn arb_condition() -> impl Strategy<Value = GenCondition> {
    (
        prop::sample::select(VARS),
        prop::sample::select(OPS),
        0_i64..=100,
    )
        .prop_map(|(var, op, literal)| GenCondition { var, op, literal })
}

/// A generated rule: condition, negate flag and a unique integer outcome.
#[derive(Debug, Clone)]
pub struct GenRule {
    pub condition: GenCondition,
    pub negate: bool,
}

/// A complete generated table configuration.
#[derive(Debug, Clone)]
pub struct GenTable {
    pub rules: Vec<GenRule>,
    pub break_on_match: bool,
    pub rnd: i32,
}

impl GenTable {
    /// Build into an actual `DecisionTable`. Rule `i` has outcome `i`.
    ///
    /// # Panics
    ///
    /// Panics if the generated table fails to compile (should not happen
    /// with valid generators).
    #[must_use]
    pub fn build(&self) -> DecisionTable {
        let rules = self.rules.iter().enumerate().map(|(i, r)| {
            let mut rule = Rule::new(format!("rule_{i}"), r.condition.source())
                .with_outcome(Value::Int(i as i64));
            rule.negate = r.negate;
            rule
        });
        DecisionTableBuilder::new()
            .break_on_match(self.break_on_match)
            .rnd(self.rnd)
            .rules(rules)
            .build()
            .expect("generated table should compile")
    }

    /// Indices of the rules that match, per the reference model, ignoring
    /// break-on-match.
    pub fn matching(&self, ctx: &Context) -> Vec<usize> {
        let x = int(ctx, "x");
        let y = int(ctx, "y");
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, r)| r.condition.holds(x, y, i64::from(self.rnd)) != r.negate)
            .map(|(i, _)| i)
            .collect()
    }
}

fn int(ctx: &Context, name: &str) -> i64 {
    match ctx.get(name) {
        Some(Value::Int(v)) => *v,
        other => panic!("expected int for {name}, got {other:?}"),
    }
}

/// Generate a table with 0..=8 rules.
pub fn arb_table() -> impl Strategy<Value = GenTable> {
    (
        prop::collection::vec(
            (arb_condition(), any::<bool>())
                .prop_map(|(condition, negate)| GenRule { condition, negate }),
            0..=8,
        ),
        any::<bool>(),
        0_i32..100,
    )
        .prop_map(|(rules, break_on_match, rnd)| GenTable {
            rules,
            break_on_match,
            rnd,
        })
}
