#![cfg(feature = "serde")]

use std::io::Write;
use std::sync::Arc;

use arbiter::{ArbiterError, BuiltinEvaluator, Context, DecisionTable, TableDefinition, Value};
use rand::rngs::StdRng;
use rand::SeedableRng;

const ELIGIBILITY: &str = r#"
title: eligibility
description: age and income screening
break_on_match: true
default_outcome: default
rnd: 50
rules:
  - title: Under 21
    expression: age < 21
    outcome: Under 21
  - title: Very Low Income
    expression: income < 1
    outcome: Very Low Income
  - title: Has job
    description: anyone employed
    expression: employed
    negate: true
    outcome:
      tier: manual
      priority: 2
"#;

#[test]
fn yaml_definition_builds_table() {
    let table = DecisionTable::from_yaml(ELIGIBILITY).unwrap();
    assert_eq!(table.title(), "eligibility");
    assert_eq!(table.description(), "age and income screening");
    assert!(table.break_on_match());
    assert_eq!(table.rnd(), 50);
    assert_eq!(table.default_outcome(), Some(&Value::from("default")));
    assert_eq!(table.rules().len(), 3);
    assert!(table.rules()[2].negate);
    assert_eq!(table.rules()[2].description, "anyone employed");

    let result = table
        .evaluate(&Context::new().set("age", 20_i64).set("income", 10_i64))
        .unwrap();
    assert_eq!(result.final_decision(), Some(&Value::from("Under 21")));
}

#[test]
fn yaml_map_outcome() {
    let table = DecisionTable::from_yaml(ELIGIBILITY).unwrap();
    let ctx = Context::new()
        .set("age", 40_i64)
        .set("income", 10_i64)
        .set("employed", false);
    let decision = table.decide(&ctx).unwrap().unwrap();
    match decision {
        Value::Map(map) => {
            assert_eq!(map.get("tier"), Some(&Value::from("manual")));
            assert_eq!(map.get("priority"), Some(&Value::Int(2)));
        }
        other => panic!("expected map outcome, got {other:?}"),
    }
}

#[test]
fn missing_fields_take_defaults() {
    let def = TableDefinition::from_yaml("rules:\n  - expression: x == 1\n").unwrap();
    assert_eq!(def.title, "");
    assert!(!def.break_on_match);
    assert_eq!(def.rnd, None);
    assert_eq!(def.rules[0].outcome, None);
    assert!(!def.rules[0].negate);
}

#[test]
fn missing_rnd_is_rolled() {
    let yaml = "rules:\n  - expression: rnd < 100\n    outcome: in range\n";
    let mut rng = StdRng::seed_from_u64(3);
    let table = DecisionTable::from_yaml_with(yaml, Arc::new(BuiltinEvaluator), &mut rng).unwrap();
    assert!(arbiter::RND_RANGE.contains(&table.rnd()));
    let result = table.evaluate(&Context::new()).unwrap();
    assert_eq!(result.final_decision(), Some(&Value::from("in range")));
}

#[test]
fn invalid_expression_is_compile_error() {
    let yaml = "rules:\n  - title: broken\n    expression: 'x <'\n";
    let err = DecisionTable::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, ArbiterError::Compile(_)));
}

#[test]
fn malformed_yaml_is_definition_error() {
    let err = DecisionTable::from_yaml("rules: [unterminated").unwrap_err();
    assert!(matches!(err, ArbiterError::Definition(_)));
}

#[test]
fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(ELIGIBILITY.as_bytes()).unwrap();

    let table = DecisionTable::from_file(file.path()).unwrap();
    assert_eq!(table.title(), "eligibility");
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DecisionTable::from_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ArbiterError::Io(_)));
}

#[test]
fn result_set_serializes() {
    let table = DecisionTable::from_yaml(ELIGIBILITY).unwrap();
    let result = table
        .evaluate(&Context::new().set("age", 18_i64).set("income", 10_i64))
        .unwrap();
    let yaml = serde_yaml::to_string(&result).unwrap();
    assert!(yaml.contains("final_decision: Under 21"));
}

#[test]
fn unknown_table_key_is_rejected() {
    let yaml = "breakOnMatch: true\nrules:\n  - expression: x == 1\n";
    let err = DecisionTable::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, ArbiterError::Definition(_)));
    assert!(err.to_string().contains("breakOnMatch"), "{err}");
}

#[test]
fn unknown_rule_key_is_rejected() {
    let yaml = "break_on_match: true\nrules:\n  - expression: x == 1\n    negated: true\n";
    let err = DecisionTable::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, ArbiterError::Definition(_)));
    assert!(err.to_string().contains("negated"), "{err}");
}

#[test]
fn null_outcome_reads_back_as_none() {
    let def = TableDefinition {
        rules: vec![arbiter::Rule::new("nothing", "x == 1").with_outcome(Value::Null)],
        ..TableDefinition::default()
    };
    let yaml = serde_yaml::to_string(&def).unwrap();
    let back = TableDefinition::from_yaml(&yaml).unwrap();
    assert_eq!(back.rules[0].outcome, None);
}
