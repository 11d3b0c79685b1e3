use arbiter::{Context, DecisionTableBuilder, Value};

fn main() {
    // Define rules
    let table = DecisionTableBuilder::new()
        .title("loan eligibility")
        .break_on_match(true)
        .default_outcome("standard review")
        .rule("Under 21", |r| r.when("age < 21").outcome("Under 21"))
        .rule("Very Low Income", |r| {
            r.when("income < 1").outcome("Very Low Income")
        })
        .rule("Employed", |r| {
            r.when("employed").negate().outcome("Unemployed")
        })
        .build()
        .expect("failed to build decision table");

    println!("{table}");

    // Evaluate against a context
    let ctx = Context::new()
        .set("age", 34_i64)
        .set("income", 0_i64)
        .set("employed", true);

    match table.evaluate(&ctx) {
        Ok(result) => {
            println!("Result: {result}");
            let fallback = Value::from("standard review");
            println!("Decision: {}", result.decision_or(&fallback));
        }
        Err(e) => println!("Evaluation failed: {e}"),
    }
}
