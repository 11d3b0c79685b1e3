use arbiter::{Context, DecisionTableBuilder};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    let base = DecisionTableBuilder::new()
        .title("checkout experiment")
        .break_on_match(true)
        .rule("control", |r| r.when("rnd < 50").outcome("control"))
        .rule("variant a", |r| r.when("rnd < 80").outcome("variant a"))
        .rule("variant b", |r| r.when("rnd < 100").outcome("variant b"))
        .build()
        .expect("failed to build decision table");

    // Seeded so the run is reproducible
    let mut rng = StdRng::seed_from_u64(2024);
    let ctx = Context::new();

    for visitor in 0..10 {
        let table = base.rerolled(&mut rng);
        let bucket = table
            .evaluate(&ctx)
            .map(|r| r.into_final_decision())
            .unwrap_or_default();
        match bucket {
            Some(bucket) => println!("visitor {visitor}: rnd = {:>2} -> {bucket}", table.rnd()),
            None => println!("visitor {visitor}: rnd = {:>2} -> unassigned", table.rnd()),
        }
    }
}
