use std::sync::Arc;
use std::thread;

use arbiter::{Context, DecisionTableBuilder};

fn main() {
    let table = Arc::new(
        DecisionTableBuilder::new()
            .break_on_match(true)
            .rule("minor", |r| r.when("user.age < 18").outcome("deny"))
            .rule("active", |r| r.when("user.status == 'active'").outcome("allow"))
            .build()
            .expect("failed to build decision table"),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let t = Arc::clone(&table);
            thread::spawn(move || {
                let ctx = Context::new()
                    .set("user.age", 16_i64 + i64::from(i))
                    .set("user.status", "active");

                let result = t.evaluate(&ctx);
                println!("Thread {i}: {result:?}");
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
