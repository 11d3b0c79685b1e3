use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use arbiter::{Context, DecisionTable, DecisionTableBuilder};
use criterion::{criterion_group, criterion_main, Criterion};

fn build_shared_table() -> (Arc<DecisionTable>, Context) {
    let mut builder = DecisionTableBuilder::new();
    let mut ctx = Context::new();
    let n = 20;

    for i in 0..n {
        let var = format!("f{i}");
        builder = builder.rule(&format!("r{i}"), |r| {
            r.when(format!("{var} >= 1 AND rnd < 50")).outcome(i)
        });
        ctx = ctx.set(&var, 10_i64);
    }

    (Arc::new(builder.rnd(25).build().unwrap()), ctx)
}

fn bench_throughput(c: &mut Criterion) {
    let thread_counts = [1, 2, 4, 8];

    let mut group = c.benchmark_group("throughput");
    group.measurement_time(Duration::from_secs(5));

    for &threads in &thread_counts {
        let (table, ctx) = build_shared_table();

        group.bench_function(&format!("{threads}_threads"), |b| {
            b.iter_custom(|iters| {
                let per_thread = iters / threads as u64;
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let t = Arc::clone(&table);
                        let c = ctx.clone();
                        thread::spawn(move || {
                            let start = Instant::now();
                            for _ in 0..per_thread {
                                let _ = t.evaluate(&c);
                            }
                            start.elapsed()
                        })
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|h| h.join().unwrap())
                    .max()
                    .unwrap_or(Duration::ZERO)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_throughput);
criterion_main!(benches);
