//! Benchmarks for page windowing and quiz draws.
//!
//! Run with: `cargo bench --bench selection`
//!
//! Quiz draws use rejection sampling, so the interesting case is a session
//! that has already seen most of the pool.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;

use trivia_kernel::{paginate, select_from_pool, CategoryId, Question, QuestionId};

fn make_pool(n: i64) -> Vec<Question> {
    (1..=n)
        .map(|id| {
            Question::new(
                QuestionId::new(id),
                format!("Question {}", id),
                format!("Answer {}", id),
                CategoryId::new(id % 6 + 1),
                (id % 5 + 1) as i32,
            )
        })
        .collect()
}

fn bench_paginate(c: &mut Criterion) {
    let items = make_pool(10_000);
    let mut group = c.benchmark_group("paginate");

    for page in [1u32, 500, 1_001] {
        group.bench_with_input(BenchmarkId::from_parameter(page), &page, |b, &page| {
            b.iter(|| paginate(black_box(&items), black_box(page), 10).len())
        });
    }

    group.finish();
}

fn bench_quiz_draw(c: &mut Criterion) {
    let pool = make_pool(1_000);
    let mut group = c.benchmark_group("quiz_draw");

    for seen_fraction in [0.0f64, 0.5, 0.9, 0.999] {
        let seen = (pool.len() as f64 * seen_fraction) as i64;
        let previous: BTreeSet<QuestionId> = (1..=seen).map(QuestionId::new).collect();
        let mut rng = StdRng::seed_from_u64(42);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:.3}", seen_fraction)),
            &previous,
            |b, previous| {
                b.iter(|| select_from_pool(black_box(&pool), previous, &mut rng).map(|q| q.id))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_paginate, bench_quiz_draw);
criterion_main!(benches);
