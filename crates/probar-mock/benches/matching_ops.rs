//! Matching Operations Benchmarks
//!
//! Benchmarks for parameter comparison, expectation matching, and failure
//! message rendering.
//!
//! Run with: `cargo bench --bench matching_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use probar_mock::prelude::*;
use std::rc::Rc;

fn bench_value_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_comparison");

    let cases = vec![
        ("int", NamedValue::new("p", 42), NamedValue::new("p", 42)),
        ("double", NamedValue::new("p", 1.5), NamedValue::new("p", 1.501)),
        ("string", NamedValue::new("p", "player-one"), NamedValue::new("p", "player-one")),
        (
            "memory_buffer",
            NamedValue::new("p", MockValue::memory_buffer(&[7_u8; 256])),
            NamedValue::new("p", MockValue::memory_buffer(&[7_u8; 256])),
        ),
        ("type_mismatch", NamedValue::new("p", 1_u32), NamedValue::new("p", 1_i64)),
    ];

    for (name, left, right) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &(left, right), |bench, (l, r)| {
            bench.iter(|| black_box(l.equals(black_box(*r))));
        });
    }

    let registry = ComparatorRegistry::new();
    registry.install_comparator("u64", Rc::new(TypedComparator::<u64>::new()));
    let left = NamedValue::object("p", "u64", Rc::new(9_u64));
    let right = NamedValue::object("p", "u64", Rc::new(9_u64));
    group.bench_function("object_with_comparator", |bench| {
        bench.iter(|| black_box(left.compare(black_box(&right), Some(&registry))));
    });

    group.finish();
}

fn populated_list(expectations: usize) -> ExpectationList {
    let mut list = ExpectationList::default();
    for index in 0..expectations {
        let id = i32::try_from(index).unwrap();
        list.expect_one_call("update")
            .with_parameter("entity", id)
            .with_parameter("dt", 0.016)
            .and_return_value(id);
    }
    list
}

fn bench_match_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_call");

    for size in [1_usize, 10, 100] {
        group.bench_with_input(BenchmarkId::new("last_of", size), &size, |bench, &size| {
            let last = i32::try_from(size - 1).unwrap();
            let actual = ActualCall::new("update")
                .with_parameter("entity", last)
                .with_parameter("dt", 0.016);
            bench.iter_batched(
                || populated_list(size),
                |mut list| {
                    let matched = list.match_call(black_box(&actual)).unwrap().is_some();
                    black_box(matched);
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_diagnostics(c: &mut Criterion) {
    let mut group = c.benchmark_group("diagnostics");

    let list = populated_list(50);
    group.bench_function("unfulfilled_calls_to_string", |bench| {
        bench.iter(|| black_box(list.unfulfilled_calls_to_string("\t\t")));
    });
    group.bench_function("check_expectations_failure", |bench| {
        bench.iter(|| black_box(list.check_expectations().is_err()));
    });

    group.finish();
}

criterion_group!(benches, bench_value_comparison, bench_match_call, bench_diagnostics);
criterion_main!(benches);
