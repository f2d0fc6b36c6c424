//! Benchmarks for the reactive engine
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use strand_core::reactive::{computed, run_effect, Reactive, Ref, Value};

fn bench_store_get(c: &mut Criterion) {
    let state = Reactive::from_entries([("n", 42)]);
    c.bench_function("store_get", |b| {
        b.iter(|| black_box(state.get("n")))
    });
}

fn bench_store_set_distinct(c: &mut Criterion) {
    let state = Reactive::from_entries([("n", 0)]);
    let mut i = 0i64;
    c.bench_function("store_set_distinct", |b| {
        b.iter(|| {
            i += 1;
            state.set("n", black_box(i));
        })
    });
}

fn bench_store_set_equal(c: &mut Criterion) {
    let state = Reactive::from_entries([("n", 42)]);
    c.bench_function("store_set_equal", |b| {
        b.iter(|| state.set("n", black_box(42)))
    });
}

fn bench_ref_get(c: &mut Criterion) {
    let r = Ref::new(42);
    c.bench_function("ref_get", |b| b.iter(|| black_box(r.get())));
}

fn bench_ref_set_distinct(c: &mut Criterion) {
    let r = Ref::new(0);
    let mut i = 0i64;
    c.bench_function("ref_set_distinct", |b| {
        b.iter(|| {
            i += 1;
            r.set(black_box(i));
        })
    });
}

fn bench_effect_create(c: &mut Criterion) {
    c.bench_function("effect_create", |b| {
        b.iter(|| black_box(run_effect(|| {})))
    });
}

fn bench_write_with_one_dependent(c: &mut Criterion) {
    let state = Reactive::from_entries([("n", 0)]);
    let _effect = {
        let state = state.clone();
        run_effect(move || {
            state.get("n");
        })
    };

    let mut i = 0i64;
    c.bench_function("write_with_one_dependent", |b| {
        b.iter(|| {
            i += 1;
            state.set("n", black_box(i));
        })
    });
}

fn bench_computed_chain_propagation(c: &mut Criterion) {
    let state = Reactive::from_entries([("n", 0)]);
    let doubled = {
        let state = state.clone();
        computed(move || Value::from(state.get("n").as_int().unwrap() * 2))
    };
    let _quadrupled = {
        let doubled = doubled.clone();
        computed(move || Value::from(doubled.get().as_int().unwrap() * 2))
    };

    let mut i = 0i64;
    c.bench_function("computed_chain_propagation", |b| {
        b.iter(|| {
            i += 1;
            state.set("n", black_box(i));
        })
    });
}

criterion_group!(
    benches,
    bench_store_get,
    bench_store_set_distinct,
    bench_store_set_equal,
    bench_ref_get,
    bench_ref_set_distinct,
    bench_effect_create,
    bench_write_with_one_dependent,
    bench_computed_chain_propagation,
);
criterion_main!(benches);
