//! Benchmarks for schema compilation and validation
//!
//! This benchmark suite measures performance of:
//! - Compiling a freshly chained schema
//! - Validating flat values against a compiled schema
//! - Validating nested objects and arrays
//!
//! Run with: cargo bench --bench validation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jojen::prelude::*;
use serde_json::json;

fn user_schema(jo: &Validator) -> Schema {
    jo.schema().object().keys([
        ("name", jo.schema().string().min(2).max(64).required()),
        ("email", jo.schema().string().email()),
        ("age", jo.schema().number().integer().min(0)),
        ("tags", jo.schema().array().items(jo.schema().string()).unique()),
    ])
}

/// Benchmark compiling a schema on first use
fn bench_compile(c: &mut Criterion) {
    let jo = jo();

    c.bench_function("compile_user_schema", |b| {
        b.iter(|| {
            let schema = user_schema(jo);
            black_box(schema.rules().map(|rules| rules.len()).ok());
        });
    });
}

/// Benchmark flat values against an already compiled schema
fn bench_validate_flat(c: &mut Criterion) {
    let jo = jo();
    let options = ValidationOptions::new();
    let number = jo.schema().number().min(0).max(100);
    let string = jo.schema().string().lowercase().max(32);

    c.bench_function("validate_number", |b| {
        b.iter(|| black_box(jo.validate_sync(42, &number, &options).ok()));
    });

    c.bench_function("validate_number_coerced", |b| {
        b.iter(|| black_box(jo.validate_sync("42", &number, &options).ok()));
    });

    c.bench_function("validate_string", |b| {
        b.iter(|| black_box(jo.validate_sync("hello", &string, &options).ok()));
    });
}

/// Benchmark nested objects with varying array sizes
fn bench_validate_nested(c: &mut Criterion) {
    let _ = env_logger::builder().is_test(true).try_init();
    let jo = jo();
    let options = ValidationOptions::new();
    let schema = user_schema(jo);
    let mut group = c.benchmark_group("validate_user_tags");

    for count in &[0usize, 10, 100] {
        let tags: Vec<String> = (0..*count).map(|i| format!("tag{}", i)).collect();
        let user = Value::from(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "age": 36,
            "tags": tags,
        }));
        group.bench_with_input(BenchmarkId::from_parameter(count), &user, |b, user| {
            b.iter(|| black_box(jo.validate_sync(user.clone(), &schema, &options).ok()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile, bench_validate_flat, bench_validate_nested);
criterion_main!(benches);
