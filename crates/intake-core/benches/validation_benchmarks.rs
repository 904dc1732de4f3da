//! Benchmarks for the validation engine
//!
//! Profiles are generated with many households so that every pass has a
//! realistic amount of work to do.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use intake_core::{
    build_field_metadata, check_completeness, compare, prune_empty, ValidationConfig, Validator,
};
use serde_json::{json, Map, Value};

fn household(index: usize, populated: bool) -> Value {
    let text = |value: &str| {
        if populated {
            json!(value)
        } else {
            json!("")
        }
    };
    json!({
        "client_1": {
            "first_name": text("Ada"),
            "last_name": text("Lovelace"),
            "dob": if index % 7 == 0 { text("10/12/1815") } else { text("1815-12-10") },
            "ssn": text("000-00-0000")
        },
        "home_address": {
            "street": text("12 St James Sq"),
            "city": text("London"),
            "zip": if index % 5 == 0 { text("ABC") } else { text("10001") }
        },
        "employment": {
            "employer": text("Analytical Engines"),
            "annual_income": if populated { json!(index * 1000) } else { Value::Null }
        }
    })
}

fn create_documents(households: usize) -> (Value, Value) {
    let target: Map<String, Value> = (0..households)
        .map(|i| (format!("household_{:04}", i), household(i, false)))
        .collect();
    let populated: Map<String, Value> = (0..households)
        .filter(|i| i % 3 != 0)
        .map(|i| (format!("household_{:04}", i), household(i, i % 2 == 0)))
        .collect();
    (Value::Object(populated), Value::Object(target))
}

fn bench_passes(c: &mut Criterion) {
    let (populated, target) = create_documents(200);

    let mut group = c.benchmark_group("passes");
    group.bench_function("structure", |b| {
        b.iter(|| compare(black_box(&populated), black_box(&target)))
    });
    group.bench_function("completeness", |b| {
        b.iter(|| check_completeness(black_box(&populated), black_box(&target)))
    });
    group.bench_function("metadata", |b| {
        b.iter(|| build_field_metadata(black_box(&populated)))
    });
    group.bench_function("prune", |b| b.iter(|| prune_empty(black_box(&populated))));
    group.finish();
}

fn bench_full_validation(c: &mut Criterion) {
    let validator = Validator::new(ValidationConfig::default()).unwrap();
    let mut group = c.benchmark_group("validate");

    for households in [10, 100, 1000] {
        let (populated, target) = create_documents(households);
        let metadata = build_field_metadata(&populated);

        group.bench_with_input(
            BenchmarkId::new("sequential", households),
            &households,
            |b, _| {
                b.iter(|| {
                    validator
                        .validate(black_box(&populated), black_box(&target), &metadata, &[])
                        .unwrap()
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("concurrent", households),
            &households,
            |b, _| {
                b.iter(|| {
                    validator
                        .validate_concurrent(
                            black_box(&populated),
                            black_box(&target),
                            &metadata,
                            &[],
                        )
                        .unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_passes, bench_full_validation);
criterion_main!(benches);
