use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mlc::{from_str, to_string, FieldCollection, Value};

fn sample(groups: usize) -> FieldCollection {
    let fields = FieldCollection::new();
    fields.set_path(".Version", "2").unwrap();
    for g in 0..groups {
        for i in 0..10 {
            fields
                .set_path(&format!("Group{}/Item{}", g, i), format!(" value {} ", i))
                .unwrap();
        }
    }
    fields
}

fn benchmark_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    for size in [1, 10, 100].iter() {
        let fields = sample(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &fields, |b, fields| {
            b.iter(|| to_string(black_box(fields)))
        });
    }
    group.finish();
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in [1, 10, 100].iter() {
        let text = to_string(&sample(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| from_str(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_paths(c: &mut Criterion) {
    let fields = sample(100);

    c.bench_function("get_path", |b| {
        b.iter(|| fields.get_path(black_box("group99/item9")))
    });

    c.bench_function("all_paths", |b| b.iter(|| fields.all_paths().count()));
}

fn benchmark_conversions(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");

    let integer = Value::from("0x7FFF");
    let size = Value::from("1.5Gi");
    let date = Value::from("2024-01-15T10:30:00+02:00");

    group.bench_function("hex_integer", |b| b.iter(|| black_box(&integer).as_i32()));
    group.bench_function("size", |b| b.iter(|| black_box(&size).as_size()));
    group.bench_function("date_time", |b| b.iter(|| black_box(&date).as_date_time()));

    group.finish();
}

criterion_group!(
    benches,
    benchmark_serialize,
    benchmark_parse,
    benchmark_paths,
    benchmark_conversions
);
criterion_main!(benches);
