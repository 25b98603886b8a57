use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jtc_encoder::{EncodeConfig, Encoder, TargetLanguage, Value};

fn generate_projections(count: usize) -> Value {
    let datums = ["WGS84", "NAD83", "NAD27", "ETRS89"];
    let entries = (0..count)
        .map(|i| {
            let zone = i % 60 + 1;
            let datum = datums[i % datums.len()];
            let south = if i % 3 == 0 { " +south" } else { "" };
            (
                format!("EPSG:{}", 20000 + i),
                Value::from(format!("+proj=utm +zone={zone}{south} +datum={datum} +units=m +no_defs")),
            )
        })
        .collect();
    Value::Object(entries)
}

fn generate_rows(count: usize) -> Value {
    let rows = (0..count)
        .map(|i| {
            Value::object([
                ("id", Value::from(i as i64)),
                ("status", Value::from(if i % 2 == 0 { "active" } else { "archived" })),
                ("bounds", Value::Array(vec![Value::from(-180), Value::from(-90), Value::from(180), Value::from(90)])),
                ("owner", Value::Null),
            ])
        })
        .collect();
    Value::Array(rows)
}

fn bench_encode_projections(c: &mut Criterion) {
    let small = generate_projections(100);
    let large = generate_projections(2000);

    for &(name, language) in &[("js", TargetLanguage::Js), ("py", TargetLanguage::Py)] {
        let encoder = Encoder::new(EncodeConfig::new(language));
        c.bench_function(&format!("encode_{name}_projections_100"), |b| {
            b.iter(|| black_box(encoder.encode(black_box(&small))))
        });
        c.bench_function(&format!("encode_{name}_projections_2000"), |b| {
            b.iter(|| black_box(encoder.encode(black_box(&large))))
        });
    }
}

fn bench_encode_rows(c: &mut Criterion) {
    let rows = generate_rows(1000);
    let shared = Encoder::js();
    let mutable = Encoder::new(EncodeConfig::new(TargetLanguage::Js).with_read_only(false));
    c.bench_function("encode_rows_1000_read_only", |b| {
        b.iter(|| black_box(shared.encode(black_box(&rows))))
    });
    c.bench_function("encode_rows_1000_mutable", |b| {
        b.iter(|| black_box(mutable.encode(black_box(&rows))))
    });
}

fn bench_single_pass(c: &mut Criterion) {
    let data = generate_projections(2000);
    let encoder = Encoder::new(EncodeConfig::new(TargetLanguage::Js).with_max_passes(1));
    c.bench_function("encode_literal_pass_only_2000", |b| {
        b.iter(|| black_box(encoder.encode(black_box(&data))))
    });
}

criterion_group!(benches, bench_encode_projections, bench_encode_rows, bench_single_pass);
criterion_main!(benches);
