use criterion::{Criterion, criterion_group, criterion_main};
use sensorlink::sensor::hs300x::{RawSample, convert};
use sensorlink::telemetry::parser::extract_identifier;
use std::hint::black_box;

fn bench_convert(c: &mut Criterion) {
    let raw = RawSample {
        humidity: [0x12, 0x34],
        temperature: [0x56, 0x78],
    };
    c.bench_function("convert", |b| b.iter(|| convert(black_box(&raw))));
}

fn bench_extract_identifier(c: &mut Criterion) {
    let body: &[u8] = br#"[{"id":"0ENQG7RYQA40W17G2A2SFH8E9Q","value":"23.50"}]"#;
    c.bench_function("extract_identifier", |b| {
        b.iter(|| extract_identifier(black_box(body)))
    });

    // Forces the positional fallback path.
    let truncated: &[u8] = br#"[{"id":"0ENQG7RYQA40W17G2A2SFH8E9Q"#;
    c.bench_function("extract_identifier_fallback", |b| {
        b.iter(|| extract_identifier(black_box(truncated)))
    });
}

criterion_group!(benches, bench_convert, bench_extract_identifier);
criterion_main!(benches);
