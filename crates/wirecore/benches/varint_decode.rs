//! Benchmark – varint decoding strategies
#![allow(missing_docs)]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use wirecore::{
    DecodeStrategy,
    varint::{self, MAX_VARINT_LEN, algorithms},
};

/// A padded stream of `count` varints whose encodings are all `len` bytes
/// long, so that each scenario exercises one exit point of the decoders.
fn make_stream(len: usize, count: usize) -> Vec<u8> {
    let base = if len == 1 { 0 } else { 1u64 << (7 * (len - 1)) };
    let mut out = Vec::with_capacity(len * count + MAX_VARINT_LEN);
    let mut window = [0u8; MAX_VARINT_LEN];
    for i in 0..count as u64 {
        let value = base | (i % 100);
        let written = varint::encode(value, &mut window);
        debug_assert_eq!(written, len);
        out.extend_from_slice(&window[..written]);
    }
    out.resize(out.len() + MAX_VARINT_LEN, 0);
    out
}

/// Decode every varint in `stream`, returning the sum so the work is not
/// optimized away.
fn run(stream: &[u8], count: usize, strategy: DecodeStrategy) -> u64 {
    let mut sum = 0u64;
    let mut pos = 0;
    for _ in 0..count {
        let decoded = strategy.decode(&stream[pos..]).unwrap();
        sum = sum.wrapping_add(decoded.value);
        pos += decoded.len;
    }
    sum
}

fn bench_strategies(c: &mut Criterion) {
    const COUNT: usize = 4096;
    let mut group = c.benchmark_group("varint_decode");

    for len in [1, 2, 3, 5, 8, 10] {
        let stream = make_stream(len, COUNT);
        group.throughput(Throughput::Bytes((len * COUNT) as u64));
        for strategy in DecodeStrategy::ALL {
            let name = format!("{strategy:?}").to_lowercase();
            group.bench_with_input(BenchmarkId::new(name, len), &strategy, |b, &s| {
                b.iter(|| black_box(run(black_box(&stream), COUNT, s)));
            });
        }
    }
    group.finish();
}

fn bench_max8(c: &mut Criterion) {
    let mut group = c.benchmark_group("varint_max8");
    let mut window = [0u8; MAX_VARINT_LEN];
    varint::encode(u64::MAX >> 8, &mut window);
    let Some(tail) = window.first_chunk::<8>() else {
        unreachable!()
    };
    let prefix = varint::Decoded::default();

    group.bench_function("wright", |b| {
        b.iter(|| algorithms::decode_max8_wright(black_box(prefix), black_box(tail)));
    });
    group.bench_function("massimino", |b| {
        b.iter(|| algorithms::decode_max8_massimino(black_box(prefix), black_box(tail)));
    });
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(2))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_strategies, bench_max8 }
criterion_main!(benches);
