//! Throughput benchmarks for lzws.
//!
//! - One-shot compression/decompression across data patterns
//! - Streaming sessions at several buffer capacities
//! - Effect of the maximum code bit length

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lzws::{Compressor, CompressorOptions, DecompressorOptions, Status, compress, decompress};
use std::hint::black_box;

type PatternGenerator = fn(usize) -> Vec<u8>;

mod test_data {
    /// All bytes equal (best case).
    pub fn uniform(size: usize) -> Vec<u8> {
        vec![0xAA; size]
    }

    /// No patterns (worst case).
    pub fn random(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0x123456789ABCDEF0;
        for _ in 0..size {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push((seed >> 32) as u8);
        }
        data
    }

    pub fn text_like(size: usize) -> Vec<u8> {
        let text = b"The quick brown fox jumps over the lazy dog. \
                     Pack my box with five dozen liquor jugs. \
                     How vexingly quick daft zebras jump! ";
        text.iter().copied().cycle().take(size).collect()
    }
}

const SIZE: usize = 1024 * 1024;

const PATTERNS: [(&str, PatternGenerator); 3] = [
    ("uniform", test_data::uniform),
    ("random", test_data::random),
    ("text", test_data::text_like),
];

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    let options = CompressorOptions::default();

    for (name, generator) in PATTERNS {
        let data = generator(SIZE);
        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| black_box(compress(black_box(data), &options).unwrap()));
        });
    }

    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress");
    let options = DecompressorOptions::default();

    for (name, generator) in PATTERNS {
        let compressed = compress(&generator(SIZE), &CompressorOptions::default()).unwrap();
        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &compressed, |b, data| {
            b.iter(|| black_box(decompress(black_box(data), &options).unwrap()));
        });
    }

    group.finish();
}

fn bench_streaming_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming_buffer");
    let data = test_data::text_like(SIZE);

    for capacity in [64usize, 4096, 32 * 1024] {
        let options = CompressorOptions::default().with_destination_buffer_length(capacity);
        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &data, |b, data| {
            b.iter(|| {
                let mut compressor = Compressor::new(options).unwrap();
                let mut total = 0;
                let mut rest = &data[..];
                while !rest.is_empty() {
                    let consumed = compressor.write(rest).unwrap();
                    rest = &rest[consumed..];
                    total += compressor.read().len();
                }
                while compressor.flush().unwrap() == Status::NeedsMoreOutputSpace {
                    total += compressor.read().len();
                }
                total += compressor.read().len();
                black_box(total)
            });
        });
    }

    group.finish();
}

fn bench_max_code_bit_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("max_code_bit_length");
    group.sample_size(20);
    let data = test_data::random(SIZE / 4);

    for bits in [9u8, 12, 16] {
        let options = CompressorOptions::default().with_max_code_bit_length(bits);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(bits), &data, |b, data| {
            b.iter(|| black_box(compress(black_box(data), &options).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compress,
    bench_decompress,
    bench_streaming_buffer,
    bench_max_code_bit_length,
);
criterion_main!(benches);
