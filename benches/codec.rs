//! Benchmark for the whole compressor.

use rand::{thread_rng, Rng};

fn get_text(items: usize) -> Vec<u8> {
    let words = ["the ", "quick ", "brown ", "fox ", "jumps ", "over ", "lazy ", "dog "];
    let mut rng = thread_rng();
    let mut input = Vec::new();
    while input.len() < items {
        input.extend(words[rng.gen_range(0..words.len())].as_bytes());
    }
    input
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use crush::{compress, decompress};

pub fn criterion_benchmark(c: &mut Criterion) {
    let input = get_text(1 << 20);
    let compressed = compress(&input, 6).unwrap_or_default();

    c.bench_function("compress_level_1", |b| {
        b.iter(|| black_box(compress(&input, 1)))
    });
    c.bench_function("compress_level_6", |b| {
        b.iter(|| black_box(compress(&input, 6)))
    });
    c.bench_function("decompress", |b| {
        b.iter(|| black_box(decompress(&compressed)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
