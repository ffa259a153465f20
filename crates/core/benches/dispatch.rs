//! Benchmarks for format dispatch and alpha flattening.
//!
//! Run with: cargo bench --package file-convert-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use file_convert_core::format::{normalize_token, FormatFamily};
use file_convert_core::raster::{flatten_onto, JPEG_BACKGROUND};
use image::{DynamicImage, Rgba, RgbaImage};
use std::time::Duration;

fn benchmark_classify(c: &mut Criterion) {
    let tokens = [".MP4", "flac", "PDF", "png", "xyz", ".Docx"];

    c.bench_function("classify_tokens", |b| {
        b.iter(|| {
            for token in tokens {
                black_box(FormatFamily::classify(&normalize_token(black_box(token))));
            }
        });
    });
}

fn benchmark_flatten(c: &mut Criterion) {
    let image = DynamicImage::ImageRgba8(RgbaImage::from_fn(1024, 1024, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, ((x + y) % 256) as u8])
    }));

    let mut group = c.benchmark_group("flatten");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("rgba_1024_onto_white", |b| {
        b.iter(|| black_box(flatten_onto(black_box(&image), JPEG_BACKGROUND)));
    });

    group.finish();
}

criterion_group!(benches, benchmark_classify, benchmark_flatten);
criterion_main!(benches);
