//! Benchmarks for glyph sampling and grid building

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use dotext_test_utils::MockRasterizer;
use dotext_text::{CosmicRasterizer, GlyphCache, GlyphSampler, Typeface, build_grid};

fn bench_cold_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_cold");
    let rasterizer = Arc::new(CosmicRasterizer::with_system_fonts());
    let typeface = Typeface::new("sans-serif");

    for density in [8u32, 16, 32, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(density), &density, |b, &density| {
            b.iter(|| {
                // Fresh cache each iteration so every sample rasterizes.
                let sampler = GlyphSampler::new(GlyphCache::new(), rasterizer.clone());
                black_box(sampler.sample('W', density as f32, &typeface))
            });
        });
    }

    group.finish();
}

fn bench_build_grid_warm(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_grid_warm");
    let sampler = GlyphSampler::new(GlyphCache::new(), Arc::new(MockRasterizer::new()));
    let typeface = Typeface::default();

    let long_text = "The quick brown fox jumps over the lazy dog. ".repeat(4);
    let texts: Vec<(&str, &str)> = vec![
        ("single_char", "A"),
        ("word", "Hello"),
        ("sentence", "The quick brown fox"),
        ("long_text", &long_text),
    ];

    for (name, content) in texts {
        build_grid(&sampler, content, 16.0, &typeface);
        group.throughput(Throughput::Elements(content.chars().count() as u64));
        group.bench_function(name, |b| {
            b.iter(|| black_box(build_grid(&sampler, black_box(content), 16.0, &typeface)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cold_sampling, bench_build_grid_warm);
criterion_main!(benches);
