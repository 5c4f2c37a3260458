use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use wordcloud_core::Orientation;
use wordcloud_text::{CachedProvider, FixedMetrics, FontDescriptor, GlyphBoundsProvider, ShapingProvider};

fn bench_fixed_metrics(c: &mut Criterion) {
    let mut provider = FixedMetrics::new();
    let font = FontDescriptor::default();

    c.bench_function("fixed_metrics_measure", |b| {
        b.iter(|| {
            provider.measure(
                black_box("placement"),
                black_box(&font),
                black_box(48.0),
                Orientation::Horizontal,
            )
        });
    });
}

fn bench_shaping(c: &mut Criterion) {
    let mut provider = ShapingProvider::new();
    let font = FontDescriptor::default();

    c.bench_function("shaping_measure", |b| {
        b.iter(|| {
            provider.measure(
                black_box("placement"),
                black_box(&font),
                black_box(48.0),
                Orientation::Vertical,
            )
        });
    });
}

fn bench_shaping_cached(c: &mut Criterion) {
    let mut provider = CachedProvider::new(ShapingProvider::new(), 256);
    let font = FontDescriptor::default();

    c.bench_function("shaping_measure_cached", |b| {
        b.iter(|| {
            provider.measure(
                black_box("placement"),
                black_box(&font),
                black_box(48.0),
                Orientation::Vertical,
            )
        });
    });
}

criterion_group!(benches, bench_fixed_metrics, bench_shaping, bench_shaping_cached);
criterion_main!(benches);
