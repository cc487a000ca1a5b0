//! Benchmarks for unipynb parsing and rendering performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks test conversion performance at various notebook sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;

/// A 1x1 transparent PNG.
const PNG_PAYLOAD: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Creates a synthetic notebook with the given number of cell pairs.
fn create_test_notebook(cell_pairs: usize) -> Vec<u8> {
    let mut cells = Vec::with_capacity(cell_pairs * 2);

    for i in 0..cell_pairs {
        cells.push(json!({
            "cell_type": "markdown",
            "metadata": {},
            "source": [format!("## Step {}\n", i), "Some explanatory text with *emphasis*.\n"]
        }));
        cells.push(json!({
            "cell_type": "code",
            "execution_count": i,
            "metadata": {},
            "source": ["import numpy as np\n", format!("x = np.arange({})\n", i), "x.sum()"],
            "outputs": [
                { "output_type": "stream", "name": "stdout", "text": ["computing\n"] },
                {
                    "output_type": "execute_result",
                    "execution_count": i,
                    "metadata": {},
                    "data": {
                        "text/plain": [format!("{}", i * (i + 1) / 2)],
                        "text/html": format!("<b>{}</b>", i),
                        "image/png": PNG_PAYLOAD
                    }
                }
            ]
        }));
    }

    serde_json::to_vec(&json!({
        "metadata": { "language_info": { "name": "python" } },
        "nbformat": 4,
        "nbformat_minor": 5,
        "cells": cells
    }))
    .unwrap()
}

/// Benchmark notebook parsing at various sizes.
fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("notebook_parsing");

    for pairs in [10, 100, 500].iter() {
        let data = create_test_notebook(*pairs);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("cell_pairs", pairs), &data, |b, data| {
            b.iter(|| {
                let _ = unipynb::parse_bytes(black_box(data.as_slice()));
            });
        });
    }

    group.finish();
}

/// Benchmark Markdown rendering with inline images.
fn bench_markdown_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("markdown_rendering");

    for pairs in [10, 100, 500].iter() {
        let notebook = unipynb::parse_bytes(&create_test_notebook(*pairs)).unwrap();
        group.bench_with_input(
            BenchmarkId::new("cell_pairs", pairs),
            &notebook,
            |b, notebook| {
                let options = unipynb::RenderOptions::default();
                b.iter(|| {
                    let _ = unipynb::render::render_markdown(black_box(notebook), &options);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark rendering with image extraction to disk.
fn bench_image_extraction(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let notebook = unipynb::parse_bytes(&create_test_notebook(50)).unwrap();
    let options = unipynb::RenderOptions::default().with_image_dir(dir.path());

    c.bench_function("extract_50_images", |b| {
        b.iter(|| {
            let _ = unipynb::render::render_markdown(black_box(&notebook), &options);
        });
    });
}

criterion_group!(
    benches,
    bench_parsing,
    bench_markdown_rendering,
    bench_image_extraction,
);
criterion_main!(benches);
