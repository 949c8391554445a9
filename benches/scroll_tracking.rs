//! Scroll tracking micro-benchmarks
//!
//! Scroll handlers run once per frame, so the active-heading lookup and heading
//! indexing of long pages have to stay cheap.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use docs_nav::toc::{ScrollConfig, active_heading, index_headings};
use docs_nav::traits::markup::scan_headings;
use docs_nav::types::{HeadingPosition, ScrollMetrics};
use std::hint::black_box;

const SECTION_HEIGHT: f64 = 600.0;

fn positions(count: usize) -> Vec<HeadingPosition> {
    (0..count)
        .map(|i| HeadingPosition::new(format!("section-{i}"), i as f64 * SECTION_HEIGHT, 40.0))
        .collect()
}

/// Page body with `count` sections, every fifth heading a subsection.
fn long_body(count: usize) -> String {
    (0..count)
        .map(|i| {
            let tag = if i % 5 == 0 { "h2" } else { "h3" };
            format!("<{tag}>Section {i}: Configuring things</{tag}><p>Body text for section {i}.</p>")
        })
        .collect()
}

fn benchmark_active_heading(c: &mut Criterion) {
    let mut group = c.benchmark_group("active_heading");
    let config = ScrollConfig::default();

    for count in [10usize, 100, 1000] {
        let positions = positions(count);
        let document_height = count as f64 * SECTION_HEIGHT + 800.0;
        let middle = ScrollMetrics::new(document_height / 2.0, 800.0, document_height);

        group.bench_with_input(BenchmarkId::new("headings", count), &count, |b, _| {
            b.iter(|| active_heading(black_box(&positions), black_box(&middle), &config));
        });
    }
    group.finish();
}

fn benchmark_index_headings(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_headings");

    for count in [10usize, 100, 1000] {
        let body = long_body(count);
        group.bench_with_input(BenchmarkId::new("sections", count), &body, |b, body| {
            b.iter(|| index_headings(&scan_headings(black_box(body))));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_active_heading, benchmark_index_headings);
criterion_main!(benches);
