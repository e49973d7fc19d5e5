// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Duration;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use understory_document::{Document, Element, NodeId};
use understory_tooltip::adapters::document::DocumentOverlay;
use understory_tooltip::{Tooltip, TooltipOptions};

const CELL: f64 = 20.0;

// An n×n grid of titled cells, each wrapped in a plain row container.
fn gen_grid_doc(n: usize) -> (Document, Vec<NodeId>) {
    let side = n as f64 * CELL;
    let mut doc = Document::new();
    let root = doc.insert(
        None,
        Element::html("body").with_bounds(Rect::new(0.0, 0.0, side, side)),
    );
    let mut cells = Vec::with_capacity(n * n);
    for y in 0..n {
        let y0 = y as f64 * CELL;
        let row = doc.insert(
            Some(root),
            Element::html("div").with_bounds(Rect::new(0.0, y0, side, y0 + CELL)),
        );
        for x in 0..n {
            let x0 = x as f64 * CELL;
            cells.push(
                doc.insert(
                    Some(row),
                    Element::html("span")
                        .with_bounds(Rect::new(x0, y0, x0 + CELL, y0 + CELL))
                        .with_attribute("title", &format!("cell {x},{y}")),
                ),
            );
        }
    }
    (doc, cells)
}

fn cell_center(i: usize, n: usize) -> Point {
    let (x, y) = (i % n, i / n);
    Point::new((x as f64 + 0.5) * CELL, (y as f64 + 0.5) * CELL)
}

fn bench_install(c: &mut Criterion) {
    let mut group = c.benchmark_group("install");
    for &n in &[10_usize, 32, 64] {
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("initial_scan_n{}", n), |b| {
            b.iter_batched(
                || gen_grid_doc(n).0,
                |mut doc| {
                    let mut tip = Tooltip::new(TooltipOptions::default());
                    tip.install(&mut doc, None, Duration::ZERO);
                    black_box(doc.pending_records());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_probe(c: &mut Criterion) {
    let mut group = c.benchmark_group("probe");
    for &n in &[10_usize, 32] {
        let (mut doc, cells) = gen_grid_doc(n);
        let mut overlay = DocumentOverlay::default();
        let mut tip = Tooltip::new(TooltipOptions {
            display_delay_ms: Some(0),
            ..Default::default()
        });
        tip.install(&mut doc, None, Duration::ZERO);
        let points: Vec<Point> = (0..cells.len()).map(|i| cell_center(i, n)).collect();

        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_function(format!("pointer_sweep_n{}", n), |b| {
            b.iter(|| {
                for p in &points {
                    tip.pointer_move(&mut doc, &mut overlay, *p, Duration::ZERO);
                }
                // The overlay lives in the observed document; drain its records.
                tip.handle_mutations(&mut doc, Duration::ZERO);
                black_box(tip.state().target());
            });
        });
    }
    group.finish();
}

fn bench_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutations");
    let n = 32;
    for &batch in &[4_usize, 64] {
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_function(format!("retitle_batch{}", batch), |b| {
            b.iter_batched(
                || {
                    let (mut doc, cells) = gen_grid_doc(n);
                    let mut tip = Tooltip::new(TooltipOptions::default());
                    tip.install(&mut doc, None, Duration::ZERO);
                    for cell in cells.iter().take(batch) {
                        doc.set_attribute(*cell, "title", "changed");
                    }
                    (doc, tip)
                },
                |(mut doc, mut tip)| {
                    black_box(tip.handle_mutations(&mut doc, Duration::ZERO));
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_install, bench_probe, bench_mutations);
criterion_main!(benches);
