// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Size;
use understory_scroll_steps::scroller::Config;
use understory_scroll_steps::sim::{ElementId, SimPage, SimScroller};

const VIEWPORT: f64 = 900.0;
const STEP_HEIGHT: f64 = 400.0;
const STEP_GAP: f64 = 200.0;

fn gen_page(steps: usize) -> (SimPage, Vec<ElementId>) {
    let page_height = VIEWPORT * 2.0 + steps as f64 * (STEP_HEIGHT + STEP_GAP);
    let mut page = SimPage::new(Size::new(800.0, VIEWPORT), page_height);
    let ids = (0..steps)
        .map(|i| page.add_step(VIEWPORT + i as f64 * (STEP_HEIGHT + STEP_GAP), STEP_HEIGHT))
        .collect();
    (page, ids)
}

fn ready(steps: usize, progress: bool) -> (SimPage, SimScroller) {
    let (mut page, ids) = gen_page(steps);
    let mut scroller = SimScroller::new();
    scroller.setup(&mut page, Config::new(ids).with_progress(progress));
    scroller.on_step_enter(|e, _| {
        black_box(e.index);
    });
    scroller.on_step_progress(|e| {
        black_box(e.progress);
    });
    page.dispatch(&mut scroller);
    (page, scroller)
}

fn bench_setup(c: &mut Criterion) {
    let mut group = c.benchmark_group("setup");
    for &n in &[16usize, 64, 256] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("setup_n{}", n), |b| {
            b.iter_batched(
                || gen_page(n),
                |(mut page, ids)| {
                    let mut scroller = SimScroller::new();
                    scroller.setup(&mut page, Config::new(ids));
                    black_box(scroller.watch_count());
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("resize_n{}", n), |b| {
            b.iter_batched(
                || ready(n, true),
                |(mut page, mut scroller)| {
                    scroller.resize(&mut page);
                    black_box(scroller.watch_count());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll");
    for &n in &[16usize, 64] {
        let frames = (n as f64 * (STEP_HEIGHT + STEP_GAP) / 25.0) as u64;
        group.throughput(Throughput::Elements(frames));
        for progress in [false, true] {
            group.bench_function(format!("smooth_n{}_progress_{}", n, progress), |b| {
                b.iter_batched(
                    || ready(n, progress),
                    |(mut page, mut scroller)| {
                        for f in 0..frames {
                            page.scroll_and_dispatch(f as f64 * 25.0, &mut scroller);
                        }
                        black_box(scroller.step_states().len());
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_jump(c: &mut Criterion) {
    let mut group = c.benchmark_group("jump");
    for &n in &[16usize, 64, 256] {
        let bottom = n as f64 * (STEP_HEIGHT + STEP_GAP) + VIEWPORT;
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("top_bottom_top_n{}", n), |b| {
            b.iter_batched(
                || ready(n, false),
                |(mut page, mut scroller)| {
                    page.scroll_and_dispatch(bottom, &mut scroller);
                    page.scroll_and_dispatch(0.0, &mut scroller);
                    black_box(scroller.step_states().len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_setup, bench_scroll, bench_jump);
criterion_main!(benches);
