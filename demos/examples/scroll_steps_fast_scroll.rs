// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordering backfill after a jump.
//!
//! A single jump carries the page past four steps at once. With ordering on,
//! the skipped steps still receive their enter/exit pairs in reading order
//! before the step under the trigger line is entered. The second run turns
//! ordering off for comparison.
//!
//! Debug mode traces marker ids for an overlay; run with
//! `RUST_LOG=understory_scroll_steps=debug` to see them.
//!
//! Run:
//! - `cargo run -p understory_scroll_demos --example scroll_steps_fast_scroll`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Size;
use tracing_subscriber::EnvFilter;
use understory_scroll_steps::scroller::Config;
use understory_scroll_steps::sim::{SimPage, SimScroller};

fn run(order: bool) -> Vec<String> {
    let mut page = SimPage::new(Size::new(800.0, 1000.0), 6000.0);
    let steps: Vec<_> = (0..5)
        .map(|i| page.add_step(1200.0 + f64::from(i) * 500.0, 400.0))
        .collect();

    let log = Rc::new(RefCell::new(Vec::new()));
    let mut scroller = SimScroller::new();
    scroller.setup(
        &mut page,
        Config::new(steps).with_order(order).with_debug(true),
    );
    let l = log.clone();
    scroller.on_step_enter(move |e, _| l.borrow_mut().push(format!("enter {}", e.index)));
    let l = log.clone();
    scroller.on_step_exit(move |e, _| l.borrow_mut().push(format!("exit {}", e.index)));

    page.dispatch(&mut scroller);
    tracing::info!(order, "jumping to the fifth step");
    page.scroll_and_dispatch(3000.0, &mut scroller);
    log.take()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ordered = run(true);
    println!("== order: true ==\n  {}", ordered.join(", "));
    let unordered = run(false);
    println!("== order: false ==\n  {}", unordered.join(", "));

    assert_eq!(
        ordered,
        [
            "enter 0", "exit 0", "enter 1", "exit 1", "enter 2", "exit 2", "enter 3", "exit 3",
            "enter 4",
        ]
    );
    // The viewport fallbacks still report every skipped step; only the
    // backfill pass is gone.
    assert_eq!(ordered, unordered);
}
