// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Progress through a tall step.
//!
//! With progress enabled every step gets a graduated watch, and the scroller
//! reports how far the step has moved through the trigger line. Progress is
//! pinned to `1` when the step exits downward.
//!
//! Run:
//! - `cargo run -p understory_scroll_demos --example scroll_steps_progress`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Size;
use tracing_subscriber::EnvFilter;
use understory_scroll_steps::scroller::Config;
use understory_scroll_steps::sim::{SimPage, SimScroller};

fn bar(progress: f64) -> String {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Progress is clamped to [0, 1], so the width fits easily."
    )]
    let filled = (progress * 40.0).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(40 - filled))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut page = SimPage::new(Size::new(800.0, 900.0), 4000.0);
    let step = page.add_step(1500.0, 800.0);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut scroller = SimScroller::new();
    scroller.setup(
        &mut page,
        Config::new(vec![step])
            .with_offset("300px")
            .with_progress(true)
            .with_threshold(8),
    );
    let s = seen.clone();
    scroller.on_step_progress(move |e| {
        println!("  step {} {} {:>5.1}%", e.index, bar(e.progress), e.progress * 100.0);
        s.borrow_mut().push(e.progress);
    });
    scroller.on_step_exit(|e, _| println!("  exit step {} ({})", e.index, e.direction.as_str()));

    println!("== Scrolling through the step ==");
    page.dispatch(&mut scroller);
    for y in (0..=25).map(|i| f64::from(i) * 100.0) {
        page.scroll_and_dispatch(y, &mut scroller);
    }

    let seen = seen.borrow();
    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "progress only grows on the way down");
    assert_eq!(seen.last().copied(), Some(1.0));
    assert!(!scroller.step_states()[0].is_entered());
}
