// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enter and exit events for a column of steps.
//!
//! This example scrolls a simulated page down through three steps and back up
//! again, one small increment at a time, and prints every event.
//!
//! Run:
//! - `cargo run -p understory_scroll_demos --example scroll_steps_basics`
//! - `RUST_LOG=understory_scroll_steps=trace cargo run -p understory_scroll_demos --example scroll_steps_basics`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Size;
use tracing_subscriber::EnvFilter;
use understory_scroll_steps::scroller::Config;
use understory_scroll_steps::sim::{SimPage, SimScroller};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut page = SimPage::new(Size::new(800.0, 1000.0), 4000.0);
    let steps: Vec<_> = (0..3)
        .map(|i| page.add_step(1200.0 + f64::from(i) * 600.0, 400.0))
        .collect();

    let log = Rc::new(RefCell::new(Vec::new()));
    let mut scroller = SimScroller::new();
    scroller.setup(&mut page, Config::new(steps));

    let l = log.clone();
    scroller.on_step_enter(move |e, states| {
        let entered = states.iter().filter(|s| s.is_entered()).count();
        println!("  enter step {} ({}), {entered} entered", e.index, e.direction.as_str());
        l.borrow_mut().push(format!("enter {} {}", e.index, e.direction.as_str()));
    });
    let l = log.clone();
    scroller.on_step_exit(move |e, _| {
        println!("  exit  step {} ({})", e.index, e.direction.as_str());
        l.borrow_mut().push(format!("exit {} {}", e.index, e.direction.as_str()));
    });

    println!("== Scrolling down ==");
    page.dispatch(&mut scroller);
    for y in (0..=30).map(|i| f64::from(i) * 100.0) {
        page.scroll_and_dispatch(y, &mut scroller);
    }

    println!("== Scrolling up ==");
    for y in (0..=30).rev().map(|i| f64::from(i) * 100.0) {
        page.scroll_and_dispatch(y, &mut scroller);
    }

    let log = log.borrow();
    assert_eq!(log.len(), 12);
    assert_eq!(log[0], "enter 0 down");
    assert_eq!(log[5], "exit 2 down");
    assert_eq!(log[6], "enter 2 up");
    assert_eq!(log[11], "exit 0 up");
}
