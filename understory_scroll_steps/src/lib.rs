// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scroll_steps --heading-base-level=0

//! Understory Scroll Steps: headless, `no_std` scroll step triggers.
//!
//! ## Overview
//!
//! This crate turns intersection notifications into step events for
//! scroll-driven storytelling. Give it a list of step elements and it reports:
//!
//! - **enter** when a step crosses a horizontal trigger line,
//! - **exit** when it leaves the line,
//! - **progress** in `[0, 1]` while the step is crossing it.
//!
//! It does no rendering and owns no element tree. Element handles are opaque
//! values of your choosing; the host answers geometry questions
//! ([`GeometryProvider`](crate::host::GeometryProvider)) and runs watches
//! ([`IntersectionService`](crate::host::IntersectionService)), and the
//! [`Scroller`](crate::scroller::Scroller) does the rest.
//!
//! ## Trigger line
//!
//! The trigger line is an [`Offset`](crate::geometry::Offset) from the viewport
//! top: a fraction of the viewport height (default `0.5`) or a pixel literal
//! such as `"120px"`.
//!
//! ## Ordering
//!
//! A fast scroll can carry several steps past the trigger within a frame, and
//! notifications can arrive in any order. With ordering on (the default), every
//! step between the last position and the newly entered one receives its
//! enter/exit pair first, so handlers always observe steps in reading order.
//! See [`machine`](crate::machine) for the exact rules.
//!
//! ## Workflow
//!
//! 1) Implement the host traits, or use [`SimPage`](crate::sim::SimPage) for a
//!    deterministic in-memory page.
//! 2) Call [`Scroller::setup`](crate::scroller::Scroller::setup) with a
//!    [`Config`](crate::scroller::Config) and register handlers.
//! 3) Forward every intersection notification to
//!    [`Scroller::handle_entry`](crate::scroller::Scroller::handle_entry).
//! 4) Call [`Scroller::resize`](crate::scroller::Scroller::resize) whenever the
//!    layout changes.
//!
//! ```
//! use kurbo::Size;
//! use std::{cell::RefCell, rc::Rc};
//! use understory_scroll_steps::scroller::Config;
//! use understory_scroll_steps::sim::{SimPage, SimScroller};
//!
//! let mut page = SimPage::new(Size::new(800.0, 1000.0), 5000.0);
//! let steps = vec![page.add_step(1500.0, 400.0), page.add_step(2000.0, 400.0)];
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let mut scroller = SimScroller::new();
//! scroller.setup(&mut page, Config::new(steps));
//! let l = log.clone();
//! scroller.on_step_enter(move |e, _| l.borrow_mut().push(format!("enter {}", e.index)));
//! let l = log.clone();
//! scroller.on_step_exit(move |e, _| l.borrow_mut().push(format!("exit {}", e.index)));
//!
//! page.dispatch(&mut scroller);
//! // Jump straight to the second step.
//! page.scroll_and_dispatch(1600.0, &mut scroller);
//! assert_eq!(*log.borrow(), ["enter 0", "exit 0", "enter 1"]);
//! ```
//!
//! ## Diagnostics
//!
//! Configuration and lifecycle problems never panic. They are logged through
//! `tracing` and recorded as [`ScrollerError`](crate::error::ScrollerError)s,
//! readable through
//! [`Scroller::diagnostics`](crate::scroller::Scroller::diagnostics).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod debug;
pub mod direction;
pub mod error;
pub mod geometry;
pub mod host;
pub mod machine;
pub mod observer;
pub mod scroller;
pub mod sim;
pub mod types;

pub use error::{ErrorKind, ScrollerError};
pub use geometry::{Geometry, Offset, OffsetSpec, StepMetrics};
pub use host::{GeometryProvider, Host, IntersectionEntry, IntersectionService};
pub use scroller::{Config, Scroller, StepSelector};
pub use types::{Direction, ProgressEvent, ScrollerState, StepEvent, StepLifecycle, StepState};
