// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plugging in a host.
//!
//! A real toolkit implements [`GeometryProvider`] and [`IntersectionService`]
//! over its own element tree. This example wraps the simulated page in a host
//! that logs every watch it is asked to create or drop, then shows how
//! `resize`, `disable` and `destroy` translate into watch traffic.
//!
//! Run:
//! - `cargo run -p understory_scroll_demos --example scroll_steps_custom_host`

use kurbo::{Rect, Size};
use understory_scroll_steps::host::{GeometryProvider, IntersectionService, WatchOptions};
use understory_scroll_steps::scroller::{Config, Scroller};
use understory_scroll_steps::sim::{ElementId, SimPage, WatchHandle};

#[derive(Debug)]
struct LoggingHost {
    page: SimPage,
    observed: usize,
    disconnected: usize,
}

impl GeometryProvider<ElementId> for LoggingHost {
    fn scroll_y(&self) -> f64 {
        self.page.scroll_y()
    }

    fn viewport_height(&self) -> f64 {
        self.page.viewport_height()
    }

    fn page_height(&self) -> f64 {
        self.page.page_height()
    }

    fn bounding_rect(&self, element: &ElementId) -> Rect {
        self.page.bounding_rect(element)
    }

    fn select_all(&self, selector: &str, parent: Option<&ElementId>) -> Vec<ElementId> {
        self.page.select_all(selector, parent)
    }
}

impl IntersectionService<ElementId> for LoggingHost {
    type Handle = WatchHandle;

    fn observe(&mut self, element: &ElementId, options: WatchOptions) -> WatchHandle {
        println!(
            "  observe {:?} {:<13} margin top {:>6} bottom {:>6} ({} thresholds)",
            element,
            options.id.kind.name(),
            options.root_margin.y0,
            options.root_margin.y1,
            options.thresholds.len()
        );
        self.observed += 1;
        self.page.observe(element, options)
    }

    fn disconnect(&mut self, handle: WatchHandle) {
        self.disconnected += 1;
        self.page.disconnect(handle);
    }
}

impl LoggingHost {
    fn pump(&mut self, scroller: &mut Scroller<ElementId, WatchHandle>) {
        let entries = self.page.take_entries();
        scroller.handle_entries(&*self, &entries);
    }
}

fn main() {
    let mut page = SimPage::new(Size::new(600.0, 800.0), 3000.0);
    let a = page.add_step(900.0, 300.0);
    let b = page.add_step(1400.0, 300.0);
    page.set_class(a, "step");
    page.set_class(b, "step");
    let mut host = LoggingHost {
        page,
        observed: 0,
        disconnected: 0,
    };

    let mut scroller: Scroller<ElementId, WatchHandle> = Scroller::new();
    println!("== setup ==");
    scroller.setup(&mut host, Config::new(".step").with_progress(true));
    scroller.on_step_enter(|e, _| println!("  -> enter {:?}", e.element));
    host.pump(&mut scroller);
    assert_eq!(host.observed, 10);

    host.page.scroll_to(600.0);
    host.pump(&mut scroller);

    println!("== resize ==");
    host.page.resize(Size::new(600.0, 600.0), 3000.0);
    scroller.resize(&mut host);
    host.pump(&mut scroller);
    assert_eq!(host.disconnected, 10);

    println!("== disable / destroy ==");
    scroller.disable(&mut host);
    scroller.destroy(&mut host);
    assert_eq!(host.page.live_watches(), 0);
    println!(
        "  {} watches created, {} dropped, {} diagnostics",
        host.observed,
        host.disconnected,
        scroller.diagnostics().len()
    );
}
