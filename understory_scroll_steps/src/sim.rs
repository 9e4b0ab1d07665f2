// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A deterministic, in-memory host.
//!
//! ## Overview
//!
//! [`SimPage`] is a scrollable page of axis-aligned elements that implements
//! both [`GeometryProvider`] and [`IntersectionService`]. Watches follow the
//! intersection-observer model:
//!
//! - the root is the viewport expanded by the watch's root margin;
//! - a target intersects when the rectangles overlap or touch;
//! - the ratio is intersection area over target area;
//! - an entry is queued on `observe`, and afterwards whenever the intersecting
//!   flag or the threshold bucket of the ratio changes.
//!
//! Entries queue up in watch creation order until drained, just as a browser
//! batches them per frame. Disconnecting a watch drops it from the page but
//! does not recall entries that are already queued. Handles are never reused.
//!
//! ## Example
//!
//! ```
//! use kurbo::Size;
//! use understory_scroll_steps::scroller::Config;
//! use understory_scroll_steps::sim::{SimPage, SimScroller};
//!
//! let mut page = SimPage::new(Size::new(800.0, 1000.0), 5000.0);
//! let step = page.add_step(2000.0, 400.0);
//!
//! let mut scroller = SimScroller::new();
//! scroller.setup(&mut page, Config::new(vec![step]));
//! scroller.on_step_enter(|e, _| println!("enter {} {:?}", e.index, e.direction));
//!
//! page.dispatch(&mut scroller);
//! page.scroll_and_dispatch(1600.0, &mut scroller);
//! assert!(scroller.step_states()[0].is_entered());
//! ```

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Rect, Size};

use crate::host::{GeometryProvider, IntersectionEntry, IntersectionService, WatchOptions};
use crate::scroller::Scroller;

/// Element handle on a [`SimPage`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

/// Watch handle on a [`SimPage`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct WatchHandle(usize);

/// A scroller driven by a [`SimPage`].
pub type SimScroller = Scroller<ElementId, WatchHandle>;

#[derive(Clone, Debug)]
struct SimElement {
    // Page coordinates.
    rect: Rect,
    class: Option<String>,
    parent: Option<ElementId>,
    in_scroll_container: bool,
}

#[derive(Clone, Debug)]
struct SimWatch {
    target: ElementId,
    options: WatchOptions,
    // Threshold bucket and intersecting flag of the last queued entry.
    previous: Option<(usize, bool)>,
}

/// Headless page with a viewport, elements, and intersection watches.
#[derive(Clone, Debug)]
pub struct SimPage {
    viewport: Size,
    page_height: f64,
    scroll_y: f64,
    elements: Vec<SimElement>,
    // Live watches keyed by handle; handles grow monotonically, so key order
    // is creation order.
    watches: BTreeMap<usize, SimWatch>,
    next_handle: usize,
    queue: Vec<IntersectionEntry>,
}

impl SimPage {
    /// Create an empty page scrolled to the top.
    pub fn new(viewport: Size, page_height: f64) -> Self {
        Self {
            viewport,
            page_height,
            scroll_y: 0.0,
            elements: Vec::new(),
            watches: BTreeMap::new(),
            next_handle: 0,
            queue: Vec::new(),
        }
    }

    /// Add an element with a rectangle in page coordinates.
    pub fn add_element(&mut self, rect: Rect) -> ElementId {
        self.elements.push(SimElement {
            rect,
            class: None,
            parent: None,
            in_scroll_container: false,
        });
        ElementId(self.elements.len() - 1)
    }

    /// Add a full-width element at `top` with the given height.
    pub fn add_step(&mut self, top: f64, height: f64) -> ElementId {
        self.add_element(Rect::new(0.0, top, self.viewport.width, top + height))
    }

    /// Tag an element with a class name matched by `.class` selectors.
    pub fn set_class(&mut self, el: ElementId, class: &str) {
        if let Some(e) = self.elements.get_mut(el.0) {
            e.class = Some(class.into());
        }
    }

    /// Declare `parent` as the container of `el` for scoped selection.
    pub fn set_parent(&mut self, el: ElementId, parent: ElementId) {
        if let Some(e) = self.elements.get_mut(el.0) {
            e.parent = Some(parent);
        }
    }

    /// Mark an element as living inside a scrollable container.
    pub fn set_in_scroll_container(&mut self, el: ElementId, yes: bool) {
        if let Some(e) = self.elements.get_mut(el.0) {
            e.in_scroll_container = yes;
        }
    }

    /// Move an element (page coordinates). Watches are re-evaluated.
    pub fn set_rect(&mut self, el: ElementId, rect: Rect) {
        if let Some(e) = self.elements.get_mut(el.0) {
            e.rect = rect;
        }
        self.update_watches();
    }

    /// Change viewport and page extents. Watches are re-evaluated.
    pub fn resize(&mut self, viewport: Size, page_height: f64) {
        self.viewport = viewport;
        self.page_height = page_height;
        self.update_watches();
    }

    /// Scroll to `y`, clamped to the scrollable range, and queue entries.
    pub fn scroll_to(&mut self, y: f64) {
        let max = (self.page_height - self.viewport.height).max(0.0);
        self.scroll_y = y.clamp(0.0, max);
        self.update_watches();
    }

    /// Number of watches currently connected.
    pub fn live_watches(&self) -> usize {
        self.watches.len()
    }

    /// Entries queued since the last drain.
    pub fn pending(&self) -> &[IntersectionEntry] {
        &self.queue
    }

    /// Remove and return all queued entries.
    pub fn take_entries(&mut self) -> Vec<IntersectionEntry> {
        core::mem::take(&mut self.queue)
    }

    /// Deliver all queued entries to `scroller`.
    pub fn dispatch(&mut self, scroller: &mut SimScroller) {
        let entries = self.take_entries();
        scroller.handle_entries(&*self, &entries);
    }

    /// Scroll, then deliver the resulting entries.
    pub fn scroll_and_dispatch(&mut self, y: f64, scroller: &mut SimScroller) {
        self.scroll_to(y);
        self.dispatch(scroller);
    }

    fn update_watches(&mut self) {
        for watch in self.watches.values_mut() {
            if let Some(entry) = evaluate(&self.elements, self.viewport, self.scroll_y, watch) {
                self.queue.push(entry);
            }
        }
    }
}

fn client_rect(elements: &[SimElement], el: ElementId, scroll_y: f64) -> Rect {
    elements
        .get(el.0)
        .map(|e| e.rect - kurbo::Vec2::new(0.0, scroll_y))
        .unwrap_or(Rect::ZERO)
}

/// Recompute one watch; returns the entry to queue if its state changed.
fn evaluate(
    elements: &[SimElement],
    viewport: Size,
    scroll_y: f64,
    watch: &mut SimWatch,
) -> Option<IntersectionEntry> {
    let target = client_rect(elements, watch.target, scroll_y);
    let m = watch.options.root_margin;
    let root = Rect::new(-m.x0, -m.y0, viewport.width + m.x1, viewport.height + m.y1);
    let (is_intersecting, ratio) = intersect(target, root);
    let level = bucket(&watch.options.thresholds, ratio);
    if watch.previous == Some((level, is_intersecting)) {
        return None;
    }
    watch.previous = Some((level, is_intersecting));
    Some(IntersectionEntry {
        watch: watch.options.id,
        is_intersecting,
        intersection_ratio: ratio,
        bounding_rect: target,
    })
}

/// Overlap test that counts touching edges as intersecting.
fn intersect(target: Rect, root: Rect) -> (bool, f64) {
    let x0 = target.x0.max(root.x0);
    let y0 = target.y0.max(root.y0);
    let x1 = target.x1.min(root.x1);
    let y1 = target.y1.min(root.y1);
    let is_intersecting = x0 <= x1 && y0 <= y1;
    let target_area = target.area();
    let ratio = if target_area > 0.0 {
        if is_intersecting {
            ((x1 - x0) * (y1 - y0)) / target_area
        } else {
            0.0
        }
    } else if is_intersecting {
        1.0
    } else {
        0.0
    };
    (is_intersecting, ratio)
}

/// Index of the first threshold above `ratio`, or the list length.
fn bucket(thresholds: &[f64], ratio: f64) -> usize {
    if thresholds.is_empty() {
        return usize::from(ratio >= 0.0);
    }
    thresholds
        .iter()
        .position(|&t| t > ratio)
        .unwrap_or(thresholds.len())
}

impl GeometryProvider<ElementId> for SimPage {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn viewport_height(&self) -> f64 {
        self.viewport.height
    }

    fn page_height(&self) -> f64 {
        self.page_height
    }

    fn bounding_rect(&self, element: &ElementId) -> Rect {
        client_rect(&self.elements, *element, self.scroll_y)
    }

    /// Supports `.class` selectors only.
    fn select_all(&self, selector: &str, parent: Option<&ElementId>) -> Vec<ElementId> {
        let Some(class) = selector.strip_prefix('.') else {
            return Vec::new();
        };
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.class.as_deref() == Some(class))
            .filter(|(_, e)| parent.is_none_or(|p| e.parent == Some(*p)))
            .map(|(i, _)| ElementId(i))
            .collect()
    }

    fn has_scrollable_ancestor(&self, element: &ElementId) -> bool {
        self.elements
            .get(element.0)
            .is_some_and(|e| e.in_scroll_container)
    }
}

impl IntersectionService<ElementId> for SimPage {
    type Handle = WatchHandle;

    fn observe(&mut self, element: &ElementId, options: WatchOptions) -> WatchHandle {
        let mut watch = SimWatch {
            target: *element,
            options,
            previous: None,
        };
        if let Some(entry) = evaluate(&self.elements, self.viewport, self.scroll_y, &mut watch) {
            self.queue.push(entry);
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        self.watches.insert(handle, watch);
        WatchHandle(handle)
    }

    fn disconnect(&mut self, handle: WatchHandle) {
        self.watches.remove(&handle.0);
    }
}
