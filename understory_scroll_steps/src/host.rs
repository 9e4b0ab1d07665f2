// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host seams: where the engine meets the page.
//!
//! ## Overview
//!
//! The engine never touches a document directly. A host supplies two
//! capabilities:
//!
//! - [`GeometryProvider`]: scroll position, viewport and page extents, element
//!   bounding rectangles, and (optionally) step lookup by selector.
//! - [`IntersectionService`]: registers rectangle-intersection watches with a
//!   root margin and threshold list, and later delivers
//!   [`IntersectionEntry`] notifications back to
//!   [`Scroller::handle_entry`](crate::scroller::Scroller::handle_entry).
//!
//! In a browser these map onto `getBoundingClientRect` and
//! `IntersectionObserver`. The [`sim`](crate::sim) module provides a
//! deterministic in-memory host for tests.
//!
//! Rectangles use [`kurbo::Rect`] in viewport (client) coordinates: `y0` is the
//! top edge relative to the viewport top.

use alloc::vec::Vec;

use kurbo::{Insets, Rect};

use crate::observer::WatchKind;

/// Read-only access to page geometry.
pub trait GeometryProvider<E> {
    /// Current vertical scroll position of the page.
    fn scroll_y(&self) -> f64;

    /// Height of the viewport.
    fn viewport_height(&self) -> f64;

    /// Full scrollable height of the page.
    fn page_height(&self) -> f64;

    /// Offset of the document body's top border; `0` on most pages.
    fn client_top(&self) -> f64 {
        0.0
    }

    /// Bounding rectangle of `element` in viewport coordinates.
    fn bounding_rect(&self, element: &E) -> Rect;

    /// Resolve a selector to elements, optionally scoped under `parent`.
    ///
    /// Hosts without a markup tree can leave the default, which finds nothing.
    fn select_all(&self, selector: &str, parent: Option<&E>) -> Vec<E> {
        let _ = (selector, parent);
        Vec::new()
    }

    /// Whether `element` has a vertically scrollable ancestor that clips it.
    fn has_scrollable_ancestor(&self, element: &E) -> bool {
        let _ = element;
        false
    }
}

/// Identity of one watch, echoed back on every notification it produces.
///
/// `generation` identifies the watch bundle; notifications from a bundle
/// that has since been torn down are ignored.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct WatchId {
    /// Which of the five watch kinds this is.
    pub kind: WatchKind,
    /// Index of the watched step.
    pub index: usize,
    /// Bundle generation the watch belongs to.
    pub generation: u32,
}

/// Configuration for one rectangle-intersection watch.
#[derive(Clone, Debug, PartialEq)]
pub struct WatchOptions {
    /// Tag to attach to every notification.
    pub id: WatchId,
    /// Expansion of the viewport rectangle, in pixels. Positive grows the
    /// root outward, negative shrinks it. Left and right are always zero.
    pub root_margin: Insets,
    /// Ascending intersection ratios at which a notification is due.
    pub thresholds: Vec<f64>,
}

/// One intersection notification.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntersectionEntry {
    /// The watch that produced this entry.
    pub watch: WatchId,
    /// Whether the target intersects the margin-expanded viewport.
    pub is_intersecting: bool,
    /// Visible fraction of the target inside the expanded viewport, in `[0, 1]`.
    pub intersection_ratio: f64,
    /// Target bounding rectangle in viewport coordinates at notification time.
    pub bounding_rect: Rect,
}

/// Asynchronous rectangle-intersection watches.
pub trait IntersectionService<E> {
    /// Handle used to disconnect a watch.
    type Handle: Copy + core::fmt::Debug;

    /// Start watching `element`.
    ///
    /// The service must deliver an initial notification for the new watch and
    /// then one whenever its intersecting state or threshold bucket changes.
    fn observe(&mut self, element: &E, options: WatchOptions) -> Self::Handle;

    /// Stop a watch. No notification for it may be produced afterwards.
    fn disconnect(&mut self, handle: Self::Handle);
}

/// Everything the [`Scroller`](crate::scroller::Scroller) needs from a host.
///
/// This is the bound on `setup`, `resize` and `enable`. It is implemented for
/// every type that provides both capabilities.
pub trait Host<E>: GeometryProvider<E> + IntersectionService<E> {}

impl<E, T: GeometryProvider<E> + IntersectionService<E> + ?Sized> Host<E> for T {}
