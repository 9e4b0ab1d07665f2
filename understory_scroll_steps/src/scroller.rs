// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroller: lifecycle orchestration and notification routing.
//!
//! ## Overview
//!
//! A [`Scroller`] owns every piece of engine state for one set of steps:
//! geometry, step metrics, the [`StepMachine`], the [`ObserverSet`], and the
//! direction tracker. Hosts are borrowed per call, so several scrollers can
//! share a page without sharing state.
//!
//! ## Lifecycle
//!
//! `Unconfigured → Ready → Enabled ⇄ Disabled → Destroyed`
//!
//! - [`setup`](Scroller::setup) resolves steps, applies [`Config`], measures,
//!   and enables.
//! - [`enable`](Scroller::enable) / [`disable`](Scroller::disable) build or
//!   disconnect the watches; state is kept across a disable.
//! - [`resize`](Scroller::resize) re-measures and rebuilds watches when enabled.
//! - [`destroy`](Scroller::destroy) is terminal until the next `setup`.
//!
//! Lifecycle calls never fail. Problems are logged and recorded as
//! [`ScrollerError`]s, see [`diagnostics`](Scroller::diagnostics).
//!
//! ## Routing
//!
//! Hosts pass intersection notifications to
//! [`handle_entry`](Scroller::handle_entry). Entries are dropped unless the
//! scroller is enabled and the entry comes from the live watch bundle.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::debug::{self, InstanceId};
use crate::direction::DirectionTracker;
use crate::error::ScrollerError;
use crate::geometry::{Geometry, Offset, OffsetSpec, StepMetrics};
use crate::host::{GeometryProvider, Host, IntersectionEntry, IntersectionService};
use crate::machine::{MachineOptions, ProgressCallback, StepCallback, StepMachine};
use crate::observer::{ObserverSet, Sample, Trigger, WatchKinds};
use crate::types::{Direction, ProgressEvent, ScrollerState, StepEvent, StepState};

/// Default progress threshold granularity, in pixels per breakpoint.
pub const DEFAULT_THRESHOLD: u32 = 4;

/// Which elements to treat as steps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepSelector<E> {
    /// Resolve through [`GeometryProvider::select_all`].
    Query(String),
    /// A single element.
    Element(E),
    /// An explicit list, in reading order.
    Elements(Vec<E>),
}

impl<E> From<Vec<E>> for StepSelector<E> {
    fn from(v: Vec<E>) -> Self {
        Self::Elements(v)
    }
}

impl<E> From<&str> for StepSelector<E> {
    fn from(s: &str) -> Self {
        Self::Query(s.into())
    }
}

impl<E> From<String> for StepSelector<E> {
    fn from(s: String) -> Self {
        Self::Query(s)
    }
}

/// Options for [`Scroller::setup`].
///
/// ```
/// use understory_scroll_steps::scroller::Config;
///
/// let config = Config::<u32>::new(".step")
///     .with_offset("120px")
///     .with_progress(true)
///     .with_once(true);
/// assert!(config.order);
/// assert_eq!(config.threshold, 4);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Config<E> {
    /// Step elements (required).
    pub steps: StepSelector<E>,
    /// Scoping root for [`StepSelector::Query`].
    pub parent: Option<E>,
    /// Trigger line position. Default `0.5`.
    pub offset: OffsetSpec,
    /// Report progress while a step is entered. Default `false`.
    pub progress: bool,
    /// Pixels of step height per progress breakpoint; at least `1`. Default `4`.
    pub threshold: u32,
    /// Trace debug markers. Default `false`.
    pub debug: bool,
    /// Backfill skipped steps in reading order. Default `true`.
    pub order: bool,
    /// Fire each step's enter callback at most once. Default `false`.
    ///
    /// The record of fired steps belongs to one `setup`; a fresh `setup`
    /// starts over and every step may fire again.
    pub once: bool,
}

impl<E> Config<E> {
    /// Defaults for everything but the steps.
    pub fn new(steps: impl Into<StepSelector<E>>) -> Self {
        Self {
            steps: steps.into(),
            parent: None,
            offset: OffsetSpec::Fraction(0.5),
            progress: false,
            threshold: DEFAULT_THRESHOLD,
            debug: false,
            order: true,
            once: false,
        }
    }

    /// Set the selector scope.
    pub fn with_parent(mut self, parent: E) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the trigger offset.
    pub fn with_offset(mut self, offset: impl Into<OffsetSpec>) -> Self {
        self.offset = offset.into();
        self
    }

    /// Enable or disable progress reporting.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Set the progress threshold granularity.
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Enable or disable debug markers.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Enable or disable ordering backfill.
    pub fn with_order(mut self, order: bool) -> Self {
        self.order = order;
        self
    }

    /// Enable or disable trigger-once.
    pub fn with_once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }
}

/// Scroll step engine for one set of steps.
///
/// `E` is the host's element handle, `W` its watch handle.
#[derive(Debug)]
pub struct Scroller<E, W> {
    state: ScrollerState,
    instance: Option<InstanceId>,
    offset: Offset,
    threshold: u32,
    options: MachineOptions,
    geometry: Geometry,
    metrics: Vec<StepMetrics>,
    machine: StepMachine<E>,
    observers: ObserverSet<W>,
    direction: DirectionTracker,
    diagnostics: Vec<ScrollerError>,
}

impl<E, W: Copy> Default for Scroller<E, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, W: Copy> Scroller<E, W> {
    /// Create an unconfigured scroller.
    pub fn new() -> Self {
        Self {
            state: ScrollerState::Unconfigured,
            instance: None,
            offset: Offset::default(),
            threshold: DEFAULT_THRESHOLD,
            options: MachineOptions::default(),
            geometry: Geometry::default(),
            metrics: Vec::new(),
            machine: StepMachine::default(),
            observers: ObserverSet::new(),
            direction: DirectionTracker::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ScrollerState {
        self.state
    }

    /// True while watches are live.
    pub fn is_enabled(&self) -> bool {
        self.state == ScrollerState::Enabled
    }

    /// Id of the current setup, used for debug markers.
    pub fn instance_id(&self) -> Option<InstanceId> {
        self.instance
    }

    /// Geometry from the latest setup or resize.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Cached per-step metrics, in index order.
    pub fn step_metrics(&self) -> &[StepMetrics] {
        &self.metrics
    }

    /// Step elements, in index order.
    pub fn steps(&self) -> &[E] {
        self.machine.steps()
    }

    /// Per-step state, in index order.
    pub fn step_states(&self) -> &[StepState] {
        self.machine.states()
    }

    /// Most recently observed scroll direction.
    pub fn direction(&self) -> Direction {
        self.direction.direction()
    }

    /// Number of live watches.
    pub fn watch_count(&self) -> usize {
        self.observers.len()
    }

    /// Kinds of watch in the live bundle.
    pub fn watch_kinds(&self) -> WatchKinds {
        self.observers.kinds()
    }

    /// Everything reported so far, oldest first.
    pub fn diagnostics(&self) -> &[ScrollerError] {
        &self.diagnostics
    }

    /// Drain the reported diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<ScrollerError> {
        core::mem::take(&mut self.diagnostics)
    }

    /// The trigger offset currently configured.
    pub fn offset_trigger(&self) -> Offset {
        self.offset
    }

    /// Set the trigger offset; it takes effect at the next
    /// [`resize`](Self::resize).
    ///
    /// Invalid input falls back to a default and is reported.
    pub fn set_offset_trigger(&mut self, offset: impl Into<OffsetSpec>) -> &mut Self {
        if self.refuse_destroyed("offsetTrigger") {
            return self;
        }
        self.apply_offset(&offset.into());
        self
    }

    /// Replace the enter handler.
    pub fn on_step_enter(
        &mut self,
        f: impl FnMut(&StepEvent<E>, &[StepState]) + 'static,
    ) -> &mut Self {
        self.replace_step_enter(Some(Box::new(f)))
    }

    /// Replace the exit handler.
    pub fn on_step_exit(
        &mut self,
        f: impl FnMut(&StepEvent<E>, &[StepState]) + 'static,
    ) -> &mut Self {
        self.replace_step_exit(Some(Box::new(f)))
    }

    /// Replace the progress handler.
    pub fn on_step_progress(&mut self, f: impl FnMut(&ProgressEvent<E>) + 'static) -> &mut Self {
        self.replace_step_progress(Some(Box::new(f)))
    }

    /// Replace the enter handler with one that may be missing.
    ///
    /// `None` is reported and leaves the previous handler in place.
    pub fn replace_step_enter(&mut self, f: Option<StepCallback<E>>) -> &mut Self {
        if let Some(f) = self.accept_callback("onStepEnter", f) {
            self.machine.set_on_enter(f);
        }
        self
    }

    /// Replace the exit handler with one that may be missing.
    pub fn replace_step_exit(&mut self, f: Option<StepCallback<E>>) -> &mut Self {
        if let Some(f) = self.accept_callback("onStepExit", f) {
            self.machine.set_on_exit(f);
        }
        self
    }

    /// Replace the progress handler with one that may be missing.
    pub fn replace_step_progress(&mut self, f: Option<ProgressCallback<E>>) -> &mut Self {
        if let Some(f) = self.accept_callback("onStepProgress", f) {
            self.machine.set_on_progress(f);
        }
        self
    }

    fn accept_callback<F>(&mut self, name: &'static str, f: Option<F>) -> Option<F> {
        if self.refuse_destroyed(name) {
            return None;
        }
        if f.is_none() {
            self.report(ScrollerError::MissingCallback(name));
        }
        f
    }

    fn apply_offset(&mut self, spec: &OffsetSpec) {
        let (offset, problem) = spec.resolve();
        if let Some(err) = problem {
            self.report(err);
        }
        self.offset = offset;
    }

    fn report(&mut self, err: ScrollerError) {
        err.log();
        self.diagnostics.push(err);
    }

    fn refuse_destroyed(&mut self, op: &'static str) -> bool {
        if self.state == ScrollerState::Destroyed {
            self.report(ScrollerError::Destroyed(op));
            true
        } else {
            false
        }
    }
}

impl<E: Clone, W: Copy> Scroller<E, W> {
    /// Configure steps and options, measure, and enable.
    ///
    /// Any previous configuration is torn down first, and handlers are reset
    /// to no-ops. With no resolvable steps the scroller reports
    /// [`ScrollerError::EmptySteps`] and stays unconfigured.
    pub fn setup<H>(&mut self, host: &mut H, config: Config<E>) -> &mut Self
    where
        H: Host<E, Handle = W> + ?Sized,
    {
        self.observers.disconnect::<E, H>(host);
        self.machine.clear();
        self.metrics.clear();
        let id = InstanceId::next();
        self.instance = Some(id);

        let steps = match config.steps {
            StepSelector::Query(selector) => host.select_all(&selector, config.parent.as_ref()),
            StepSelector::Element(el) => alloc::vec![el],
            StepSelector::Elements(v) => v,
        };
        if steps.is_empty() {
            self.state = ScrollerState::Unconfigured;
            self.report(ScrollerError::EmptySteps);
            return self;
        }

        if let Some(index) = steps.iter().position(|s| host.has_scrollable_ancestor(s)) {
            self.report(ScrollerError::ScrollableAncestor { index });
        }

        self.options = MachineOptions {
            progress: config.progress,
            order: config.order,
            once: config.once,
            debug: config.debug,
        };
        self.apply_offset(&config.offset);
        self.threshold = config.threshold.max(1);

        self.machine = StepMachine::new(steps, self.options);
        self.machine.set_instance(id);
        self.state = ScrollerState::Ready;
        tracing::debug!(instance = %id, steps = self.machine.len(), "scroller ready");

        self.resize(host);
        self.enable(host);
        self
    }

    /// Re-measure the viewport and steps; rebuild watches when enabled.
    pub fn resize<H>(&mut self, host: &mut H) -> &mut Self
    where
        H: Host<E, Handle = W> + ?Sized,
    {
        if self.refuse_destroyed("resize") {
            return self;
        }
        self.geometry = Geometry::measure::<E, H>(self.offset, host);
        if self.state.is_ready() {
            self.metrics = StepMetrics::measure_all::<E, H>(host, self.machine.steps());
            if self.is_enabled() {
                self.rebuild(host);
            }
        }
        if let Some(id) = self.instance.filter(|_| self.options.debug) {
            debug::trace_offset(id, &self.geometry);
        }
        self
    }

    /// Build watches and start acting on notifications.
    ///
    /// Before a successful setup this reports [`ScrollerError::NotReady`] and
    /// changes nothing.
    pub fn enable<H>(&mut self, host: &mut H) -> &mut Self
    where
        H: Host<E, Handle = W> + ?Sized,
    {
        match self.state {
            ScrollerState::Destroyed => self.report(ScrollerError::Destroyed("enable")),
            ScrollerState::Unconfigured => self.report(ScrollerError::NotReady),
            ScrollerState::Enabled => {}
            ScrollerState::Ready | ScrollerState::Disabled => {
                self.rebuild(host);
                self.state = ScrollerState::Enabled;
                tracing::debug!(instance = ?self.instance, "scroller enabled");
            }
        }
        self
    }

    /// Disconnect all watches, keeping step state for a later
    /// [`enable`](Self::enable).
    pub fn disable<H>(&mut self, host: &mut H) -> &mut Self
    where
        H: IntersectionService<E, Handle = W> + ?Sized,
    {
        if self.refuse_destroyed("disable") {
            return self;
        }
        if self.is_enabled() {
            self.observers.disconnect::<E, H>(host);
            self.state = ScrollerState::Disabled;
            tracing::debug!(instance = ?self.instance, "scroller disabled");
        }
        self
    }

    /// Disable, then drop handlers and step bookkeeping.
    ///
    /// Only a fresh [`setup`](Self::setup) revives the scroller.
    pub fn destroy<H>(&mut self, host: &mut H) -> &mut Self
    where
        H: IntersectionService<E, Handle = W> + ?Sized,
    {
        if self.refuse_destroyed("destroy") {
            return self;
        }
        self.observers.disconnect::<E, H>(host);
        self.machine.clear();
        self.metrics.clear();
        self.state = ScrollerState::Destroyed;
        tracing::debug!(instance = ?self.instance, "scroller destroyed");
        self.instance = None;
        self
    }

    /// Route one intersection notification.
    pub fn handle_entry<H>(&mut self, host: &H, entry: &IntersectionEntry)
    where
        H: GeometryProvider<E> + ?Sized,
    {
        if !self.is_enabled() || !self.observers.is_live(entry.watch) {
            tracing::trace!(watch = ?entry.watch, "ignoring stale notification");
            return;
        }
        let direction = self.direction.update(host.scroll_y());
        let sample = Sample::new(entry, self.geometry.offset_margin, direction);
        let index = entry.watch.index;
        let kind = entry.watch.kind;
        let Some(trigger) = self
            .machine
            .states()
            .get(index)
            .and_then(|state| kind.classify(&sample, state))
        else {
            return;
        };
        tracing::trace!(watch = kind.name(), index, ?trigger, "step trigger");

        match trigger {
            Trigger::Enter(d) => self.machine.enter(index, d, true),
            Trigger::Exit(d) => self.machine.exit(index, d),
            Trigger::Skipped(d) => {
                self.machine.enter(index, d, true);
                self.machine.exit(index, d);
            }
            Trigger::Progress(ratio) => self.machine.progress(index, Some(ratio)),
        }
    }

    /// Route a batch of notifications in delivery order.
    pub fn handle_entries<H>(&mut self, host: &H, entries: &[IntersectionEntry])
    where
        H: GeometryProvider<E> + ?Sized,
    {
        for entry in entries {
            self.handle_entry(host, entry);
        }
    }

    fn rebuild<H>(&mut self, host: &mut H)
    where
        H: IntersectionService<E, Handle = W> + ?Sized,
    {
        let progress = self.options.progress.then_some(self.threshold);
        self.observers.build(
            host,
            self.machine.steps(),
            &self.metrics,
            &self.geometry,
            progress,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::sim::{ElementId, SimPage, SimScroller};
    use alloc::vec;
    use kurbo::Size;

    fn page() -> SimPage {
        SimPage::new(Size::new(800.0, 1000.0), 5000.0)
    }

    #[test]
    fn setup_enables_and_builds_four_watches_per_step() {
        let mut page = page();
        let steps = vec![page.add_step(1000.0, 300.0), page.add_step(1500.0, 300.0)];
        let mut s = SimScroller::new();
        s.setup(&mut page, Config::new(steps.clone()));
        assert_eq!(s.state(), ScrollerState::Enabled);
        assert_eq!(s.steps(), &steps[..]);
        assert_eq!(s.watch_count(), 8);
        assert_eq!(page.live_watches(), 8);
        assert_eq!(s.watch_kinds(), WatchKinds::TRIGGERS);
        assert!(s.diagnostics().is_empty());
        assert_eq!(
            s.step_metrics(),
            &[
                StepMetrics {
                    height: 300.0,
                    top: 1000.0
                },
                StepMetrics {
                    height: 300.0,
                    top: 1500.0
                }
            ]
        );
    }

    #[test]
    fn progress_mode_adds_fifth_watch() {
        let mut page = page();
        let step = page.add_step(1000.0, 300.0);
        let mut s = SimScroller::new();
        s.setup(&mut page, Config::new(vec![step]).with_progress(true));
        assert_eq!(s.watch_count(), 5);
        assert!(s.watch_kinds().contains(WatchKinds::STEP_PROGRESS));
    }

    #[test]
    fn empty_setup_stays_unconfigured_and_enable_is_refused() {
        let mut page = page();
        let mut s = SimScroller::new();
        s.setup(&mut page, Config::new(Vec::new()));
        assert_eq!(s.state(), ScrollerState::Unconfigured);
        assert_eq!(s.diagnostics(), &[ScrollerError::EmptySteps]);

        s.enable(&mut page);
        assert_eq!(s.state(), ScrollerState::Unconfigured);
        assert_eq!(s.watch_count(), 0);
        let last = s.diagnostics().last().cloned();
        assert_eq!(last, Some(ScrollerError::NotReady));
        assert_eq!(last.map(|e| e.kind()), Some(ErrorKind::Precondition));
    }

    #[test]
    fn query_selection_is_scoped_by_parent() {
        let mut page = page();
        let root = page.add_element(kurbo::Rect::new(0.0, 0.0, 800.0, 5000.0));
        let a = page.add_step(1000.0, 300.0);
        let b = page.add_step(1500.0, 300.0);
        page.set_class(a, "step");
        page.set_class(b, "step");
        page.set_parent(b, root);

        let mut s = SimScroller::new();
        s.setup(&mut page, Config::new(".step"));
        assert_eq!(s.steps(), &[a, b]);
        s.setup(&mut page, Config::new(".step").with_parent(root));
        assert_eq!(s.steps(), &[b]);
        // The first setup's watches were torn down.
        assert_eq!(page.live_watches(), 4);
    }

    #[test]
    fn scrollable_ancestor_is_reported_but_not_fatal() {
        let mut page = page();
        let a = page.add_step(1000.0, 300.0);
        page.set_in_scroll_container(a, true);
        let mut s = SimScroller::new();
        s.setup(&mut page, Config::new(StepSelector::Element(a)));
        assert_eq!(s.state(), ScrollerState::Enabled);
        assert_eq!(
            s.diagnostics(),
            &[ScrollerError::ScrollableAncestor { index: 0 }]
        );
    }

    #[test]
    fn offset_setter_applies_on_resize() {
        let mut page = page();
        let step = page.add_step(1000.0, 300.0);
        let mut s = SimScroller::new();
        s.setup(&mut page, Config::new(vec![step]));
        assert_eq!(s.geometry().offset_margin, 500.0);

        for o in [0.0, 0.25, 0.8, 1.0] {
            s.set_offset_trigger(o);
            assert_eq!(s.offset_trigger(), Offset::Percent(o));
            s.resize(&mut page);
            assert_eq!(s.geometry().offset_margin, o * 1000.0);
        }

        page.resize(Size::new(800.0, 600.0), 5000.0);
        s.resize(&mut page);
        assert_eq!(s.geometry().offset_margin, 600.0);

        s.set_offset_trigger("150px").resize(&mut page);
        assert_eq!(s.offset_trigger(), Offset::Pixels(150.0));
        assert_eq!(s.geometry().offset_margin, 150.0);
    }

    #[test]
    fn invalid_offsets_fall_back_with_a_report() {
        let mut page = page();
        let step = page.add_step(1000.0, 300.0);
        let mut s = SimScroller::new();
        s.setup(&mut page, Config::new(vec![step]).with_offset("middle"));
        assert_eq!(s.offset_trigger(), Offset::Percent(0.5));
        assert!(matches!(
            s.diagnostics(),
            [ScrollerError::UnsupportedOffsetFormat(_)]
        ));
        s.set_offset_trigger(3.0);
        assert_eq!(s.offset_trigger(), Offset::Percent(1.0));
        assert_eq!(s.take_diagnostics().len(), 2);
        assert!(s.diagnostics().is_empty());
    }

    fn boot<H>(host: &mut H, steps: Vec<ElementId>) -> Scroller<ElementId, H::Handle>
    where
        H: Host<ElementId> + ?Sized,
    {
        let mut s = Scroller::new();
        s.setup(host, Config::new(steps)).resize(host).enable(host);
        s
    }

    #[test]
    fn host_bound_is_enough_for_lifecycle() {
        let mut page = page();
        let step = page.add_step(1000.0, 300.0);
        let s = boot(&mut page, vec![step]);
        assert_eq!(s.state(), ScrollerState::Enabled);
        assert_eq!(page.live_watches(), 4);
    }

    #[test]
    fn once_record_starts_over_on_setup() {
        let mut page = page();
        let step = page.add_step(1000.0, 300.0);
        let hits = alloc::rc::Rc::new(core::cell::Cell::new(0));
        let mut s = SimScroller::new();
        for _ in 0..2 {
            page.scroll_to(0.0);
            s.setup(&mut page, Config::new(vec![step]).with_once(true));
            let h = hits.clone();
            s.on_step_enter(move |_, _| h.set(h.get() + 1));
            page.dispatch(&mut s);
            for y in [700.0, 1000.0, 700.0, 300.0, 700.0] {
                page.scroll_and_dispatch(y, &mut s);
            }
        }
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn missing_callback_keeps_previous() {
        let mut page = page();
        let step = page.add_step(1000.0, 300.0);
        let mut s = SimScroller::new();
        s.setup(&mut page, Config::new(vec![step]));
        let hits = alloc::rc::Rc::new(core::cell::Cell::new(0));
        let h = hits.clone();
        s.on_step_enter(move |_, _| h.set(h.get() + 1));
        s.replace_step_enter(None);
        assert_eq!(
            s.diagnostics(),
            &[ScrollerError::MissingCallback("onStepEnter")]
        );
        page.dispatch(&mut s);
        page.scroll_and_dispatch(700.0, &mut s);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn disable_and_enable_cycle_watches() {
        let mut page = page();
        let step = page.add_step(1000.0, 300.0);
        let mut s = SimScroller::new();
        s.setup(&mut page, Config::new(vec![step]));
        let before = page.live_watches();

        s.disable(&mut page);
        assert_eq!(s.state(), ScrollerState::Disabled);
        assert_eq!(page.live_watches(), 0);

        s.enable(&mut page).enable(&mut page);
        assert_eq!(s.state(), ScrollerState::Enabled);
        assert_eq!(page.live_watches(), before);
        assert!(s.diagnostics().is_empty());
    }

    #[test]
    fn resize_rebuilds_only_when_enabled() {
        let mut page = page();
        let step = page.add_step(1000.0, 300.0);
        let mut s = SimScroller::new();
        s.setup(&mut page, Config::new(vec![step]));
        s.disable(&mut page);
        page.set_rect(step, kurbo::Rect::new(0.0, 1200.0, 800.0, 1600.0));
        s.resize(&mut page);
        assert_eq!(page.live_watches(), 0);
        assert_eq!(s.step_metrics()[0].height, 400.0);

        s.enable(&mut page);
        s.resize(&mut page);
        assert_eq!(page.live_watches(), 4);
    }

    #[test]
    fn destroy_is_terminal_until_setup() {
        let mut page = page();
        let step = page.add_step(1000.0, 300.0);
        let mut s = SimScroller::new();
        s.setup(&mut page, Config::new(vec![step]));
        s.destroy(&mut page);
        assert_eq!(s.state(), ScrollerState::Destroyed);
        assert_eq!(page.live_watches(), 0);
        assert!(s.steps().is_empty());

        s.enable(&mut page).resize(&mut page).disable(&mut page);
        s.on_step_exit(|_, _| {});
        assert_eq!(s.state(), ScrollerState::Destroyed);
        assert_eq!(page.live_watches(), 0);
        assert!(
            s.diagnostics()
                .iter()
                .all(|e| matches!(e, ScrollerError::Destroyed(_)))
        );
        assert_eq!(s.diagnostics().len(), 4);

        s.setup(&mut page, Config::new(vec![step]));
        assert_eq!(s.state(), ScrollerState::Enabled);
    }

    #[test]
    fn threshold_is_at_least_one() {
        let mut page = page();
        let step = page.add_step(1000.0, 3.0);
        let mut s = SimScroller::new();
        s.setup(
            &mut page,
            Config::new(vec![step]).with_progress(true).with_threshold(0),
        );
        assert_eq!(s.watch_count(), 5);
        assert!(s.diagnostics().is_empty());
    }
}
