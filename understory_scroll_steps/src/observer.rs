// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observer set: five intersection watches per step and their trigger rules.
//!
//! ## Watch kinds
//!
//! Every step is watched five ways, each with its own root margin around the
//! viewport:
//!
//! - [`StepAbove`](WatchKind::StepAbove): entering while scrolling down,
//!   exiting while scrolling up.
//! - [`StepBelow`](WatchKind::StepBelow): entering while scrolling up,
//!   exiting while scrolling down.
//! - [`ViewportAbove`](WatchKind::ViewportAbove) and
//!   [`ViewportBelow`](WatchKind::ViewportBelow): fallbacks for steps a fast
//!   scroll carried straight past the trigger band. They report a skipped
//!   enter/exit pair.
//! - [`StepProgress`](WatchKind::StepProgress): graduated thresholds so the
//!   intersection ratio can be reported as progress. Only built in progress
//!   mode.
//!
//! Margins are derived from [`Geometry`] and the step's [`StepMetrics`] by one
//! table of [`WatchProfile`]s; the same table holds the classification rule for
//! each kind.
//!
//! ## Rebuilding
//!
//! [`ObserverSet::build`] always disconnects the previous bundle before
//! creating a new one under a fresh generation, so at most one set of watches
//! per step is ever live. Generations are unique across all sets in the
//! process, which lets several scrollers share one notification queue.

use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, Ordering};

use kurbo::Insets;

use crate::geometry::{Geometry, StepMetrics};
use crate::host::{IntersectionEntry, IntersectionService, WatchId, WatchOptions};
use crate::types::{Direction, StepState};

/// The five watch kinds, in creation order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum WatchKind {
    /// Fallback for downward scrolls that jump past the trigger band.
    ViewportAbove,
    /// Fallback for upward scrolls that jump past the trigger band.
    ViewportBelow,
    /// Trigger band seen from above.
    StepAbove,
    /// Trigger band seen from below.
    StepBelow,
    /// Graduated watch feeding progress.
    StepProgress,
}

bitflags::bitflags! {
    /// A set of [`WatchKind`]s.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct WatchKinds: u8 {
        /// [`WatchKind::ViewportAbove`].
        const VIEWPORT_ABOVE = 0b0000_0001;
        /// [`WatchKind::ViewportBelow`].
        const VIEWPORT_BELOW = 0b0000_0010;
        /// [`WatchKind::StepAbove`].
        const STEP_ABOVE     = 0b0000_0100;
        /// [`WatchKind::StepBelow`].
        const STEP_BELOW     = 0b0000_1000;
        /// [`WatchKind::StepProgress`].
        const STEP_PROGRESS  = 0b0001_0000;
        /// The four kinds built in every mode.
        const TRIGGERS = Self::VIEWPORT_ABOVE.bits()
            | Self::VIEWPORT_BELOW.bits()
            | Self::STEP_ABOVE.bits()
            | Self::STEP_BELOW.bits();
    }
}

impl WatchKinds {
    /// Kinds to build for the given mode.
    pub fn for_mode(progress: bool) -> Self {
        if progress {
            Self::TRIGGERS | Self::STEP_PROGRESS
        } else {
            Self::TRIGGERS
        }
    }
}

impl WatchKind {
    /// All kinds in creation order.
    pub const ALL: [Self; 5] = [
        Self::ViewportAbove,
        Self::ViewportBelow,
        Self::StepAbove,
        Self::StepBelow,
        Self::StepProgress,
    ];

    /// Camel-case name, as used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ViewportAbove => "viewportAbove",
            Self::ViewportBelow => "viewportBelow",
            Self::StepAbove => "stepAbove",
            Self::StepBelow => "stepBelow",
            Self::StepProgress => "stepProgress",
        }
    }

    /// The single-kind set for this kind.
    pub const fn flag(self) -> WatchKinds {
        match self {
            Self::ViewportAbove => WatchKinds::VIEWPORT_ABOVE,
            Self::ViewportBelow => WatchKinds::VIEWPORT_BELOW,
            Self::StepAbove => WatchKinds::STEP_ABOVE,
            Self::StepBelow => WatchKinds::STEP_BELOW,
            Self::StepProgress => WatchKinds::STEP_PROGRESS,
        }
    }

    fn profile(self) -> &'static WatchProfile {
        match self {
            Self::ViewportAbove => &PROFILES[0],
            Self::ViewportBelow => &PROFILES[1],
            Self::StepAbove => &PROFILES[2],
            Self::StepBelow => &PROFILES[3],
            Self::StepProgress => &PROFILES[4],
        }
    }

    /// Root margin for a step under this kind.
    pub fn root_margin(self, geometry: &Geometry, step: &StepMetrics) -> Insets {
        let (top, bottom) = (self.profile().margins)(geometry, step);
        Insets::new(0.0, top, 0.0, bottom)
    }

    /// Apply this kind's rule to a notification.
    pub fn classify(self, sample: &Sample, state: &StepState) -> Option<Trigger> {
        (self.profile().classify)(sample, state)
    }
}

/// What a classified notification asks the state machine to do.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Trigger {
    /// Enter the step, applying ordering backfill.
    Enter(Direction),
    /// Exit the step.
    Exit(Direction),
    /// The step was skipped: enter (with backfill) and immediately exit.
    Skipped(Direction),
    /// Report progress with the given ratio.
    Progress(f64),
}

/// A notification reduced to what the trigger rules look at.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    /// Whether the target intersects the expanded root.
    pub is_intersecting: bool,
    /// Reported intersection ratio.
    pub ratio: f64,
    /// Target top edge relative to the trigger line; negative is above it.
    pub top_adjusted: f64,
    /// Target bottom edge relative to the trigger line.
    pub bottom_adjusted: f64,
    /// Current scroll direction.
    pub direction: Direction,
}

impl Sample {
    /// Reduce an entry against the trigger line at `offset_margin`.
    pub fn new(entry: &IntersectionEntry, offset_margin: f64, direction: Direction) -> Self {
        Self {
            is_intersecting: entry.is_intersecting,
            ratio: entry.intersection_ratio,
            top_adjusted: entry.bounding_rect.y0 - offset_margin,
            bottom_adjusted: entry.bounding_rect.y1 - offset_margin,
            direction,
        }
    }

    fn straddles_trigger(&self) -> bool {
        self.top_adjusted <= 0.0 && self.bottom_adjusted >= 0.0
    }
}

/// Margin profile and trigger rule for one watch kind.
///
/// `margins` returns `(top, bottom)` insets given viewport geometry and the
/// step's metrics.
#[derive(Copy, Clone)]
pub struct WatchProfile {
    /// Kind described by this profile.
    pub kind: WatchKind,
    margins: fn(&Geometry, &StepMetrics) -> (f64, f64),
    graduated: bool,
    classify: fn(&Sample, &StepState) -> Option<Trigger>,
}

impl core::fmt::Debug for WatchProfile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WatchProfile")
            .field("kind", &self.kind)
            .field("graduated", &self.graduated)
            .finish_non_exhaustive()
    }
}

// Operand order is significant; keep these expressions as written so the
// margins stay bit-identical.
static PROFILES: [WatchProfile; 5] = [
    WatchProfile {
        kind: WatchKind::ViewportAbove,
        margins: |g, s| {
            (
                g.page_height - s.top,
                g.offset_margin - g.viewport_height - s.height,
            )
        },
        graduated: false,
        classify: |x, ss| {
            (x.is_intersecting
                && x.direction == Direction::Down
                && ss.direction != Some(Direction::Down)
                && !ss.is_entered())
            .then_some(Trigger::Skipped(Direction::Down))
        },
    },
    WatchProfile {
        kind: WatchKind::ViewportBelow,
        margins: |g, s| {
            (
                -g.offset_margin - s.height,
                g.offset_margin - g.viewport_height + s.height + g.page_height,
            )
        },
        graduated: false,
        classify: |x, ss| {
            (x.is_intersecting
                && x.direction == Direction::Up
                && ss.direction == Some(Direction::Down)
                && !ss.is_entered())
            .then_some(Trigger::Skipped(Direction::Up))
        },
    },
    WatchProfile {
        kind: WatchKind::StepAbove,
        margins: |g, s| {
            (
                -g.offset_margin + s.height,
                g.offset_margin - g.viewport_height,
            )
        },
        graduated: false,
        classify: |x, ss| {
            if x.is_intersecting
                && x.straddles_trigger()
                && x.direction == Direction::Down
                && !ss.is_entered()
            {
                Some(Trigger::Enter(x.direction))
            } else if !x.is_intersecting
                && x.top_adjusted > 0.0
                && x.direction == Direction::Up
                && ss.is_entered()
            {
                Some(Trigger::Exit(x.direction))
            } else {
                None
            }
        },
    },
    WatchProfile {
        kind: WatchKind::StepBelow,
        margins: |g, s| {
            (
                -g.offset_margin,
                g.offset_margin - g.viewport_height + s.height,
            )
        },
        graduated: false,
        classify: |x, ss| {
            if x.is_intersecting
                && x.straddles_trigger()
                && x.direction == Direction::Up
                && !ss.is_entered()
            {
                Some(Trigger::Enter(x.direction))
            } else if !x.is_intersecting
                && x.bottom_adjusted < 0.0
                && x.direction == Direction::Down
                && ss.is_entered()
            {
                Some(Trigger::Exit(x.direction))
            } else {
                None
            }
        },
    },
    WatchProfile {
        kind: WatchKind::StepProgress,
        margins: |g, s| {
            (
                s.height - g.offset_margin,
                -g.viewport_height + g.offset_margin,
            )
        },
        graduated: true,
        classify: |x, _| {
            (x.is_intersecting && x.bottom_adjusted >= 0.0).then_some(Trigger::Progress(x.ratio))
        },
    },
];

/// Threshold ladder for a progress watch: one breakpoint per `granularity`
/// pixels of step height.
///
/// ```
/// use understory_scroll_steps::observer::progress_thresholds;
///
/// assert_eq!(progress_thresholds(10.0, 4), vec![0.0, 1.0 / 3.0, 2.0 * (1.0 / 3.0)]);
/// assert!(progress_thresholds(0.0, 4).is_empty());
/// ```
pub fn progress_thresholds(height: f64, granularity: u32) -> Vec<f64> {
    let count = ceil_count(height / f64::from(granularity.max(1)));
    let ratio = 1.0 / count as f64;
    (0..count).map(|i| i as f64 * ratio).collect()
}

fn ceil_count(x: f64) -> usize {
    if x.is_nan() || x <= 0.0 {
        return 0;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Step heights are far below usize::MAX; saturation is acceptable."
    )]
    let whole = x as usize;
    if (whole as f64) < x { whole + 1 } else { whole }
}

/// The live bundle of watches for every step.
#[derive(Debug)]
pub struct ObserverSet<H> {
    generation: u32,
    kinds: WatchKinds,
    step_count: usize,
    live: Vec<H>,
}

impl<H: Copy> Default for ObserverSet<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Copy> ObserverSet<H> {
    /// Create an empty, disconnected set.
    pub fn new() -> Self {
        Self {
            generation: 0,
            kinds: WatchKinds::empty(),
            step_count: 0,
            live: Vec::new(),
        }
    }

    /// Generation of the current (or most recent) bundle; `0` before the first
    /// build.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Number of live watches.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// True when no watch is live.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Kinds in the live bundle (empty when disconnected).
    pub fn kinds(&self) -> WatchKinds {
        if self.live.is_empty() {
            WatchKinds::empty()
        } else {
            self.kinds
        }
    }

    /// Whether notifications tagged `id` should be acted on.
    pub fn is_live(&self, id: WatchId) -> bool {
        !self.live.is_empty()
            && id.generation == self.generation
            && self.kinds.contains(id.kind.flag())
            && id.index < self.step_count
    }

    /// Tear down and recreate watches for every step.
    ///
    /// `progress` carries the threshold granularity when progress mode is on.
    pub fn build<E, S>(
        &mut self,
        service: &mut S,
        steps: &[E],
        metrics: &[StepMetrics],
        geometry: &Geometry,
        progress: Option<u32>,
    ) where
        S: IntersectionService<E, Handle = H> + ?Sized,
    {
        static NEXT_GENERATION: AtomicU32 = AtomicU32::new(1);

        self.disconnect::<E, S>(service);
        self.generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        self.kinds = WatchKinds::for_mode(progress.is_some());
        self.step_count = steps.len();

        for kind in WatchKind::ALL {
            if !self.kinds.contains(kind.flag()) {
                continue;
            }
            let profile = kind.profile();
            for (index, (el, m)) in steps.iter().zip(metrics).enumerate() {
                let thresholds = match progress {
                    Some(granularity) if profile.graduated => {
                        progress_thresholds(m.height, granularity)
                    }
                    _ => alloc::vec![0.0],
                };
                let options = WatchOptions {
                    id: WatchId {
                        kind,
                        index,
                        generation: self.generation,
                    },
                    root_margin: kind.root_margin(geometry, m),
                    thresholds,
                };
                self.live.push(service.observe(el, options));
            }
        }
        tracing::debug!(
            generation = self.generation,
            watches = self.live.len(),
            "built step watches"
        );
    }

    /// Disconnect every live watch.
    pub fn disconnect<E, S>(&mut self, service: &mut S)
    where
        S: IntersectionService<E, Handle = H> + ?Sized,
    {
        for handle in self.live.drain(..) {
            service.disconnect(handle);
        }
    }
}
