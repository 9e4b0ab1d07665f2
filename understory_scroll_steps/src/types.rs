// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for scroll steps: directions, per-step state, and event payloads.
//!
//! ## Overview
//!
//! These types are what downstream code observes. Enter and exit callbacks
//! receive a [`StepEvent`] plus the full [`StepState`] slice; progress callbacks
//! receive a [`ProgressEvent`]. The payload shapes are stable.

/// Scroll direction, derived from the change in vertical scroll position.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    /// Scroll position decreased (content moves down, reader moves up).
    Up,
    /// Scroll position increased.
    Down,
}

impl Direction {
    /// Lowercase name, as used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// Lifecycle of a single step with respect to the trigger line.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum StepLifecycle {
    /// No enter or exit has been delivered yet.
    #[default]
    Untriggered,
    /// Between a delivered enter and its matching exit.
    Entered,
    /// Most recent transition was an exit.
    Exited,
}

/// Mutable state tracked for each step.
///
/// Owned by the step state machine and handed to callbacks read-only.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StepState {
    /// Direction of the most recent enter or exit, if any.
    pub direction: Option<Direction>,
    /// Where the step is in its enter/exit lifecycle.
    pub lifecycle: StepLifecycle,
    /// Fraction of the step that has passed the trigger line, in `[0, 1]`.
    pub progress: f64,
}

impl StepState {
    /// True while the step sits between an enter and its exit.
    pub fn is_entered(&self) -> bool {
        self.lifecycle == StepLifecycle::Entered
    }
}

/// Payload delivered to enter and exit callbacks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepEvent<E> {
    /// The step element.
    pub element: E,
    /// Stable index of the step (position in the step sequence).
    pub index: usize,
    /// Direction associated with this transition.
    pub direction: Direction,
}

/// Payload delivered to progress callbacks.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressEvent<E> {
    /// The step element.
    pub element: E,
    /// Stable index of the step.
    pub index: usize,
    /// Current progress of the step, in `[0, 1]`.
    pub progress: f64,
}

/// Lifecycle state of a [`Scroller`](crate::scroller::Scroller).
///
/// `Unconfigured → Ready → Enabled ⇄ Disabled → Destroyed`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ScrollerState {
    /// No successful `setup` yet.
    #[default]
    Unconfigured,
    /// Configured, watches not yet built.
    Ready,
    /// Watches are live and notifications are acted on.
    Enabled,
    /// Watches are disconnected; state is retained for re-enabling.
    Disabled,
    /// Terminal until a fresh `setup`.
    Destroyed,
}

impl ScrollerState {
    /// True once `setup` succeeded and before `destroy`.
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready | Self::Enabled | Self::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_untriggered() {
        let s = StepState::default();
        assert_eq!(s.direction, None);
        assert_eq!(s.lifecycle, StepLifecycle::Untriggered);
        assert_eq!(s.progress, 0.0);
        assert!(!s.is_entered());
    }

    #[test]
    fn readiness_excludes_unconfigured_and_destroyed() {
        assert!(!ScrollerState::Unconfigured.is_ready());
        assert!(ScrollerState::Ready.is_ready());
        assert!(ScrollerState::Enabled.is_ready());
        assert!(ScrollerState::Disabled.is_ready());
        assert!(!ScrollerState::Destroyed.is_ready());
    }
}
