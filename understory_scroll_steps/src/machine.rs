// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Step state machine: the single authority over [`StepState`] and callbacks.
//!
//! ## Ordering
//!
//! Native intersection notifications do not arrive in reading order when
//! several steps change in one frame, and a fast scroll can carry a step past
//! the trigger without any crossing being observed. With ordering enabled, a
//! genuine enter first settles every step that should already have
//! transitioned:
//!
//! - Entering downward walks the steps above (ascending). An entered step is
//!   exited; one that never passed downward gets a synthetic enter/exit pair.
//! - Entering upward walks the steps below (descending). An entered step is
//!   exited; one whose last direction is still down gets a synthetic pair.
//!
//! ```
//! use understory_scroll_steps::machine::{MachineOptions, StepMachine};
//! use understory_scroll_steps::types::Direction;
//! use std::{cell::RefCell, rc::Rc};
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let mut m = StepMachine::new(vec!["a", "b", "c"], MachineOptions::default());
//! let l = log.clone();
//! m.set_on_enter(Box::new(move |e, _| l.borrow_mut().push(("enter", e.index))));
//! let l = log.clone();
//! m.set_on_exit(Box::new(move |e, _| l.borrow_mut().push(("exit", e.index))));
//!
//! // Step 2 fires first; steps 0 and 1 are backfilled in reading order.
//! m.enter(2, Direction::Down, true);
//! assert_eq!(
//!     *log.borrow(),
//!     [("enter", 0), ("exit", 0), ("enter", 1), ("exit", 1), ("enter", 2)]
//! );
//! ```

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use crate::debug::{self, InstanceId};
use crate::types::{Direction, ProgressEvent, StepEvent, StepLifecycle, StepState};

/// Handler for enter and exit transitions.
pub type StepCallback<E> = Box<dyn FnMut(&StepEvent<E>, &[StepState])>;

/// Handler for progress updates.
pub type ProgressCallback<E> = Box<dyn FnMut(&ProgressEvent<E>)>;

/// Behavior switches for the state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MachineOptions {
    /// Report progress while a step is entered.
    pub progress: bool,
    /// Backfill skipped steps so enters arrive in reading order.
    pub order: bool,
    /// Deliver each step's enter callback at most once.
    pub once: bool,
    /// Trace debug markers on enter/exit.
    pub debug: bool,
}

impl Default for MachineOptions {
    fn default() -> Self {
        Self {
            progress: false,
            order: true,
            once: false,
            debug: false,
        }
    }
}

struct Callbacks<E> {
    enter: StepCallback<E>,
    exit: StepCallback<E>,
    progress: ProgressCallback<E>,
}

impl<E> Default for Callbacks<E> {
    fn default() -> Self {
        Self {
            enter: Box::new(|_, _| {}),
            exit: Box::new(|_, _| {}),
            progress: Box::new(|_| {}),
        }
    }
}

/// Per-step lifecycle, progress, and callback dispatch.
pub struct StepMachine<E> {
    steps: Vec<E>,
    states: Vec<StepState>,
    // Steps whose enter callback has fired under `once`.
    excluded: Vec<bool>,
    options: MachineOptions,
    callbacks: Callbacks<E>,
    instance: Option<InstanceId>,
}

impl<E> core::fmt::Debug for StepMachine<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StepMachine")
            .field("steps", &self.steps.len())
            .field("states", &self.states)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<E> Default for StepMachine<E> {
    fn default() -> Self {
        Self::new(Vec::new(), MachineOptions::default())
    }
}

impl<E> StepMachine<E> {
    /// Create a machine for `steps`, indexed by position, with no-op callbacks.
    pub fn new(steps: Vec<E>, options: MachineOptions) -> Self {
        let n = steps.len();
        Self {
            steps,
            states: vec![StepState::default(); n],
            excluded: vec![false; n],
            options,
            callbacks: Callbacks::default(),
            instance: None,
        }
    }

    /// Attach the instance whose debug markers should be traced.
    pub fn set_instance(&mut self, id: InstanceId) {
        self.instance = Some(id);
    }

    /// Active options.
    pub fn options(&self) -> MachineOptions {
        self.options
    }

    /// Step elements in index order.
    pub fn steps(&self) -> &[E] {
        &self.steps
    }

    /// Per-step states in index order.
    pub fn states(&self) -> &[StepState] {
        &self.states
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when there are no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Replace the enter handler.
    pub fn set_on_enter(&mut self, f: StepCallback<E>) {
        self.callbacks.enter = f;
    }

    /// Replace the exit handler.
    pub fn set_on_exit(&mut self, f: StepCallback<E>) {
        self.callbacks.exit = f;
    }

    /// Replace the progress handler.
    pub fn set_on_progress(&mut self, f: ProgressCallback<E>) {
        self.callbacks.progress = f;
    }

    /// Reset all handlers to no-ops.
    pub fn reset_callbacks(&mut self) {
        self.callbacks = Callbacks::default();
    }

    /// Drop all steps, state, and handlers.
    pub fn clear(&mut self) {
        self.steps.clear();
        self.states.clear();
        self.excluded.clear();
        self.reset_callbacks();
        self.instance = None;
    }
}

impl<E: Clone> StepMachine<E> {
    /// Mark step `index` entered and notify.
    ///
    /// `check` is false for synthetic enters produced by the ordering pass,
    /// which must not recurse into another pass.
    pub fn enter(&mut self, index: usize, direction: Direction, check: bool) {
        let Some(state) = self.states.get_mut(index) else {
            return;
        };
        state.direction = Some(direction);
        state.lifecycle = StepLifecycle::Entered;

        if self.options.order && check {
            self.settle_others(index, direction);
        }

        if !self.excluded[index] {
            let event = StepEvent {
                element: self.steps[index].clone(),
                index,
                direction,
            };
            (self.callbacks.enter)(&event, &self.states);
            if let Some(id) = self.instance.filter(|_| self.options.debug) {
                debug::trace_step(id, index, true);
            }
            if self.options.once {
                self.excluded[index] = true;
            }
        }

        if self.options.progress {
            self.progress(index, None);
        }
    }

    /// Mark step `index` exited and notify.
    ///
    /// In progress mode the step's progress is first pinned to `1` when
    /// leaving downward or `0` when leaving upward.
    pub fn exit(&mut self, index: usize, direction: Direction) {
        let Some(progress) = self.states.get(index).map(|s| s.progress) else {
            return;
        };
        if self.options.progress {
            match direction {
                Direction::Down if progress < 1.0 => self.progress(index, Some(1.0)),
                Direction::Up if progress > 0.0 => self.progress(index, Some(0.0)),
                _ => {}
            }
        }

        let state = &mut self.states[index];
        state.direction = Some(direction);
        state.lifecycle = StepLifecycle::Exited;

        let event = StepEvent {
            element: self.steps[index].clone(),
            index,
            direction,
        };
        (self.callbacks.exit)(&event, &self.states);
        if let Some(id) = self.instance.filter(|_| self.options.debug) {
            debug::trace_step(id, index, false);
        }
    }

    /// Record a new progress ratio (if any) and notify while entered.
    pub fn progress(&mut self, index: usize, ratio: Option<f64>) {
        let Some(state) = self.states.get_mut(index) else {
            return;
        };
        if let Some(r) = ratio {
            state.progress = r.clamp(0.0, 1.0);
        }
        if state.is_entered() {
            let event = ProgressEvent {
                element: self.steps[index].clone(),
                index,
                progress: state.progress,
            };
            (self.callbacks.progress)(&event);
        }
    }

    fn settle_others(&mut self, index: usize, direction: Direction) {
        match direction {
            Direction::Down => {
                for i in 0..index {
                    let ss = self.states[i];
                    if !ss.is_entered() && ss.direction != Some(Direction::Down) {
                        self.enter(i, Direction::Down, false);
                        self.exit(i, Direction::Down);
                    } else if ss.is_entered() {
                        self.exit(i, Direction::Down);
                    }
                }
            }
            Direction::Up => {
                for i in (index + 1..self.states.len()).rev() {
                    if self.states[i].is_entered() {
                        self.exit(i, Direction::Up);
                    }
                    // Re-read: the exit above rewrites the direction.
                    if self.states[i].direction == Some(Direction::Down) {
                        self.enter(i, Direction::Up, false);
                        self.exit(i, Direction::Up);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::RefCell;

    #[derive(Clone, Debug, PartialEq)]
    enum Ev {
        Enter(usize, Direction),
        Exit(usize, Direction),
        Progress(usize, f64),
    }

    fn machine(n: usize, options: MachineOptions) -> (StepMachine<usize>, Rc<RefCell<Vec<Ev>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut m = StepMachine::new((0..n).collect(), options);
        let l = log.clone();
        m.set_on_enter(Box::new(move |e, _| {
            l.borrow_mut().push(Ev::Enter(e.index, e.direction));
        }));
        let l = log.clone();
        m.set_on_exit(Box::new(move |e, _| {
            l.borrow_mut().push(Ev::Exit(e.index, e.direction));
        }));
        let l = log.clone();
        m.set_on_progress(Box::new(move |e| {
            l.borrow_mut().push(Ev::Progress(e.index, e.progress));
        }));
        (m, log)
    }

    #[test]
    fn downward_enter_backfills_steps_above_in_order() {
        let (mut m, log) = machine(3, MachineOptions::default());
        m.enter(2, Direction::Down, true);
        assert_eq!(
            *log.borrow(),
            vec![
                Ev::Enter(0, Direction::Down),
                Ev::Exit(0, Direction::Down),
                Ev::Enter(1, Direction::Down),
                Ev::Exit(1, Direction::Down),
                Ev::Enter(2, Direction::Down),
            ]
        );
        assert!(m.states()[2].is_entered());
        assert_eq!(m.states()[1].lifecycle, StepLifecycle::Exited);
    }

    #[test]
    fn downward_enter_exits_a_lingering_step() {
        let (mut m, log) = machine(3, MachineOptions::default());
        m.enter(0, Direction::Down, true);
        m.enter(1, Direction::Down, true);
        assert_eq!(
            *log.borrow(),
            vec![
                Ev::Enter(0, Direction::Down),
                Ev::Exit(0, Direction::Down),
                Ev::Enter(1, Direction::Down),
            ]
        );
    }

    #[test]
    fn upward_enter_backfills_steps_below_in_reverse() {
        let (mut m, log) = machine(4, MachineOptions::default());
        // Pass all four steps downward.
        m.enter(3, Direction::Down, true);
        m.exit(3, Direction::Down);
        log.borrow_mut().clear();

        // Jump back up to step 0: 3, 2, 1 are replayed upward, last first.
        m.enter(0, Direction::Up, true);
        assert_eq!(
            *log.borrow(),
            vec![
                Ev::Enter(3, Direction::Up),
                Ev::Exit(3, Direction::Up),
                Ev::Enter(2, Direction::Up),
                Ev::Exit(2, Direction::Up),
                Ev::Enter(1, Direction::Up),
                Ev::Exit(1, Direction::Up),
                Ev::Enter(0, Direction::Up),
            ]
        );
    }

    #[test]
    fn upward_enter_only_exits_an_entered_step() {
        let (mut m, log) = machine(2, MachineOptions::default());
        m.enter(1, Direction::Down, true);
        log.borrow_mut().clear();
        m.enter(0, Direction::Up, true);
        // Step 1 was entered downward; the exit flips its direction to up, so no
        // synthetic pair follows.
        assert_eq!(
            *log.borrow(),
            vec![Ev::Exit(1, Direction::Up), Ev::Enter(0, Direction::Up)]
        );
    }

    #[test]
    fn no_backfill_without_order() {
        let options = MachineOptions {
            order: false,
            ..MachineOptions::default()
        };
        let (mut m, log) = machine(3, options);
        m.enter(2, Direction::Down, true);
        assert_eq!(*log.borrow(), vec![Ev::Enter(2, Direction::Down)]);
    }

    #[test]
    fn once_suppresses_repeat_enters_but_not_exits() {
        let options = MachineOptions {
            once: true,
            ..MachineOptions::default()
        };
        let (mut m, log) = machine(1, options);
        for _ in 0..3 {
            m.enter(0, Direction::Down, true);
            m.exit(0, Direction::Down);
        }
        assert_eq!(
            *log.borrow(),
            vec![
                Ev::Enter(0, Direction::Down),
                Ev::Exit(0, Direction::Down),
                Ev::Exit(0, Direction::Down),
                Ev::Exit(0, Direction::Down),
            ]
        );
        // The lifecycle itself still tracks every transition.
        assert_eq!(m.states()[0].lifecycle, StepLifecycle::Exited);
    }

    #[test]
    fn progress_is_pinned_on_exit_and_silent_outside() {
        let options = MachineOptions {
            progress: true,
            ..MachineOptions::default()
        };
        let (mut m, log) = machine(1, options);
        m.progress(0, Some(0.3));
        assert!(log.borrow().is_empty());

        m.enter(0, Direction::Down, true);
        m.progress(0, Some(0.6));
        m.exit(0, Direction::Down);
        m.progress(0, Some(0.2));
        assert_eq!(
            *log.borrow(),
            vec![
                Ev::Enter(0, Direction::Down),
                Ev::Progress(0, 0.3),
                Ev::Progress(0, 0.6),
                Ev::Progress(0, 1.0),
                Ev::Exit(0, Direction::Down),
            ]
        );

        log.borrow_mut().clear();
        m.enter(0, Direction::Up, true);
        m.exit(0, Direction::Up);
        assert_eq!(
            *log.borrow(),
            vec![
                Ev::Enter(0, Direction::Up),
                Ev::Progress(0, 0.2),
                Ev::Progress(0, 0.0),
                Ev::Exit(0, Direction::Up),
            ]
        );
    }

    #[test]
    fn callbacks_see_updated_state_slice() {
        let mut m = StepMachine::new(vec!['x', 'y'], MachineOptions::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        m.set_on_enter(Box::new(move |e, states| {
            s.borrow_mut().push((e.element, states[e.index].lifecycle));
        }));
        m.enter(1, Direction::Down, false);
        assert_eq!(*seen.borrow(), vec![('y', StepLifecycle::Entered)]);
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let (mut m, log) = machine(1, MachineOptions::default());
        m.enter(5, Direction::Down, true);
        m.exit(5, Direction::Down);
        m.progress(5, Some(0.5));
        assert!(log.borrow().is_empty());
    }
}
