// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll direction tracking.

use crate::types::Direction;

/// Classifies scroll movement from successive scroll positions.
///
/// Starts out pointing [`Down`](Direction::Down) at position `0`. An unchanged
/// position keeps the previous direction.
///
/// ```
/// use understory_scroll_steps::direction::DirectionTracker;
/// use understory_scroll_steps::types::Direction;
///
/// let mut t = DirectionTracker::new();
/// assert_eq!(t.update(120.0), Direction::Down);
/// assert_eq!(t.update(80.0), Direction::Up);
/// assert_eq!(t.update(80.0), Direction::Up);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirectionTracker {
    previous_y: f64,
    direction: Direction,
}

impl Default for DirectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectionTracker {
    /// Create a tracker at position `0`, direction down.
    pub const fn new() -> Self {
        Self {
            previous_y: 0.0,
            direction: Direction::Down,
        }
    }

    /// Most recently classified direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Record `scroll_y` and return the resulting direction.
    pub fn update(&mut self, scroll_y: f64) -> Direction {
        if scroll_y > self.previous_y {
            self.direction = Direction::Down;
        } else if scroll_y < self.previous_y {
            self.direction = Direction::Up;
        }
        self.previous_y = scroll_y;
        self.direction
    }
}
