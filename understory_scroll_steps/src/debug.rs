// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instance identifiers and debug markers.
//!
//! Overlay rendering is left to the host. In debug mode the scroller emits
//! `tracing` events naming the marker ids an overlay would use, so a host can
//! draw the trigger line and highlight entered steps.

use alloc::format;
use alloc::string::String;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::geometry::Geometry;

/// Identifier of one scroller instance; distinct per `setup`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct InstanceId(u32);

impl InstanceId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "steps{}", self.0)
    }
}

/// Id of the trigger-line marker for an instance.
pub fn offset_marker_id(id: InstanceId) -> String {
    format!("scroll-steps__debug-offset--{id}")
}

/// Ids of the above/below band markers of one step.
pub fn step_marker_ids(id: InstanceId, index: usize) -> [String; 2] {
    let prefix = format!("scroll-steps__debug-step--{id}-{index}");
    [format!("{prefix}_above"), format!("{prefix}_below")]
}

pub(crate) fn trace_offset(id: InstanceId, geometry: &Geometry) {
    tracing::debug!(
        marker = %offset_marker_id(id),
        top = geometry.offset_margin,
        "trigger: {}{}",
        geometry.offset.value(),
        geometry.offset.suffix()
    );
}

pub(crate) fn trace_step(id: InstanceId, index: usize, entered: bool) {
    let [above, below] = step_marker_ids(id, index);
    tracing::debug!(
        %above,
        %below,
        display = if entered { "block" } else { "none" },
        "step marker"
    );
}
