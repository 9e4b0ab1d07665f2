// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics reported by the scroller.
//!
//! No scroller operation fails outright. Problems are reported on the
//! `tracing` channel and recorded in
//! [`Scroller::diagnostics`](crate::scroller::Scroller::diagnostics); the
//! operation then either does nothing or falls back to a safe default.

use alloc::string::String;

/// Broad category of a [`ScrollerError`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Bad input from the caller. The operation is ignored or uses a default.
    Configuration,
    /// The host page is in a shape the engine cannot measure reliably.
    Environment,
    /// A lifecycle call arrived in a state that does not allow it.
    Precondition,
}

/// A reported problem.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ScrollerError {
    /// `setup` resolved no step elements.
    #[error("no step elements")]
    EmptySteps,
    /// Percent offset outside `[0, 1]`; the value was clamped.
    #[error("offset value {value} is outside [0, 1]. Fallback to {clamped}.")]
    OffsetOutOfRange {
        /// Requested value.
        value: f64,
        /// Value actually used.
        clamped: f64,
    },
    /// A `px` literal whose number could not be parsed.
    #[error("offset value must be in 'px' format, got {0:?}. Fallback to 0.5.")]
    InvalidPixelOffset(String),
    /// An offset literal that is neither a fraction nor a `px` value.
    #[error("offset value does not include 'px', got {0:?}. Fallback to 0.5.")]
    UnsupportedOffsetFormat(String),
    /// A callback replacement was requested without a handler.
    #[error("{0} requires a function")]
    MissingCallback(&'static str),
    /// A step sits inside a scroll-clipping container; measured geometry may be wrong.
    #[error(
        "step {index} is inside a scrollable element; remove overflow: scroll or overflow: auto from fixed-height ancestors"
    )]
    ScrollableAncestor {
        /// Index of the offending step.
        index: usize,
    },
    /// `enable` before a successful `setup`.
    #[error("enable() called before scroller was ready")]
    NotReady,
    /// Any call other than `setup` after `destroy`.
    #[error("{0}() called on a destroyed scroller")]
    Destroyed(&'static str),
}

impl ScrollerError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptySteps
            | Self::OffsetOutOfRange { .. }
            | Self::InvalidPixelOffset(_)
            | Self::UnsupportedOffsetFormat(_)
            | Self::MissingCallback(_) => ErrorKind::Configuration,
            Self::ScrollableAncestor { .. } => ErrorKind::Environment,
            Self::NotReady | Self::Destroyed(_) => ErrorKind::Precondition,
        }
    }

    /// Emit this error on the `tracing` channel at a level matching its kind.
    pub(crate) fn log(&self) {
        match self.kind() {
            ErrorKind::Configuration => tracing::error!("scroll steps error: {}", self),
            ErrorKind::Environment | ErrorKind::Precondition => {
                tracing::warn!("scroll steps warning: {}", self);
            }
        }
    }
}
