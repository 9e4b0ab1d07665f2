// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trigger offset parsing and viewport/step geometry.
//!
//! ## Offsets
//!
//! The trigger line is given either as a fraction of the viewport height
//! measured from its top, or as a pixel literal:
//!
//! ```
//! use understory_scroll_steps::geometry::{Offset, OffsetSpec};
//!
//! let (offset, problem) = OffsetSpec::from(0.25).resolve();
//! assert_eq!(offset, Offset::Percent(0.25));
//! assert!(problem.is_none());
//!
//! let (offset, _) = OffsetSpec::from("120px").resolve();
//! assert_eq!(offset, Offset::Pixels(120.0));
//! assert_eq!(offset.margin(800.0), 120.0);
//! ```
//!
//! Inputs that cannot be interpreted fall back to `Percent(0.5)` and come back
//! with the [`ScrollerError`] describing why.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::ScrollerError;
use crate::host::GeometryProvider;

/// Default trigger offset: the middle of the viewport.
pub const DEFAULT_OFFSET: Offset = Offset::Percent(0.5);

/// A validated trigger offset.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Offset {
    /// Fraction of the viewport height from the top, in `[0, 1]`.
    Percent(f64),
    /// Absolute pixels from the viewport top.
    Pixels(f64),
}

impl Default for Offset {
    fn default() -> Self {
        DEFAULT_OFFSET
    }
}

impl Offset {
    /// The offset in user units (fraction or pixels).
    pub fn value(self) -> f64 {
        match self {
            Self::Percent(v) | Self::Pixels(v) => v,
        }
    }

    /// Distance of the trigger line from the viewport top, in pixels.
    pub fn margin(self, viewport_height: f64) -> f64 {
        match self {
            Self::Percent(v) => v * viewport_height,
            Self::Pixels(v) => v,
        }
    }

    /// Unit suffix used when displaying the offset.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Percent(_) => "",
            Self::Pixels(_) => "px",
        }
    }
}

/// A trigger offset as supplied by the caller, before validation.
#[derive(Clone, Debug, PartialEq)]
pub enum OffsetSpec {
    /// A fraction of the viewport height.
    Fraction(f64),
    /// A textual literal such as `"150px"`.
    Literal(String),
}

impl From<f64> for OffsetSpec {
    fn from(v: f64) -> Self {
        Self::Fraction(v)
    }
}

impl From<&str> for OffsetSpec {
    fn from(s: &str) -> Self {
        Self::Literal(s.into())
    }
}

impl From<String> for OffsetSpec {
    fn from(s: String) -> Self {
        Self::Literal(s)
    }
}

impl From<Offset> for OffsetSpec {
    fn from(o: Offset) -> Self {
        match o {
            Offset::Percent(v) => Self::Fraction(v),
            Offset::Pixels(v) => Self::Literal(alloc::format!("{v}px")),
        }
    }
}

impl OffsetSpec {
    /// Validate into an [`Offset`].
    ///
    /// Never fails: problems are returned next to the offset that was used
    /// instead, so the caller can report them.
    pub fn resolve(&self) -> (Offset, Option<ScrollerError>) {
        match self {
            Self::Fraction(v) => {
                let clamped = v.clamp(0.0, 1.0);
                // NaN compares unequal to everything and lands here too.
                if clamped != *v {
                    let clamped = if v.is_nan() { 0.5 } else { clamped };
                    let err = ScrollerError::OffsetOutOfRange { value: *v, clamped };
                    (Offset::Percent(clamped), Some(err))
                } else {
                    (Offset::Percent(clamped), None)
                }
            }
            Self::Literal(s) => match s.find("px") {
                Some(at) if at > 0 => {
                    let number = s.replacen("px", "", 1);
                    let number = number.trim();
                    // A blank number reads as zero, like `" px"`.
                    let parsed = if number.is_empty() {
                        Ok(0.0)
                    } else {
                        number.parse::<f64>()
                    };
                    match parsed {
                        Ok(v) if !v.is_nan() => (Offset::Pixels(v), None),
                        _ => (
                            DEFAULT_OFFSET,
                            Some(ScrollerError::InvalidPixelOffset(s.clone())),
                        ),
                    }
                }
                _ => (
                    DEFAULT_OFFSET,
                    Some(ScrollerError::UnsupportedOffsetFormat(s.clone())),
                ),
            },
        }
    }
}

/// Viewport-level geometry shared by every watch between recomputations.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    /// Height of the viewport.
    pub viewport_height: f64,
    /// Full scrollable height of the page.
    pub page_height: f64,
    /// Trigger line distance from the viewport top, in pixels.
    pub offset_margin: f64,
    /// The offset the margin was derived from.
    pub offset: Offset,
}

impl Geometry {
    /// Derive geometry from an offset and viewport/page extents.
    pub fn compute(offset: Offset, viewport_height: f64, page_height: f64) -> Self {
        Self {
            viewport_height,
            page_height,
            offset_margin: offset.margin(viewport_height),
            offset,
        }
    }

    /// Read viewport extents from a provider and derive geometry.
    pub fn measure<E, P: GeometryProvider<E> + ?Sized>(offset: Offset, provider: &P) -> Self {
        Self::compute(offset, provider.viewport_height(), provider.page_height())
    }
}

/// Cached height and absolute top of one step.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Height of the step's bounding box.
    pub height: f64,
    /// Distance from the page top to the step's top edge.
    pub top: f64,
}

impl StepMetrics {
    /// Measure one element against the current scroll position.
    pub fn of<E, P: GeometryProvider<E> + ?Sized>(provider: &P, element: &E) -> Self {
        let rect = provider.bounding_rect(element);
        Self {
            height: rect.height(),
            top: rect.y0 + provider.scroll_y() - provider.client_top(),
        }
    }

    /// Measure every step, in index order.
    pub fn measure_all<E, P: GeometryProvider<E> + ?Sized>(
        provider: &P,
        steps: &[E],
    ) -> Vec<Self> {
        steps.iter().map(|el| Self::of(provider, el)).collect()
    }
}
