//! # Dimension Resolution
//!
//! Pure aspect-ratio arithmetic: reconciles partially-specified resize
//! requests against the source's natural proportions.
//!
//! This module provides:
//! - [`Dimensions`] — a positive pixel width/height pair.
//! - [`ResizeRequest`] — one validated `resize()` call.
//! - [`PartialTarget`] — the accumulator that resize steps are merged into.
//! - [`apply_resize`] / [`finalize`] — the merge and fill rules.
//!
//! Requests merge against the **current** partial target, not against a
//! fresh slate: a dimension set by an earlier step survives later steps that
//! do not address it. Missing dimensions are filled at finalization, from
//! the aspect ratio where possible and from the natural size otherwise.
//!
//! # Example
//! ```
//! use imgflow::geometry::{apply_resize, finalize, Dimensions, PartialTarget, ResizeRequest};
//!
//! let natural = Dimensions::new(800, 600);
//! let req = ResizeRequest::new(Some(400), None, false).unwrap();
//! let target = finalize(apply_resize(PartialTarget::default(), natural, &req), natural);
//! assert_eq!((target.width, target.height), (400, 300));
//! ```

use crate::error::ProcessError;

/// A pixel width/height pair. Both components are positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Creates a new [`Dimensions`].
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// One `resize()` call: a partially-specified target plus the ratio policy.
///
/// Constructed through [`ResizeRequest::new`], which rejects zero values
/// eagerly so an impossible request never reaches the render phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeRequest {
    /// Requested width, if the caller specified one.
    pub width: Option<u32>,
    /// Requested height, if the caller specified one.
    pub height: Option<u32>,
    /// When `true`, both supplied dimensions are honored verbatim and no
    /// ratio arithmetic runs for this step.
    pub ignore_ratio: bool,
}

impl ResizeRequest {
    /// Validates and creates a resize request.
    ///
    /// # Errors
    /// [`ProcessError::InvalidDimensions`] if either supplied dimension is
    /// zero.
    pub fn new(
        width: Option<u32>,
        height: Option<u32>,
        ignore_ratio: bool,
    ) -> Result<Self, ProcessError> {
        if width == Some(0) || height == Some(0) {
            return Err(ProcessError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            ignore_ratio,
        })
    }
}

/// The in-progress target accumulated while resize steps are merged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PartialTarget {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Merges one resize request into the current partial target.
///
/// Rules, applied in order:
/// 1. A supplied width takes effect when the request gave no height, or when
///    the ratio is ignored. Symmetrically for a supplied height.
/// 2. With the ratio preserved, a still-missing dimension is derived from the
///    natural aspect ratio and the dimension the target already has.
///
/// A request supplying *both* dimensions with the ratio preserved is
/// contradictory and changes nothing; callers wanting exact dimensions pass
/// `ignore_ratio = true`.
pub fn apply_resize(
    mut target: PartialTarget,
    natural: Dimensions,
    request: &ResizeRequest,
) -> PartialTarget {
    if request.width.is_some() && (request.height.is_none() || request.ignore_ratio) {
        target.width = request.width;
    }
    if request.height.is_some() && (request.width.is_none() || request.ignore_ratio) {
        target.height = request.height;
    }

    if !request.ignore_ratio {
        if target.height.is_some() && target.width.is_none() {
            target.width = target.height.map(|h| scale(natural.width, natural.height, h));
        }
        if target.width.is_some() && target.height.is_none() {
            target.height = target.width.map(|w| scale(natural.height, natural.width, w));
        }
    }

    target
}

/// Fills any still-missing dimension from the natural size.
///
/// With no resize steps at all this yields the identity resize. With
/// `ignore_ratio` and a single supplied dimension, the other one falls back
/// to the natural dimension here, with no ratio arithmetic.
pub fn finalize(target: PartialTarget, natural: Dimensions) -> Dimensions {
    Dimensions {
        width: target.width.unwrap_or(natural.width),
        height: target.height.unwrap_or(natural.height),
    }
}

/// `round(numerator / denominator * known)`, round half up, clamped to a
/// 1-pixel minimum so resolved dimensions stay positive for extreme ratios.
fn scale(numerator: u32, denominator: u32, known: u32) -> u32 {
    let scaled = (f64::from(numerator) / f64::from(denominator) * f64::from(known)).round();
    (scaled as u32).max(1)
}
