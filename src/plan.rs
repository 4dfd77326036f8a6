//! # Configuration Plan
//!
//! The deferred-configuration core: an ordered, append-only sequence of
//! tagged steps built up by chainable calls and consumed exactly once at
//! execution time.
//!
//! Earlier designs of this kind queue closures that mutate a shared record
//! and can silently re-run; here the plan is plain data. Steps carry their
//! already-validated arguments, resolution folds them **in insertion order**
//! over a [`PartialTarget`], and [`ConfigPlan::resolve`] takes the plan by
//! value, so a plan cannot run twice.
//!
//! # Example
//! ```
//! use imgflow::format::OutputFormat;
//! use imgflow::geometry::{Dimensions, ResizeRequest};
//! use imgflow::plan::{ConfigPlan, ConfigStep};
//!
//! let mut plan = ConfigPlan::new();
//! plan.push(ConfigStep::Resize(ResizeRequest::new(Some(400), None, false).unwrap()));
//! plan.push(ConfigStep::Format(OutputFormat::Jpeg));
//!
//! let target = plan.resolve(Dimensions::new(800, 600), OutputFormat::Png);
//! assert_eq!((target.width, target.height), (400, 300));
//! assert_eq!(target.format, OutputFormat::Jpeg);
//! ```

use crate::format::OutputFormat;
use crate::geometry::{apply_resize, finalize, Dimensions, PartialTarget, ResizeRequest};

/// One deferred configuration step.
///
/// Steps are recorded at call time with validated arguments; nothing about
/// the source image is known until resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigStep {
    /// Merge a resize request into the target dimensions.
    Resize(ResizeRequest),
    /// Overwrite the target output format.
    Format(OutputFormat),
}

/// The fully-resolved parameters the render phase realizes.
///
/// Invariant: `width` and `height` are positive once produced by
/// [`ConfigPlan::resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetParams {
    /// Resolved output width in pixels.
    pub width: u32,
    /// Resolved output height in pixels.
    pub height: u32,
    /// Resolved output encoding.
    pub format: OutputFormat,
}

impl TargetParams {
    /// The resolved width/height as a [`Dimensions`] pair.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// An ordered sequence of configuration steps, consumed once.
#[derive(Debug, Default)]
pub struct ConfigPlan {
    steps: Vec<ConfigStep>,
}

impl ConfigPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step to the tail of the plan.
    pub fn push(&mut self, step: ConfigStep) {
        self.steps.push(step);
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// `true` when no configuration call was recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Consumes the plan, folding its steps in insertion order against the
    /// source's natural dimensions.
    ///
    /// Resize steps merge into the running partial target; format steps
    /// overwrite the output format, last one winning. Dimensions still unset
    /// after all steps fall back to the natural size, so an empty plan
    /// resolves to the identity resize in `default_format`.
    pub fn resolve(self, natural: Dimensions, default_format: OutputFormat) -> TargetParams {
        let mut target = PartialTarget::default();
        let mut format = default_format;

        for step in self.steps {
            match step {
                ConfigStep::Resize(request) => {
                    target = apply_resize(target, natural, &request);
                }
                ConfigStep::Format(requested) => format = requested,
            }
        }

        let dims = finalize(target, natural);
        TargetParams {
            width: dims.width,
            height: dims.height,
            format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resize(width: Option<u32>, height: Option<u32>, ignore_ratio: bool) -> ConfigStep {
        ConfigStep::Resize(ResizeRequest::new(width, height, ignore_ratio).unwrap())
    }

    #[test]
    fn empty_plan_resolves_to_identity_in_default_format() {
        let target = ConfigPlan::new().resolve(Dimensions::new(800, 600), OutputFormat::Gif);
        assert_eq!(
            target,
            TargetParams {
                width: 800,
                height: 600,
                format: OutputFormat::Gif,
            }
        );
    }

    #[test]
    fn steps_fold_in_insertion_order() {
        let mut plan = ConfigPlan::new();
        plan.push(resize(Some(100), None, false));
        plan.push(resize(None, Some(50), false));

        let target = plan.resolve(Dimensions::new(800, 600), OutputFormat::Png);
        assert_eq!((target.width, target.height), (100, 50));
    }

    #[test]
    fn last_format_step_wins() {
        let mut plan = ConfigPlan::new();
        plan.push(ConfigStep::Format(OutputFormat::Jpeg));
        plan.push(ConfigStep::Format(OutputFormat::Png));

        let target = plan.resolve(Dimensions::new(10, 10), OutputFormat::Gif);
        assert_eq!(target.format, OutputFormat::Png);
    }

    #[test]
    fn resize_and_format_steps_are_independent_concerns() {
        let mut plan = ConfigPlan::new();
        plan.push(ConfigStep::Format(OutputFormat::Jpeg));
        plan.push(resize(Some(200), Some(100), true));

        let target = plan.resolve(Dimensions::new(800, 600), OutputFormat::Png);
        assert_eq!((target.width, target.height), (200, 100));
        assert_eq!(target.format, OutputFormat::Jpeg);
    }

    #[test]
    fn len_and_is_empty_track_pushes() {
        let mut plan = ConfigPlan::new();
        assert!(plan.is_empty());
        plan.push(ConfigStep::Format(OutputFormat::Png));
        assert_eq!(plan.len(), 1);
        assert!(!plan.is_empty());
    }

    #[test]
    fn target_params_exposes_dimensions_pair() {
        let target = TargetParams {
            width: 40,
            height: 30,
            format: OutputFormat::Png,
        };
        assert_eq!(target.dimensions(), Dimensions::new(40, 30));
    }
}
