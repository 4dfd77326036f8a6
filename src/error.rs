//! # Pipeline Errors
//!
//! The typed error surface of the crate.
//!
//! All fallible operations return [`ProcessError`]:
//! - configuration calls fail fast (`UnknownFormatToken`, `InvalidDimensions`,
//!   `UnsupportedMediaType`),
//! - execution surfaces collaborator faults as `Decode` / `Encode`.
//!
//! Collaborator traits themselves return [`anyhow::Result`]; the processor
//! wraps those opaque faults into the matching variant at the boundary.
//!
//! # Example
//! ```
//! use imgflow::error::ProcessError;
//!
//! let err = ProcessError::UnknownFormatToken { token: "bmp".into() };
//! assert_eq!(
//!     err.to_string(),
//!     "unrecognized format token \"bmp\" (expected \"jpg\" or \"png\")"
//! );
//! ```

use thiserror::Error;

/// Errors produced by the image pipeline.
///
/// # Design
/// - Configuration errors (`UnknownFormatToken`, `InvalidDimensions`,
///   `UnsupportedMediaType`) are raised at the chainable call itself, never
///   deferred to execution time.
/// - Execution errors (`Decode`, `Encode`) are opaque: the pipeline does not
///   inspect why a collaborator failed, it only reports which phase did.
/// - No variant is recovered internally; every fault reaches the caller.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The source bytes could not be decoded into an image.
    #[error("failed to decode source image")]
    Decode(#[source] anyhow::Error),

    /// The raster surface could not draw or encode the result.
    #[error("failed to encode processed image as {media_type}")]
    Encode {
        /// Requested output media type (e.g. `"image/png"`).
        media_type: String,
        #[source]
        source: anyhow::Error,
    },

    /// `format()` was called with a token outside the fixed lookup table.
    #[error("unrecognized format token {token:?} (expected \"jpg\" or \"png\")")]
    UnknownFormatToken {
        /// The token as supplied by the caller.
        token: String,
    },

    /// The source media type has no matching [`crate::format::OutputFormat`].
    #[error("unsupported source media type {media_type:?}")]
    UnsupportedMediaType {
        /// The declared media type of the source blob.
        media_type: String,
    },

    /// `resize()` was called with a zero width or height.
    #[error("resize dimensions must be positive (got width={width:?}, height={height:?})")]
    InvalidDimensions {
        width: Option<u32>,
        height: Option<u32>,
    },
}
