//! # Output Format Selection
//!
//! Maps caller-facing format tokens and source media types to the canonical
//! [`OutputFormat`] the render phase encodes with.
//!
//! Two lookup directions exist:
//! - [`OutputFormat::from_token`] — the `format("jpg")` / `format("png")`
//!   table, case-insensitive, rejecting unknown tokens immediately.
//! - [`OutputFormat::from_media_type`] — used at construction to default the
//!   target format to the source's declared media type.
//!
//! # Example
//! ```
//! use imgflow::format::OutputFormat;
//!
//! assert_eq!(OutputFormat::from_token("PNG").unwrap(), OutputFormat::Png);
//! assert_eq!(OutputFormat::Jpeg.media_type(), "image/jpeg");
//! assert!(OutputFormat::from_token("bmp").is_err());
//! ```

use crate::error::ProcessError;

/// Canonical output encodings supported by the pipeline.
///
/// `Gif` is not reachable through [`OutputFormat::from_token`]; it exists so
/// that a GIF source can keep its own media type as the default target
/// format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Gif,
}

impl OutputFormat {
    /// Resolves a short caller token (`"jpg"`, `"png"`, case-insensitive).
    ///
    /// # Errors
    /// [`ProcessError::UnknownFormatToken`] for anything outside the table.
    /// Validation is eager: a bad token fails the `format()` call itself
    /// rather than surfacing later as an opaque encode fault.
    pub fn from_token(token: &str) -> Result<Self, ProcessError> {
        match token.to_ascii_lowercase().as_str() {
            "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            _ => Err(ProcessError::UnknownFormatToken {
                token: token.to_string(),
            }),
        }
    }

    /// Resolves a source media type (e.g. `"image/png"`, case-insensitive).
    ///
    /// # Errors
    /// [`ProcessError::UnsupportedMediaType`] when the media type is not one
    /// the pipeline can re-encode.
    pub fn from_media_type(media_type: &str) -> Result<Self, ProcessError> {
        match media_type.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "image/png" => Ok(Self::Png),
            "image/gif" => Ok(Self::Gif),
            _ => Err(ProcessError::UnsupportedMediaType {
                media_type: media_type.to_string(),
            }),
        }
    }

    /// The canonical media-type string for this format.
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }
}
