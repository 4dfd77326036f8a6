//! # Source Blob
//!
//! The immutable input to a pipeline run: the original byte blob plus its
//! declared media type.
//!
//! A [`RawImage`] never changes after construction. The pipeline owns it for
//! the lifetime of a run and hands it to the [`crate::raster::SourceDecoder`]
//! when natural dimensions are needed.
//!
//! # Example
//! ```
//! use imgflow::source::RawImage;
//!
//! let raw = RawImage::new(vec![0x89, 0x50], "image/png");
//! assert_eq!(raw.media_type(), "image/png");
//! assert!(raw.to_data_url().starts_with("data:image/png;base64,"));
//! ```

use crate::data_url;

/// The original image blob and its declared media type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawImage {
    bytes: Vec<u8>,
    media_type: String,
}

impl RawImage {
    /// Creates a new [`RawImage`] from raw bytes and a media-type string.
    ///
    /// The media type is the caller's declaration (e.g. from an upload's
    /// `Content-Type`); whether the bytes actually decode is only discovered
    /// at execution time.
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
        }
    }

    /// The raw blob.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The declared media type (e.g. `"image/png"`).
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Size of the blob in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` when the blob is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The blob as a base64 data URL carrying the declared media type.
    pub fn to_data_url(&self) -> String {
        data_url::encode(&self.media_type, &self.bytes)
    }
}
