//! # Raster Ports
//!
//! The external-collaborator seams of the pipeline.
//!
//! This module defines:
//! - [`ImageHandle`] — an opaque decoded image carrying its natural size.
//! - [`SourceDecoder`] — turns a [`RawImage`](crate::source::RawImage) into an
//!   [`ImageHandle`] (suspension point: external decode).
//! - [`RasterSurface`] — the off-screen drawing target that realizes the
//!   resolved dimensions and encodes the result (suspension point: encode).
//!
//! The pipeline core performs no pixel work itself; it only sequences calls
//! across these two ports. The default backend lives in
//! [`image_rs`](crate::raster::image_rs); tests swap in recording mocks.
//!
//! ## Thread safety
//!
//! Both ports are `Send + Sync` so implementations can be shared via `Arc`
//! and driven from async tasks.

pub mod image_rs;

use anyhow::Result;
use async_trait::async_trait;
use image::DynamicImage;

use crate::format::OutputFormat;
use crate::geometry::Dimensions;
use crate::source::RawImage;

/// A decoded image: the handle the render phase draws from.
///
/// Wraps the decoded pixel data and exposes the natural dimensions the
/// resolver needs. Opaque to the pipeline core beyond that.
#[derive(Clone, Debug)]
pub struct ImageHandle {
    image: DynamicImage,
}

impl ImageHandle {
    /// Wraps a decoded image.
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// The intrinsic pixel size of the decoded image, before any resize.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.image.width(), self.image.height())
    }

    /// The decoded pixel data, for surfaces that draw it.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }
}

/// Port trait for decoding a source blob into a drawable handle.
///
/// Implementations decide how bytes become pixels (the `image` crate, native
/// bindings, a remote service). The pipeline treats a failure as an opaque
/// decode fault; it never inspects why.
#[async_trait]
pub trait SourceDecoder: Send + Sync {
    /// Decodes the blob, yielding a handle that knows its natural size.
    ///
    /// ## Errors
    /// Any error for malformed or unsupported source bytes. Callers wrap it
    /// as [`ProcessError::Decode`](crate::error::ProcessError::Decode).
    async fn decode(&self, raw: &RawImage) -> Result<ImageHandle>;
}

/// Port trait for the off-screen raster surface.
///
/// A surface is sized once per run, drawn into, and then encoded any number
/// of times. Sizing and drawing are synchronous raster work; encoding is the
/// second suspension point of the pipeline.
#[async_trait]
pub trait RasterSurface: Send + Sync {
    /// Sizes the surface to the resolved target dimensions, discarding any
    /// previous contents.
    fn set_size(&mut self, width: u32, height: u32);

    /// Draws the decoded image into the surface at `(x, y)`, scaled to
    /// `width` × `height`.
    ///
    /// ## Errors
    /// Any error from the underlying raster backend, including drawing into
    /// a surface that was never sized.
    fn draw_image(
        &mut self,
        handle: &ImageHandle,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<()>;

    /// Encodes the current surface contents in the given format.
    ///
    /// ## Errors
    /// Any error from the encoder, including encoding an empty surface.
    async fn encode(&self, format: OutputFormat) -> Result<Vec<u8>>;
}
