//! # Raster Backend (image-rs)
//!
//! Default [`SourceDecoder`] / [`RasterSurface`] implementations over the
//! [`image`] crate.
//!
//! - [`ImageRsDecoder`] sniffs the actual byte format (the declared media
//!   type is not trusted for decoding) and decodes in-process.
//! - [`ImageRsSurface`] keeps an RGBA canvas, draws scaled images into it
//!   with [`FilterType::Triangle`], and encodes per format: JPEG from RGB8,
//!   PNG from RGBA8, GIF through `DynamicImage`.
//!
//! # Errors
//! Both ports return [`anyhow::Error`] when:
//! - the blob's format cannot be guessed or decoded,
//! - the surface is drawn into or encoded before being sized,
//! - the underlying encoder fails.

use std::io::Cursor;

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::{
    imageops::FilterType, ColorType, DynamicImage, ImageFormat, ImageReader, RgbaImage,
};

use super::{ImageHandle, RasterSurface, SourceDecoder};
use crate::format::OutputFormat;
use crate::source::RawImage;

/// Decoder over the `image` crate's guessed-format reader.
#[derive(Clone, Debug, Default)]
pub struct ImageRsDecoder;

#[async_trait]
impl SourceDecoder for ImageRsDecoder {
    async fn decode(&self, raw: &RawImage) -> Result<ImageHandle> {
        let image = ImageReader::new(Cursor::new(raw.bytes()))
            .with_guessed_format()
            .context("guess format")?
            .decode()
            .context("decode source bytes")?;
        Ok(ImageHandle::new(image))
    }
}

/// An off-screen RGBA canvas backed by the `image` crate.
///
/// The canvas does not exist until the first `set_size`; drawing or encoding
/// before that is an error.
#[derive(Debug, Default)]
pub struct ImageRsSurface {
    canvas: Option<RgbaImage>,
}

impl ImageRsSurface {
    /// Creates an unsized surface.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RasterSurface for ImageRsSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        // Fresh transparent canvas; previous contents are discarded.
        self.canvas = Some(RgbaImage::new(width, height));
    }

    fn draw_image(
        &mut self,
        handle: &ImageHandle,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<()> {
        let canvas = self.canvas.as_mut().context("surface was never sized")?;
        let scaled = handle
            .as_dynamic()
            .resize_exact(width, height, FilterType::Triangle)
            .to_rgba8();
        image::imageops::overlay(canvas, &scaled, i64::from(x), i64::from(y));
        Ok(())
    }

    async fn encode(&self, format: OutputFormat) -> Result<Vec<u8>> {
        let canvas = self.canvas.as_ref().context("surface was never sized")?;
        let (w, h) = canvas.dimensions();

        let mut out = Vec::new();
        let mut cur = Cursor::new(&mut out);

        match format {
            OutputFormat::Jpeg => {
                let rgb = DynamicImage::ImageRgba8(canvas.clone()).to_rgb8();
                image::write_buffer_with_format(
                    &mut cur,
                    &rgb,
                    w,
                    h,
                    ColorType::Rgb8,
                    ImageFormat::Jpeg,
                )
                .context("encode jpeg")?;
            }
            OutputFormat::Png => {
                image::write_buffer_with_format(
                    &mut cur,
                    canvas,
                    w,
                    h,
                    ColorType::Rgba8,
                    ImageFormat::Png,
                )
                .context("encode png")?;
            }
            OutputFormat::Gif => {
                DynamicImage::ImageRgba8(canvas.clone())
                    .write_to(&mut cur, ImageFormat::Gif)
                    .context("encode gif")?;
            }
        }

        Ok(out)
    }
}
