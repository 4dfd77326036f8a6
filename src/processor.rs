//! # Image Processor
//!
//! The public pipeline object: chain configuration calls, then execute.
//!
//! A processor is built around one [`RawImage`] plus the two raster ports.
//! Configuration calls (`resize`, `format`) validate their arguments, record
//! a [`ConfigStep`](crate::plan::ConfigStep), and return the processor for
//! chaining — no I/O happens until execution. `exec` then runs the phases in
//! a fixed order:
//!
//! 1. decode the source and learn its natural dimensions,
//! 2. resolve the recorded plan into [`TargetParams`],
//! 3. size the surface and draw the decoded image scaled to the target.
//!
//! `exec` consumes the processor, so one instance is one pipeline run: a
//! second execution (and any race on the surface) is a compile error rather
//! than a documented hazard. Repeated reads happen on the returned
//! [`ProcessedImage`], which encodes fresh output on every call.
//!
//! # Example
//! ```no_run
//! use imgflow::processor::ImageProcessor;
//!
//! # async fn run(bytes: Vec<u8>) -> Result<(), imgflow::error::ProcessError> {
//! let url = ImageProcessor::from_bytes(bytes, "image/png")?
//!     .resize(Some(400), None, false)?
//!     .format("jpg")?
//!     .to_data_url()
//!     .await?;
//! assert!(url.starts_with("data:image/jpeg;base64,"));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::data_url;
use crate::error::ProcessError;
use crate::format::OutputFormat;
use crate::geometry::{Dimensions, ResizeRequest};
use crate::plan::{ConfigPlan, ConfigStep, TargetParams};
use crate::raster::image_rs::{ImageRsDecoder, ImageRsSurface};
use crate::raster::{RasterSurface, SourceDecoder};
use crate::source::RawImage;

/// A deferred resize/re-encode pipeline around one source blob.
pub struct ImageProcessor {
    raw: RawImage,
    decoder: Arc<dyn SourceDecoder>,
    surface: Box<dyn RasterSurface>,
    plan: ConfigPlan,
    default_format: OutputFormat,
}

impl std::fmt::Debug for ImageProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageProcessor")
            .field("raw", &self.raw)
            .field("plan", &self.plan)
            .field("default_format", &self.default_format)
            .finish_non_exhaustive()
    }
}

impl ImageProcessor {
    /// Creates a processor with injected raster ports.
    ///
    /// The initial target format defaults to the source's declared media
    /// type.
    ///
    /// # Errors
    /// [`ProcessError::UnsupportedMediaType`] when the declared media type
    /// has no matching [`OutputFormat`].
    pub fn new(
        raw: RawImage,
        decoder: Arc<dyn SourceDecoder>,
        surface: Box<dyn RasterSurface>,
    ) -> Result<Self, ProcessError> {
        let default_format = OutputFormat::from_media_type(raw.media_type())?;
        Ok(Self {
            raw,
            decoder,
            surface,
            plan: ConfigPlan::new(),
            default_format,
        })
    }

    /// Creates a processor over the default `image`-crate backend.
    ///
    /// # Errors
    /// Same as [`ImageProcessor::new`].
    pub fn from_bytes(
        bytes: Vec<u8>,
        media_type: impl Into<String>,
    ) -> Result<Self, ProcessError> {
        Self::new(
            RawImage::new(bytes, media_type),
            Arc::new(ImageRsDecoder),
            Box::new(ImageRsSurface::new()),
        )
    }

    /// Records a resize request. Chainable; no I/O.
    ///
    /// Either dimension may be omitted. With the ratio preserved, a missing
    /// dimension is derived from the source's proportions at execution time;
    /// with `ignore_ratio`, supplied dimensions are honored verbatim and a
    /// missing one falls back to the natural size. Later calls merge against
    /// the target accumulated so far (see [`crate::geometry::apply_resize`]).
    ///
    /// # Errors
    /// [`ProcessError::InvalidDimensions`] for zero values.
    pub fn resize(
        mut self,
        width: Option<u32>,
        height: Option<u32>,
        ignore_ratio: bool,
    ) -> Result<Self, ProcessError> {
        let request = ResizeRequest::new(width, height, ignore_ratio)?;
        self.plan.push(ConfigStep::Resize(request));
        Ok(self)
    }

    /// Records an output format selection. Chainable; no I/O.
    ///
    /// Recognized tokens are `"jpg"` and `"png"`, case-insensitive. Later
    /// calls override earlier ones.
    ///
    /// # Errors
    /// [`ProcessError::UnknownFormatToken`] for anything else, raised here
    /// rather than deferred to encode time.
    pub fn format(mut self, token: &str) -> Result<Self, ProcessError> {
        let format = OutputFormat::from_token(token)?;
        self.plan.push(ConfigStep::Format(format));
        Ok(self)
    }

    /// Runs the pipeline: decode, resolve, draw.
    ///
    /// Configuration resolution always completes before any render work
    /// starts. Consuming `self` makes a second run on the same instance
    /// impossible; build a fresh processor per run.
    ///
    /// # Errors
    /// - [`ProcessError::Decode`] when the source bytes cannot be decoded.
    /// - [`ProcessError::Encode`] when the draw fails.
    pub async fn exec(self) -> Result<ProcessedImage, ProcessError> {
        let handle = self
            .decoder
            .decode(&self.raw)
            .await
            .map_err(ProcessError::Decode)?;
        let natural = handle.dimensions();

        let target = self.plan.resolve(natural, self.default_format);
        debug!(
            natural_width = natural.width,
            natural_height = natural.height,
            target_width = target.width,
            target_height = target.height,
            format = target.format.media_type(),
            "resolved target parameters"
        );

        let mut surface = self.surface;
        surface.set_size(target.width, target.height);
        surface
            .draw_image(&handle, 0, 0, target.width, target.height)
            .map_err(|source| ProcessError::Encode {
                media_type: target.format.media_type().to_string(),
                source,
            })?;

        Ok(ProcessedImage {
            natural,
            target,
            surface,
        })
    }

    /// Runs the pipeline and returns the result as a base64 data URL
    /// carrying the resolved media type.
    ///
    /// # Errors
    /// Same as [`ImageProcessor::exec`], plus [`ProcessError::Encode`] when
    /// the surface cannot encode in the target format.
    pub async fn to_data_url(self) -> Result<String, ProcessError> {
        self.exec().await?.to_data_url().await
    }
}

/// A completed pipeline run: resolved parameters plus the drawn surface.
///
/// Output is produced fresh on every `encode` / `to_data_url` call; nothing
/// is cached.
pub struct ProcessedImage {
    natural: Dimensions,
    target: TargetParams,
    surface: Box<dyn RasterSurface>,
}

impl std::fmt::Debug for ProcessedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessedImage")
            .field("natural", &self.natural)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl ProcessedImage {
    /// The source's intrinsic dimensions, as decoded.
    pub fn natural_size(&self) -> Dimensions {
        self.natural
    }

    /// The resolved target parameters realized by the draw.
    pub fn target(&self) -> TargetParams {
        self.target
    }

    /// Encodes the surface contents in the resolved format.
    ///
    /// # Errors
    /// [`ProcessError::Encode`] when the raster backend cannot produce the
    /// requested encoding.
    pub async fn encode(&self) -> Result<Vec<u8>, ProcessError> {
        self.surface
            .encode(self.target.format)
            .await
            .map_err(|source| ProcessError::Encode {
                media_type: self.target.format.media_type().to_string(),
                source,
            })
    }

    /// Encodes the surface contents as a base64 data URL.
    ///
    /// # Errors
    /// Same as [`ProcessedImage::encode`].
    pub async fn to_data_url(&self) -> Result<String, ProcessError> {
        let bytes = self.encode().await?;
        Ok(data_url::encode(self.target.format.media_type(), &bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use image::DynamicImage;
    use std::io::Cursor;
    use std::sync::Mutex;

    use crate::raster::ImageHandle;

    /// Shared event log proving phase ordering across both ports.
    type EventLog = Arc<Mutex<Vec<String>>>;

    struct StubDecoder {
        log: EventLog,
        natural: Dimensions,
        fail: bool,
    }

    impl StubDecoder {
        fn new(log: EventLog, width: u32, height: u32) -> Self {
            Self {
                log,
                natural: Dimensions::new(width, height),
                fail: false,
            }
        }
        fn failing(log: EventLog) -> Self {
            Self {
                log,
                natural: Dimensions::new(1, 1),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl SourceDecoder for StubDecoder {
        async fn decode(&self, raw: &RawImage) -> Result<ImageHandle> {
            if self.fail {
                bail!("stub decode failure");
            }
            self.log
                .lock()
                .unwrap()
                .push(format!("decode {}", raw.media_type()));
            Ok(ImageHandle::new(DynamicImage::new_rgba8(
                self.natural.width,
                self.natural.height,
            )))
        }
    }

    struct StubSurface {
        log: EventLog,
        fail_draw: bool,
        fail_encode: bool,
    }

    impl StubSurface {
        fn new(log: EventLog) -> Self {
            Self {
                log,
                fail_draw: false,
                fail_encode: false,
            }
        }
    }

    #[async_trait]
    impl RasterSurface for StubSurface {
        fn set_size(&mut self, width: u32, height: u32) {
            self.log
                .lock()
                .unwrap()
                .push(format!("set_size {width}x{height}"));
        }

        fn draw_image(
            &mut self,
            _handle: &ImageHandle,
            x: u32,
            y: u32,
            width: u32,
            height: u32,
        ) -> Result<()> {
            if self.fail_draw {
                bail!("stub draw failure");
            }
            self.log
                .lock()
                .unwrap()
                .push(format!("draw {x},{y} {width}x{height}"));
            Ok(())
        }

        async fn encode(&self, format: OutputFormat) -> Result<Vec<u8>> {
            if self.fail_encode {
                bail!("stub encode failure");
            }
            self.log
                .lock()
                .unwrap()
                .push(format!("encode {}", format.media_type()));
            Ok(b"ENCODED".to_vec())
        }
    }

    fn stub_processor(
        log: &EventLog,
        natural_w: u32,
        natural_h: u32,
        media_type: &str,
    ) -> ImageProcessor {
        ImageProcessor::new(
            RawImage::new(vec![1, 2, 3], media_type),
            Arc::new(StubDecoder::new(log.clone(), natural_w, natural_h)),
            Box::new(StubSurface::new(log.clone())),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn no_configuration_yields_identity_resize() {
        let log: EventLog = Arc::default();
        let done = stub_processor(&log, 800, 600, "image/png")
            .exec()
            .await
            .unwrap();

        assert_eq!(done.natural_size(), Dimensions::new(800, 600));
        assert_eq!(done.target().dimensions(), Dimensions::new(800, 600));
        assert_eq!(
            log.lock().unwrap().as_slice(),
            ["decode image/png", "set_size 800x600", "draw 0,0 800x600"]
        );
    }

    #[tokio::test]
    async fn resize_width_only_preserves_ratio() {
        let log: EventLog = Arc::default();
        let done = stub_processor(&log, 800, 600, "image/png")
            .resize(Some(400), None, false)
            .unwrap()
            .exec()
            .await
            .unwrap();

        assert_eq!(done.target().dimensions(), Dimensions::new(400, 300));
        assert!(log.lock().unwrap().contains(&"set_size 400x300".to_string()));
    }

    #[tokio::test]
    async fn resize_ignoring_ratio_honors_both_dimensions() {
        let log: EventLog = Arc::default();
        let done = stub_processor(&log, 800, 600, "image/png")
            .resize(Some(200), Some(100), true)
            .unwrap()
            .exec()
            .await
            .unwrap();

        assert_eq!(done.target().dimensions(), Dimensions::new(200, 100));
    }

    #[tokio::test]
    async fn decode_always_precedes_render_steps() {
        let log: EventLog = Arc::default();
        stub_processor(&log, 10, 10, "image/png")
            .resize(Some(5), None, false)
            .unwrap()
            .exec()
            .await
            .unwrap();

        let events = log.lock().unwrap();
        let decode_at = events.iter().position(|e| e.starts_with("decode")).unwrap();
        let size_at = events.iter().position(|e| e.starts_with("set_size")).unwrap();
        let draw_at = events.iter().position(|e| e.starts_with("draw")).unwrap();
        assert!(decode_at < size_at && size_at < draw_at);
    }

    #[tokio::test]
    async fn default_format_comes_from_source_media_type() {
        let log: EventLog = Arc::default();
        let url = stub_processor(&log, 4, 4, "image/gif")
            .to_data_url()
            .await
            .unwrap();

        assert!(url.starts_with("data:image/gif;base64,"));
        assert!(log.lock().unwrap().contains(&"encode image/gif".to_string()));
    }

    #[tokio::test]
    async fn format_token_overrides_default_format() {
        let log: EventLog = Arc::default();
        let url = stub_processor(&log, 4, 4, "image/png")
            .format("jpg")
            .unwrap()
            .to_data_url()
            .await
            .unwrap();

        let (media_type, bytes) = data_url::parse(&url).unwrap();
        assert_eq!(media_type, "image/jpeg");
        assert_eq!(bytes, b"ENCODED");
    }

    #[tokio::test]
    async fn unknown_format_token_fails_before_any_io() {
        let log: EventLog = Arc::default();
        let err = stub_processor(&log, 4, 4, "image/png")
            .format("webp")
            .unwrap_err();

        assert!(matches!(err, ProcessError::UnknownFormatToken { .. }));
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn zero_dimension_fails_before_any_io() {
        let log: EventLog = Arc::default();
        let err = stub_processor(&log, 4, 4, "image/png")
            .resize(Some(0), None, false)
            .unwrap_err();

        assert!(matches!(err, ProcessError::InvalidDimensions { .. }));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn unsupported_source_media_type_fails_at_construction() {
        let err = ImageProcessor::from_bytes(vec![1], "text/plain").unwrap_err();
        assert!(matches!(err, ProcessError::UnsupportedMediaType { .. }));
    }

    #[tokio::test]
    async fn decode_failure_surfaces_and_skips_render() {
        let log: EventLog = Arc::default();
        let processor = ImageProcessor::new(
            RawImage::new(vec![0], "image/png"),
            Arc::new(StubDecoder::failing(log.clone())),
            Box::new(StubSurface::new(log.clone())),
        )
        .unwrap();

        let err = processor.exec().await.unwrap_err();
        assert!(matches!(err, ProcessError::Decode(_)));
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn draw_failure_surfaces_as_encode_fault() {
        let log: EventLog = Arc::default();
        let mut surface = StubSurface::new(log.clone());
        surface.fail_draw = true;

        let processor = ImageProcessor::new(
            RawImage::new(vec![0], "image/png"),
            Arc::new(StubDecoder::new(log.clone(), 4, 4)),
            Box::new(surface),
        )
        .unwrap();

        let err = processor.exec().await.unwrap_err();
        assert!(matches!(
            err,
            ProcessError::Encode { ref media_type, .. } if media_type == "image/png"
        ));
    }

    #[tokio::test]
    async fn encode_failure_surfaces_as_encode_fault() {
        let log: EventLog = Arc::default();
        let mut surface = StubSurface::new(log.clone());
        surface.fail_encode = true;

        let done = ImageProcessor::new(
            RawImage::new(vec![0], "image/png"),
            Arc::new(StubDecoder::new(log.clone(), 4, 4)),
            Box::new(surface),
        )
        .unwrap()
        .exec()
        .await
        .unwrap();

        assert!(matches!(
            done.encode().await.unwrap_err(),
            ProcessError::Encode { .. }
        ));
    }

    #[tokio::test]
    async fn concurrent_runs_share_a_decoder_safely() {
        let log: EventLog = Arc::default();
        let decoder: Arc<dyn SourceDecoder> = Arc::new(StubDecoder::new(log.clone(), 8, 8));

        let a = ImageProcessor::new(
            RawImage::new(vec![1], "image/png"),
            decoder.clone(),
            Box::new(StubSurface::new(log.clone())),
        )
        .unwrap();
        let b = ImageProcessor::new(
            RawImage::new(vec![2], "image/jpeg"),
            decoder,
            Box::new(StubSurface::new(log.clone())),
        )
        .unwrap();

        let (ra, rb) = futures::join!(a.exec(), b.exec());
        assert_eq!(ra.unwrap().target().dimensions(), Dimensions::new(8, 8));
        assert_eq!(rb.unwrap().target().dimensions(), Dimensions::new(8, 8));
    }

    // End-to-end coverage over the real image-rs backend.

    fn make_png(w: u32, h: u32) -> Vec<u8> {
        let img = image::ImageBuffer::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([0u8, 0, 255, 255])
            } else {
                image::Rgba([255u8, 255, 0, 255])
            }
        });
        let mut cur = Cursor::new(Vec::new());
        image::write_buffer_with_format(
            &mut cur,
            img.as_raw(),
            w,
            h,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .expect("encode png");
        cur.into_inner()
    }

    #[tokio::test]
    async fn end_to_end_resize_produces_decodable_png_data_url() {
        let url = ImageProcessor::from_bytes(make_png(80, 60), "image/png")
            .unwrap()
            .resize(Some(40), None, false)
            .unwrap()
            .to_data_url()
            .await
            .unwrap();

        let (media_type, bytes) = data_url::parse(&url).unwrap();
        assert_eq!(media_type, "image/png");

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 40);
        assert_eq!(decoded.height(), 30);
    }

    #[tokio::test]
    async fn end_to_end_format_jpg_round_trips_at_target_size() {
        let done = ImageProcessor::from_bytes(make_png(64, 48), "image/png")
            .unwrap()
            .resize(Some(32), Some(16), true)
            .unwrap()
            .format("JPG")
            .unwrap()
            .exec()
            .await
            .unwrap();

        assert_eq!(done.target().format, OutputFormat::Jpeg);
        let bytes = done.encode().await.unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 16));
    }

    #[tokio::test]
    async fn repeated_encode_on_processed_image_is_idempotent() {
        let done = ImageProcessor::from_bytes(make_png(20, 20), "image/png")
            .unwrap()
            .resize(Some(10), None, false)
            .unwrap()
            .exec()
            .await
            .unwrap();

        let first = done.encode().await.unwrap();
        let second = done.encode().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn end_to_end_garbage_bytes_fail_with_decode_fault() {
        let err = ImageProcessor::from_bytes(b"not an image".to_vec(), "image/png")
            .unwrap()
            .exec()
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::Decode(_)));
    }
}
