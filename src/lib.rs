//! # imgflow
//!
//! Deferred image resize/re-encode pipeline.
//!
//! This crate provides:
//! - A chainable, lazily-configured processor (`processor::ImageProcessor`):
//!   `resize` / `format` calls record an explicit plan, and a single async
//!   execution decodes the source, resolves dimensions against its natural
//!   proportions, draws into an off-screen surface, and encodes the result.
//! - Pluggable raster ports (`raster::SourceDecoder`, `raster::RasterSurface`)
//!   with a default backend over the `image` crate.
//! - Base64 data-URL transcoding (`data_url`).
//!
//! ## Example usage (in another crate)
//!
//! ```rust,no_run
//! use imgflow::processor::ImageProcessor;
//!
//! # async fn run(bytes: Vec<u8>) -> anyhow::Result<()> {
//! let url = ImageProcessor::from_bytes(bytes, "image/png")?
//!     .resize(Some(400), None, false)?
//!     .to_data_url()
//!     .await?;
//! # Ok(())
//! # }
//! ```
// ===============================
// Re-exports of external crates
// ===============================

pub use anyhow;
pub use base64;
pub use image;
pub use tokio;

// ===============================
// Public modules
// ===============================
pub mod data_url;
pub mod error;
pub mod format;
pub mod geometry;
pub mod plan;
pub mod processor;
pub mod raster;
pub mod source;

pub use error::ProcessError;
pub use processor::{ImageProcessor, ProcessedImage};
