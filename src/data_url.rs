//! # Data-URL Transcoding
//!
//! Base64 data-URL encode/parse for image blobs
//! (`data:<media type>;base64,<payload>`).
//!
//! [`encode`] produces the self-describing textual representation returned by
//! the pipeline's `to_data_url` entry points; [`parse`] is its inverse, for
//! callers that receive data URLs from elsewhere (and for round-trip tests).
//!
//! # Example
//! ```
//! use imgflow::data_url;
//!
//! let url = data_url::encode("image/png", b"\x89PNG");
//! assert!(url.starts_with("data:image/png;base64,"));
//!
//! let (media_type, bytes) = data_url::parse(&url).unwrap();
//! assert_eq!(media_type, "image/png");
//! assert_eq!(bytes, b"\x89PNG");
//! ```

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Encodes raw bytes as a base64 data URL carrying the given media type.
pub fn encode(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

/// Parses a base64 data URL back into its media type and raw bytes.
///
/// # Errors
/// Fails on inputs that are not `data:` URLs, are not base64-encoded, or
/// carry an invalid payload.
pub fn parse(data_url: &str) -> Result<(String, Vec<u8>)> {
    let rest = match data_url.strip_prefix("data:") {
        Some(rest) => rest,
        None => bail!("not a data URL"),
    };
    let (header, payload) = rest
        .split_once(',')
        .context("data URL has no payload separator")?;
    let media_type = match header.strip_suffix(";base64") {
        Some(media_type) => media_type,
        None => bail!("data URL is not base64-encoded"),
    };
    let bytes = STANDARD.decode(payload).context("invalid base64 payload")?;
    Ok((media_type.to_string(), bytes))
}
