//! Error types for the codec crate.

use thiserror::Error;

use crate::format::OutputFormat;
use crate::quality::Quality;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors that can occur while decoding or encoding pixels.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Quality outside the accepted settings range
    #[error("quality {0} is outside the accepted range {min}-{max}", min = Quality::MIN, max = Quality::MAX)]
    InvalidQuality(u8),

    /// Unrecognized format name on the settings surface
    #[error("unknown output format '{0}' (expected jpeg, png, webp or avif)")]
    UnknownFormatName(String),

    /// The bound codec has no encoder for the requested format
    #[error("no encoder available for {0}")]
    UnsupportedFormat(OutputFormat),

    /// The source bytes could not be decoded into pixels
    #[error("decode failed: {0}")]
    Decode(String),

    /// The encoder settled without producing output
    #[error("encode failed: {0}")]
    Encode(String),

    /// Error raised by the image backend
    #[cfg(feature = "processing")]
    #[error("image processing error: {0}")]
    Processing(#[from] image::ImageError),
}
