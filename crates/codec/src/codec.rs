//! The decode/encode seam between queue orchestration and a real codec.

use crate::error::Result;
use crate::format::OutputFormat;
use crate::quality::Quality;

/// A bound pixel codec.
///
/// Conversion is two delegated steps: decode the source bytes into pixels at
/// their exact dimensions, then encode those pixels into the requested
/// format. Keeping the seam this narrow lets the queue orchestration run
/// against a mock in tests.
pub trait PixelCodec {
    /// Decoded pixel representation.
    type Pixels;

    /// Decode source bytes into pixels.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Pixels>;

    /// Encode pixels into `format` at `quality`.
    ///
    /// Implementations map the 10-100 quality onto their own scale and may
    /// ignore it for lossless formats. Must return
    /// [`CodecError::UnsupportedFormat`](crate::CodecError::UnsupportedFormat)
    /// for formats they report as unsupported.
    fn encode(&self, pixels: &Self::Pixels, format: OutputFormat, quality: Quality) -> Result<Vec<u8>>;

    /// Whether an encoder for `format` is available.
    fn supports_encode(&self, format: OutputFormat) -> bool;
}
