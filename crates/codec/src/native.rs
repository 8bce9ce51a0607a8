//! Native codec backed by the `image` crate.

use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Rgba};
use std::io::Cursor;

use crate::codec::PixelCodec;
use crate::error::{CodecError, Result};
use crate::format::OutputFormat;
use crate::quality::Quality;

/// Codec bound to the `image` crate's decoders and encoders.
///
/// Encoder coverage with the workspace feature set (jpeg, png, webp, gif):
/// JPEG honors quality, PNG is lossless by definition, and the bundled WebP
/// encoder is lossless-only, so quality applies to JPEG output alone. There
/// is no AVIF encoder; requests for it resolve through the fallback chain
/// before reaching this codec.
#[derive(Debug, Clone)]
pub struct NativeCodec {
    /// Background composited under transparent pixels when the target
    /// encoder cannot carry an alpha channel.
    background: [u8; 3],
}

impl NativeCodec {
    /// Codec flattening transparency over the given RGB background.
    pub fn with_background(background: [u8; 3]) -> Self {
        Self { background }
    }
}

impl Default for NativeCodec {
    fn default() -> Self {
        Self::with_background([255, 255, 255])
    }
}

impl PixelCodec for NativeCodec {
    type Pixels = DynamicImage;

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage> {
        Ok(image::load_from_memory(bytes)?)
    }

    fn encode(&self, pixels: &DynamicImage, format: OutputFormat, quality: Quality) -> Result<Vec<u8>> {
        let output_format = match format {
            OutputFormat::Jpeg => ImageOutputFormat::Jpeg(quality.get()),
            OutputFormat::Png => ImageOutputFormat::Png,
            OutputFormat::WebP => ImageOutputFormat::WebP,
            OutputFormat::Avif => return Err(CodecError::UnsupportedFormat(format)),
        };

        // Baseline JPEG rejects RGBA input, so transparency is flattened
        // over the configured background first.
        let flattened;
        let source = if format == OutputFormat::Jpeg && has_alpha(pixels) {
            flattened = flatten_alpha(pixels, self.background);
            &flattened
        } else {
            pixels
        };

        let mut buffer = Cursor::new(Vec::new());
        source.write_to(&mut buffer, output_format)?;
        Ok(buffer.into_inner())
    }

    fn supports_encode(&self, format: OutputFormat) -> bool {
        !matches!(format, OutputFormat::Avif)
    }
}

/// Check if an image carries an alpha channel.
fn has_alpha(img: &DynamicImage) -> bool {
    matches!(
        img,
        DynamicImage::ImageRgba8(_)
            | DynamicImage::ImageRgba16(_)
            | DynamicImage::ImageRgba32F(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLumaA16(_)
    )
}

/// Composite an image over a solid background, dropping the alpha channel.
fn flatten_alpha(img: &DynamicImage, background: [u8; 3]) -> DynamicImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut output = ImageBuffer::new(width, height);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *pixel;
        let alpha = f32::from(a) / 255.0;
        let inv = 1.0 - alpha;

        let blend = |channel: u8, bg: u8| (f32::from(channel) * alpha + f32::from(bg) * inv) as u8;
        output.put_pixel(
            x,
            y,
            Rgba([
                blend(r, background[0]),
                blend(g, background[1]),
                blend(b, background[2]),
                255,
            ]),
        );
    }

    DynamicImage::ImageRgba8(output)
}
