//! Output format model and fallback chain.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CodecError;

/// Output formats offered on the settings surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JPEG output
    Jpeg,
    /// PNG output
    Png,
    /// WebP output
    WebP,
    /// AVIF output
    Avif,
}

impl OutputFormat {
    /// Every selectable output format, in display order.
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Jpeg,
        OutputFormat::Png,
        OutputFormat::WebP,
        OutputFormat::Avif,
    ];

    /// Get the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
            OutputFormat::Avif => "image/avif",
        }
    }

    /// File extension used when naming converted artifacts.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
            OutputFormat::Avif => "avif",
        }
    }

    /// Next format to try when the bound codec has no encoder for this one.
    ///
    /// The chain is fixed so substitution stays deterministic regardless of
    /// which codec is bound: AVIF -> WebP -> JPEG -> PNG. PNG is the end of
    /// the chain.
    pub fn fallback(&self) -> Option<OutputFormat> {
        match self {
            OutputFormat::Avif => Some(OutputFormat::WebP),
            OutputFormat::WebP => Some(OutputFormat::Jpeg),
            OutputFormat::Jpeg => Some(OutputFormat::Png),
            OutputFormat::Png => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
            OutputFormat::Avif => "avif",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            "avif" => Ok(OutputFormat::Avif),
            other => Err(CodecError::UnknownFormatName(other.to_string())),
        }
    }
}
