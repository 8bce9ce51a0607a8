//! Pixel codec layer for imgpress.
//!
//! This crate provides:
//! - The output-format and quality models shared across the workspace
//! - Media-type sniffing from magic bytes
//! - The [`PixelCodec`] seam between queue orchestration and the bound encoder
//! - A native codec backed by the `image` crate
//!
//! The queue crate depends on this one with default features off, so the
//! orchestration logic compiles against the trait and format types without
//! pulling in any real codec.

#![warn(missing_docs)]

mod codec;
mod detect;
mod error;
mod format;
mod quality;

#[cfg(feature = "processing")]
mod native;

pub use codec::PixelCodec;
pub use detect::{media_type_from_extension, sniff_media_type};
pub use error::{CodecError, Result};
pub use format::OutputFormat;
pub use quality::Quality;

#[cfg(feature = "processing")]
pub use native::NativeCodec;
