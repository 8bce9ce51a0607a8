//! File-queue state machine and conversion orchestration for imgpress.
//!
//! This crate provides:
//! - Queue entries with an explicit conversion lifecycle
//! - Admission of candidate files filtered on media type
//! - Sequential orchestrator runs over pending entries
//! - Queue mutation operations (remove, clear) with guaranteed handle release
//! - Derived statistics and artifact export
//!
//! All pixel work is delegated through the
//! [`PixelCodec`](imgpress_codec::PixelCodec) seam, so everything here runs
//! against a mock codec in tests.

#![warn(missing_docs)]

mod config;
mod entry;
mod error;
mod export;
mod orchestrator;
mod preview;
mod queue;
mod settings;
mod stats;

pub use config::AppConfig;
pub use entry::{ConvertedPayload, EntryId, EntryStatus, QueueEntry};
pub use error::{QueueError, Result};
pub use export::{export_completed, export_entry};
pub use orchestrator::{Orchestrator, ProgressEvent, RunSummary};
pub use preview::{PreviewHandle, ReleaseProbe};
pub use queue::{CandidateFile, ConversionQueue, IMAGE_MEDIA_PREFIX};
pub use settings::{builtin_presets, find_preset, ConversionSettings, Preset};
pub use stats::{compression_ratio, QueueStats};
