//! Queue entries and their conversion lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use imgpress_codec::OutputFormat;

use crate::error::{QueueError, Result};
use crate::preview::PreviewHandle;

/// Opaque identifier for a queue entry, unique for the queue lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(Uuid);

impl EntryId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Conversion lifecycle of an entry.
///
/// Entries only move forward: pending -> processing -> completed or error.
/// A settled entry never becomes pending again without removal and
/// re-admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Admitted, waiting for the next orchestrator run
    Pending,
    /// Currently being decoded or encoded
    Processing,
    /// Converted payload attached
    Completed,
    /// Decode or encode failed; stays until removed
    Error,
}

impl EntryStatus {
    /// Whether the state machine permits moving to `next`.
    pub fn can_transition_to(self, next: EntryStatus) -> bool {
        matches!(
            (self, next),
            (EntryStatus::Pending, EntryStatus::Processing)
                | (EntryStatus::Processing, EntryStatus::Completed)
                | (EntryStatus::Processing, EntryStatus::Error)
        )
    }

    /// Whether the entry has settled.
    pub fn is_settled(self) -> bool {
        matches!(self, EntryStatus::Completed | EntryStatus::Error)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Processing => "processing",
            EntryStatus::Completed => "completed",
            EntryStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// Converted output attached to a completed entry.
#[derive(Debug, Clone)]
pub struct ConvertedPayload {
    bytes: Vec<u8>,
    format: OutputFormat,
}

impl ConvertedPayload {
    /// Wrap encoder output in the format it was actually encoded as.
    pub fn new(bytes: Vec<u8>, format: OutputFormat) -> Self {
        Self { bytes, format }
    }

    /// The converted bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the converted payload.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// The effective output format, after any fallback substitution.
    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// One admitted image tracked through its conversion lifecycle.
///
/// Invariant: the converted payload is present exactly when the status is
/// [`EntryStatus::Completed`]; every mutation path below preserves it.
#[derive(Debug)]
pub struct QueueEntry {
    id: EntryId,
    file_name: String,
    media_type: String,
    original_size: u64,
    preview: PreviewHandle,
    status: EntryStatus,
    progress: u8,
    converted: Option<ConvertedPayload>,
}

impl QueueEntry {
    pub(crate) fn admit(file_name: String, media_type: String, preview: PreviewHandle) -> Self {
        let original_size = preview.size();
        Self {
            id: EntryId::generate(),
            file_name,
            media_type,
            original_size,
            preview,
            status: EntryStatus::Pending,
            progress: 0,
            converted: None,
        }
    }

    /// Identifier assigned at admission.
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Name of the admitted file.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Declared media type of the admitted file.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Byte length of the source payload.
    pub fn original_size(&self) -> u64 {
        self.original_size
    }

    /// The entry's preview handle.
    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }

    /// Current lifecycle status.
    pub fn status(&self) -> EntryStatus {
        self.status
    }

    /// Advisory 0-100 progress indicator.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Converted payload, present only once completed.
    pub fn converted(&self) -> Option<&ConvertedPayload> {
        self.converted.as_ref()
    }

    /// Size of the converted payload, if any.
    pub fn converted_size(&self) -> Option<u64> {
        self.converted.as_ref().map(ConvertedPayload::size)
    }

    pub(crate) fn start_processing(&mut self, milestone: u8) -> Result<()> {
        self.transition(EntryStatus::Processing)?;
        self.progress = milestone.min(100);
        Ok(())
    }

    pub(crate) fn set_progress(&mut self, progress: u8) {
        self.progress = progress.min(100);
    }

    pub(crate) fn complete(&mut self, payload: ConvertedPayload) -> Result<()> {
        self.transition(EntryStatus::Completed)?;
        self.progress = 100;
        self.converted = Some(payload);
        Ok(())
    }

    pub(crate) fn fail(&mut self) -> Result<()> {
        self.transition(EntryStatus::Error)?;
        self.converted = None;
        Ok(())
    }

    fn transition(&mut self, next: EntryStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(QueueError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}
