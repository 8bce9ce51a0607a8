//! The conversion queue: admission and mutation operations.

use tracing::debug;

use crate::entry::{EntryId, EntryStatus, QueueEntry};
use crate::preview::{PreviewHandle, ReleaseProbe};
use crate::stats::QueueStats;

/// Media-type prefix that gates admission.
pub const IMAGE_MEDIA_PREFIX: &str = "image/";

/// A candidate file offered for admission.
///
/// The file-like boundary of the system: a name, a declared media type and
/// the byte payload. How the media type was derived (sniffed, extension,
/// upstream metadata) is the caller's concern.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl CandidateFile {
    /// Wrap a file-like input for admission.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// The candidate's file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The candidate's declared media type.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Whether the declared media type admits this candidate.
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with(IMAGE_MEDIA_PREFIX)
    }
}

/// Ordered queue of admitted images.
///
/// The queue holds entries for the duration of a session; entries leave only
/// through [`remove`](Self::remove) or [`clear`](Self::clear), both of which
/// release the entry's preview handle.
#[derive(Debug, Default)]
pub struct ConversionQueue {
    entries: Vec<QueueEntry>,
    probe: Option<ReleaseProbe>,
}

impl ConversionQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty queue whose preview releases are observed by `probe`.
    pub fn with_release_probe(probe: ReleaseProbe) -> Self {
        Self {
            entries: Vec::new(),
            probe: Some(probe),
        }
    }

    /// Admit candidates whose media type indicates an image.
    ///
    /// Each accepted candidate becomes one pending entry appended to the end
    /// of the queue, preserving offer order. Rejected candidates leave no
    /// trace. Returns the ids of the admitted entries.
    pub fn admit<I>(&mut self, candidates: I) -> Vec<EntryId>
    where
        I: IntoIterator<Item = CandidateFile>,
    {
        let mut admitted = Vec::new();
        for candidate in candidates {
            if !candidate.is_image() {
                debug!(
                    name = %candidate.name,
                    media_type = %candidate.media_type,
                    "rejected non-image candidate"
                );
                continue;
            }

            let CandidateFile {
                name,
                media_type,
                bytes,
            } = candidate;
            let preview = match &self.probe {
                Some(probe) => PreviewHandle::with_probe(bytes, probe.clone()),
                None => PreviewHandle::new(bytes),
            };
            let entry = QueueEntry::admit(name, media_type, preview);
            debug!(id = %entry.id(), size = entry.original_size(), "admitted candidate");
            admitted.push(entry.id());
            self.entries.push(entry);
        }
        admitted
    }

    /// Remove one entry, releasing its handles. Returns whether it existed.
    pub fn remove(&mut self, id: EntryId) -> bool {
        match self.entries.iter().position(|entry| entry.id() == id) {
            Some(index) => {
                let entry = self.entries.remove(index);
                debug!(id = %entry.id(), "removed entry");
                drop(entry);
                true
            }
            None => false,
        }
    }

    /// Remove every entry, releasing all handles.
    pub fn clear(&mut self) {
        debug!(count = self.entries.len(), "clearing queue");
        self.entries.clear();
    }

    /// Number of entries currently in the queue.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in queue order.
    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    /// Look up one entry.
    pub fn get(&self, id: EntryId) -> Option<&QueueEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: EntryId) -> Option<&mut QueueEntry> {
        self.entries.iter_mut().find(|entry| entry.id() == id)
    }

    /// Ids of entries pending at this moment, in queue order.
    pub fn pending_ids(&self) -> Vec<EntryId> {
        self.entries
            .iter()
            .filter(|entry| entry.status() == EntryStatus::Pending)
            .map(QueueEntry::id)
            .collect()
    }

    /// Derived statistics over the current queue state.
    pub fn stats(&self) -> QueueStats {
        QueueStats::collect(self.entries.iter())
    }
}
