//! Sequential conversion runs over pending queue entries.

use serde::Serialize;
use tracing::{debug, warn};

use imgpress_codec::{CodecError, OutputFormat, PixelCodec};

use crate::entry::{ConvertedPayload, EntryId, EntryStatus, QueueEntry};
use crate::queue::ConversionQueue;
use crate::settings::ConversionSettings;

// Synthetic progress milestones; the underlying encode call is a single
// atomic operation, so these mark phase boundaries rather than byte counts.
const PROGRESS_DECODE: u8 = 30;
const PROGRESS_ENCODE: u8 = 70;

/// Progress notification emitted as a run advances.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    /// Entry the event concerns
    pub id: EntryId,
    /// File name of that entry
    pub file_name: String,
    /// Advisory 0-100 progress
    pub progress: u8,
    /// Status after the step that produced this event
    pub status: EntryStatus,
}

impl ProgressEvent {
    fn snapshot(entry: &QueueEntry) -> Self {
        Self {
            id: entry.id(),
            file_name: entry.file_name().to_string(),
            progress: entry.progress(),
            status: entry.status(),
        }
    }
}

/// Outcome of one orchestrator run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Entries that were pending at run start
    pub processed: usize,
    /// Entries that reached completed
    pub completed: usize,
    /// Entries that settled in error
    pub failed: usize,
    /// Format actually encoded, after fallback resolution; `None` when the
    /// bound codec supports nothing on the chain
    pub effective_format: Option<OutputFormat>,
}

/// Drives pending entries through decode and encode, one at a time.
///
/// A run settles each entry (completed or error) before looking at the
/// next; a failure never aborts the batch. Settings are resolved once at
/// run start, so changes between runs only affect entries not yet started.
#[derive(Debug)]
pub struct Orchestrator<C> {
    codec: C,
}

impl<C: PixelCodec> Orchestrator<C> {
    /// Orchestrator bound to a codec.
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    /// Resolve the format a run would actually encode.
    ///
    /// Walks the fixed fallback chain from `requested` until the codec
    /// reports an encoder. `None` if the chain is exhausted.
    pub fn resolve_format(&self, requested: OutputFormat) -> Option<OutputFormat> {
        let mut format = requested;
        loop {
            if self.codec.supports_encode(format) {
                if format != requested {
                    warn!(%requested, substitute = %format, "no encoder for requested format, substituting");
                }
                return Some(format);
            }
            format = format.fallback()?;
        }
    }

    /// Process every entry pending at run start, in queue order.
    pub fn run(&self, queue: &mut ConversionQueue, settings: &ConversionSettings) -> RunSummary {
        self.run_with_progress(queue, settings, |_| {})
    }

    /// [`run`](Self::run), emitting a [`ProgressEvent`] at each milestone.
    pub fn run_with_progress<F>(
        &self,
        queue: &mut ConversionQueue,
        settings: &ConversionSettings,
        mut on_progress: F,
    ) -> RunSummary
    where
        F: FnMut(ProgressEvent),
    {
        let pending = queue.pending_ids();
        let effective_format = self.resolve_format(settings.format);
        let mut summary = RunSummary {
            effective_format,
            ..RunSummary::default()
        };

        for id in pending {
            let Some(entry) = queue.get_mut(id) else {
                continue;
            };
            if entry.status() != EntryStatus::Pending {
                continue;
            }
            summary.processed += 1;

            match self.convert_one(entry, effective_format, settings, &mut on_progress) {
                Ok(()) => {
                    summary.completed += 1;
                    debug!(
                        %id,
                        size = entry.converted_size().unwrap_or(0),
                        "entry completed"
                    );
                }
                Err(err) => {
                    summary.failed += 1;
                    warn!(%id, error = %err, "entry failed, continuing with the rest of the queue");
                }
            }
            on_progress(ProgressEvent::snapshot(entry));
        }

        summary
    }

    /// Settle one pending entry: completed on success, error on failure.
    fn convert_one<F>(
        &self,
        entry: &mut QueueEntry,
        format: Option<OutputFormat>,
        settings: &ConversionSettings,
        on_progress: &mut F,
    ) -> Result<(), CodecError>
    where
        F: FnMut(ProgressEvent),
    {
        if entry.start_processing(PROGRESS_DECODE).is_err() {
            // Pending was checked by the caller; nothing to settle.
            return Ok(());
        }
        on_progress(ProgressEvent::snapshot(entry));

        let result = self.decode_and_encode(entry, format, settings, on_progress);
        match result {
            Ok(payload) => {
                let settled = entry.complete(payload);
                debug_assert!(settled.is_ok());
                Ok(())
            }
            Err(err) => {
                let settled = entry.fail();
                debug_assert!(settled.is_ok());
                Err(err)
            }
        }
    }

    fn decode_and_encode<F>(
        &self,
        entry: &mut QueueEntry,
        format: Option<OutputFormat>,
        settings: &ConversionSettings,
        on_progress: &mut F,
    ) -> Result<ConvertedPayload, CodecError>
    where
        F: FnMut(ProgressEvent),
    {
        let format = format.ok_or(CodecError::UnsupportedFormat(settings.format))?;
        let pixels = self.codec.decode(entry.preview().data())?;

        entry.set_progress(PROGRESS_ENCODE);
        on_progress(ProgressEvent::snapshot(entry));

        let bytes = self.codec.encode(&pixels, format, settings.quality)?;
        Ok(ConvertedPayload::new(bytes, format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::CandidateFile;
    use imgpress_codec::{Quality, Result as CodecResult};
    use std::collections::HashSet;

    /// Codec stub that "decodes" any payload and echoes bytes back on
    /// encode, with configurable encoder coverage and failure injection.
    struct StubCodec {
        supported: Vec<OutputFormat>,
        fail_decode_on: Option<u8>,
    }

    impl StubCodec {
        fn supporting(formats: &[OutputFormat]) -> Self {
            Self {
                supported: formats.to_vec(),
                fail_decode_on: None,
            }
        }

        fn failing_decode_on(mut self, marker: u8) -> Self {
            self.fail_decode_on = Some(marker);
            self
        }
    }

    impl PixelCodec for StubCodec {
        type Pixels = Vec<u8>;

        fn decode(&self, bytes: &[u8]) -> CodecResult<Vec<u8>> {
            if let Some(marker) = self.fail_decode_on {
                if bytes.first() == Some(&marker) {
                    return Err(CodecError::Decode("marked payload".into()));
                }
            }
            Ok(bytes.to_vec())
        }

        fn encode(&self, pixels: &Vec<u8>, format: OutputFormat, _quality: Quality) -> CodecResult<Vec<u8>> {
            if !self.supports_encode(format) {
                return Err(CodecError::UnsupportedFormat(format));
            }
            // Echo half the bytes so converted size differs from original.
            Ok(pixels[..pixels.len() / 2].to_vec())
        }

        fn supports_encode(&self, format: OutputFormat) -> bool {
            self.supported.contains(&format)
        }
    }

    fn settings(format: OutputFormat, quality: u8) -> ConversionSettings {
        ConversionSettings::new(format, Quality::new(quality).unwrap())
    }

    fn queue_with(sizes: &[usize]) -> ConversionQueue {
        let mut queue = ConversionQueue::new();
        let candidates: Vec<_> = sizes
            .iter()
            .enumerate()
            .map(|(i, size)| CandidateFile::new(format!("f{i}.png"), "image/png", vec![1; *size]))
            .collect();
        queue.admit(candidates);
        queue
    }

    #[test]
    fn test_run_completes_pending_entries() {
        let mut queue = queue_with(&[500 * 1024, 2 * 1024 * 1024]);
        let orchestrator = Orchestrator::new(StubCodec::supporting(&[OutputFormat::WebP]));

        let summary = orchestrator.run(&mut queue, &settings(OutputFormat::WebP, 80));

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.effective_format, Some(OutputFormat::WebP));
        for entry in queue.iter() {
            assert_eq!(entry.status(), EntryStatus::Completed);
            assert_eq!(entry.progress(), 100);
            assert!(entry.converted_size().unwrap() > 0);
        }
    }

    #[test]
    fn test_failure_does_not_halt_batch() {
        let mut queue = ConversionQueue::new();
        queue.admit(vec![
            CandidateFile::new("bad.png", "image/png", vec![9; 64]),
            CandidateFile::new("good.png", "image/png", vec![1; 64]),
        ]);
        let codec = StubCodec::supporting(&[OutputFormat::WebP]).failing_decode_on(9);
        let orchestrator = Orchestrator::new(codec);

        let summary = orchestrator.run(&mut queue, &settings(OutputFormat::WebP, 80));

        assert_eq!(summary.completed, 1);
        assert_eq!(summary.failed, 1);
        let statuses: Vec<_> = queue.iter().map(QueueEntry::status).collect();
        assert_eq!(statuses, vec![EntryStatus::Error, EntryStatus::Completed]);
        assert!(queue.iter().next().unwrap().converted().is_none());
    }

    #[test]
    fn test_second_run_is_noop() {
        let mut queue = queue_with(&[64, 128]);
        let orchestrator = Orchestrator::new(StubCodec::supporting(&[OutputFormat::Jpeg]));
        let settings = settings(OutputFormat::Jpeg, 80);

        orchestrator.run(&mut queue, &settings);
        let before: Vec<_> = queue
            .iter()
            .map(|e| (e.status(), e.progress(), e.converted_size()))
            .collect();

        let summary = orchestrator.run(&mut queue, &settings);
        let after: Vec<_> = queue
            .iter()
            .map(|e| (e.status(), e.progress(), e.converted_size()))
            .collect();

        assert_eq!(summary.processed, 0);
        assert_eq!(before, after);
    }

    #[test]
    fn test_avif_falls_back_to_webp() {
        let mut queue = queue_with(&[64]);
        let codec = StubCodec::supporting(&[OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::WebP]);
        let orchestrator = Orchestrator::new(codec);

        let summary = orchestrator.run(&mut queue, &settings(OutputFormat::Avif, 80));

        assert_eq!(summary.effective_format, Some(OutputFormat::WebP));
        assert_eq!(summary.completed, 1);
        let entry = queue.iter().next().unwrap();
        assert_eq!(entry.converted().unwrap().format(), OutputFormat::WebP);
    }

    #[test]
    fn test_codec_without_encoders_fails_entries_without_aborting() {
        let mut queue = queue_with(&[64, 64]);
        let orchestrator = Orchestrator::new(StubCodec::supporting(&[]));

        let summary = orchestrator.run(&mut queue, &settings(OutputFormat::Avif, 80));

        assert_eq!(summary.effective_format, None);
        assert_eq!(summary.failed, 2);
        assert!(queue.iter().all(|e| e.status() == EntryStatus::Error));
    }

    #[test]
    fn test_progress_milestones_in_order() {
        let mut queue = queue_with(&[64]);
        let orchestrator = Orchestrator::new(StubCodec::supporting(&[OutputFormat::WebP]));

        let mut milestones = Vec::new();
        orchestrator.run_with_progress(&mut queue, &settings(OutputFormat::WebP, 80), |event| {
            milestones.push((event.progress, event.status));
        });

        assert_eq!(
            milestones,
            vec![
                (30, EntryStatus::Processing),
                (70, EntryStatus::Processing),
                (100, EntryStatus::Completed),
            ]
        );
    }

    #[test]
    fn test_settled_entries_untouched_by_later_runs() {
        let mut queue = queue_with(&[64]);
        let orchestrator = Orchestrator::new(StubCodec::supporting(&[OutputFormat::WebP]));
        orchestrator.run(&mut queue, &settings(OutputFormat::WebP, 80));

        // Admit one more and rerun; the settled entry keeps its payload.
        queue.admit(vec![CandidateFile::new("late.png", "image/png", vec![1; 32])]);
        let summary = orchestrator.run(&mut queue, &settings(OutputFormat::WebP, 80));

        assert_eq!(summary.processed, 1);
        let statuses: HashSet<_> = queue.iter().map(|e| e.status()).collect();
        assert_eq!(statuses, HashSet::from([EntryStatus::Completed]));
    }

    #[test]
    fn test_size_accounting_independent_of_outcome() {
        let mut queue = ConversionQueue::new();
        queue.admit(vec![
            CandidateFile::new("bad.png", "image/png", vec![9; 100]),
            CandidateFile::new("good.png", "image/png", vec![1; 300]),
        ]);
        let before = queue.stats().original_bytes;

        let codec = StubCodec::supporting(&[OutputFormat::WebP]).failing_decode_on(9);
        Orchestrator::new(codec).run(&mut queue, &settings(OutputFormat::WebP, 80));

        let stats = queue.stats();
        assert_eq!(stats.original_bytes, before);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.converted_bytes, 150);
    }
}
