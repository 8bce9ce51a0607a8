//! Writing converted artifacts to disk.

use std::path::{Path, PathBuf};

use tracing::debug;

use imgpress_codec::OutputFormat;

use crate::entry::{EntryStatus, QueueEntry};
use crate::error::{QueueError, Result};
use crate::queue::ConversionQueue;

/// Write one completed entry's converted payload into `dir`.
///
/// The artifact is named from the original file's stem and the extension of
/// the format the payload was actually encoded as, so contents always match
/// the name even after a fallback substitution. Errors with
/// [`QueueError::NotCompleted`] for entries in any other status.
pub fn export_entry(entry: &QueueEntry, dir: &Path) -> Result<PathBuf> {
    let payload = entry
        .converted()
        .ok_or_else(|| QueueError::NotCompleted(entry.id()))?;

    let path = dir.join(artifact_file_name(entry.file_name(), payload.format()));
    std::fs::write(&path, payload.bytes())?;
    debug!(id = %entry.id(), path = %path.display(), "exported artifact");
    Ok(path)
}

/// Export every completed entry, in queue order.
///
/// Pending, processing and error entries are skipped, not failed.
pub fn export_completed(queue: &ConversionQueue, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for entry in queue.iter() {
        if entry.status() == EntryStatus::Completed {
            written.push(export_entry(entry, dir)?);
        }
    }
    Ok(written)
}

/// Artifact name: original stem plus the effective format's extension.
fn artifact_file_name(file_name: &str, format: OutputFormat) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("image");
    format!("{}.{}", stem, format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::ConvertedPayload;
    use crate::preview::PreviewHandle;
    use crate::queue::CandidateFile;
    use crate::settings::ConversionSettings;
    use crate::Orchestrator;
    use imgpress_codec::{PixelCodec, Quality, Result as CodecResult};

    struct EchoCodec;

    impl PixelCodec for EchoCodec {
        type Pixels = Vec<u8>;

        fn decode(&self, bytes: &[u8]) -> CodecResult<Vec<u8>> {
            Ok(bytes.to_vec())
        }

        fn encode(&self, pixels: &Vec<u8>, _format: OutputFormat, _quality: Quality) -> CodecResult<Vec<u8>> {
            Ok(pixels.to_vec())
        }

        fn supports_encode(&self, _format: OutputFormat) -> bool {
            true
        }
    }

    fn completed_queue() -> ConversionQueue {
        let mut queue = ConversionQueue::new();
        queue.admit(vec![
            CandidateFile::new("holiday photo.jpeg", "image/jpeg", vec![1, 2, 3]),
            CandidateFile::new("logo.png", "image/png", vec![4, 5]),
        ]);
        let settings = ConversionSettings::new(OutputFormat::WebP, Quality::default());
        Orchestrator::new(EchoCodec).run(&mut queue, &settings);
        queue
    }

    #[test]
    fn test_artifact_name_uses_effective_extension() {
        assert_eq!(artifact_file_name("photo.png", OutputFormat::WebP), "photo.webp");
        assert_eq!(artifact_file_name("archive.old.tiff", OutputFormat::Jpeg), "archive.old.jpg");
        assert_eq!(artifact_file_name("noext", OutputFormat::Png), "noext.png");
    }

    #[test]
    fn test_export_completed_writes_in_queue_order() {
        let queue = completed_queue();
        let dir = tempfile::tempdir().unwrap();

        let written = export_completed(&queue, dir.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].file_name().unwrap(), "holiday photo.webp");
        assert_eq!(written[1].file_name().unwrap(), "logo.webp");
        assert_eq!(std::fs::read(&written[1]).unwrap(), vec![4, 5]);
    }

    #[test]
    fn test_export_rejects_pending_entry() {
        let mut queue = ConversionQueue::new();
        queue.admit(vec![CandidateFile::new("a.png", "image/png", vec![0; 8])]);
        let entry = queue.iter().next().unwrap();
        let dir = tempfile::tempdir().unwrap();

        let result = export_entry(entry, dir.path());
        assert!(matches!(result, Err(QueueError::NotCompleted(_))));
    }

    #[test]
    fn test_export_all_skips_unsettled_entries() {
        let mut queue = completed_queue();
        queue.admit(vec![CandidateFile::new("late.png", "image/png", vec![0; 8])]);
        let dir = tempfile::tempdir().unwrap();

        let written = export_completed(&queue, dir.path()).unwrap();
        assert_eq!(written.len(), 2);
    }

    #[test]
    fn test_payload_accessors() {
        let payload = ConvertedPayload::new(vec![1, 2, 3, 4], OutputFormat::Jpeg);
        assert_eq!(payload.size(), 4);
        assert_eq!(payload.format(), OutputFormat::Jpeg);

        let handle = PreviewHandle::new(vec![9; 10]);
        assert_eq!(handle.size(), 10);
    }
}
