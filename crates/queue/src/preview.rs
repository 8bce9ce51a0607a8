//! Transient preview handles with guaranteed single release.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts preview releases.
///
/// Handles created with a probe bump its counter exactly once when they are
/// released, which is how tests observe that removal and clearing revoke
/// every handle.
#[derive(Debug, Clone, Default)]
pub struct ReleaseProbe(Arc<AtomicUsize>);

impl ReleaseProbe {
    /// Fresh probe with a zero count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles released so far.
    pub fn releases(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

/// Transient, revocable reference to the displayable rendering of a source
/// payload.
///
/// Each queue entry owns exactly one handle. Release happens exactly once,
/// either through [`release`](Self::release) or when the handle is dropped
/// with its entry; single ownership makes a double release unrepresentable.
#[derive(Debug)]
pub struct PreviewHandle {
    data: Vec<u8>,
    probe: Option<ReleaseProbe>,
}

impl PreviewHandle {
    /// Derive a handle over the source bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, probe: None }
    }

    /// Derive a handle whose release is observed by `probe`.
    pub fn with_probe(data: Vec<u8>, probe: ReleaseProbe) -> Self {
        Self {
            data,
            probe: Some(probe),
        }
    }

    /// The source bytes behind the handle.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size of the referenced payload in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Release the handle now instead of at end of scope.
    pub fn release(self) {}
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if let Some(probe) = &self.probe {
            probe.0.fetch_add(1, Ordering::Relaxed);
        }
    }
}
