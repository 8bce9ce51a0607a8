//! Derived statistics over the queue.

use serde::{Deserialize, Serialize};

use crate::entry::{EntryStatus, QueueEntry};

/// Aggregate statistics, recomputed from current queue state.
///
/// Converted bytes only sum over completed entries; error and pending
/// entries contribute to the original total but never to the converted one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Total entries in the queue
    pub total: usize,
    /// Entries with a converted payload
    pub completed: usize,
    /// Sum of original sizes over all entries
    pub original_bytes: u64,
    /// Sum of converted sizes over completed entries
    pub converted_bytes: u64,
}

impl QueueStats {
    /// Compute statistics over entries in queue order.
    pub(crate) fn collect<'a, I>(entries: I) -> Self
    where
        I: Iterator<Item = &'a QueueEntry>,
    {
        let mut stats = QueueStats::default();
        for entry in entries {
            stats.total += 1;
            stats.original_bytes += entry.original_size();
            if entry.status() == EntryStatus::Completed {
                stats.completed += 1;
                stats.converted_bytes += entry.converted_size().unwrap_or(0);
            }
        }
        stats
    }

    /// Aggregate space saved as a rounded percentage.
    ///
    /// 0 until at least one entry has completed.
    pub fn compression_ratio(&self) -> i32 {
        if self.completed == 0 {
            return 0;
        }
        compression_ratio(self.original_bytes, Some(self.converted_bytes))
    }
}

/// Rounded percentage saved by conversion: `100 * (original - converted) /
/// original`.
///
/// By convention 0 when the converted size is unknown or the original size
/// is 0. Negative when conversion grew the payload.
pub fn compression_ratio(original: u64, converted: Option<u64>) -> i32 {
    let Some(converted) = converted else {
        return 0;
    };
    if original == 0 {
        return 0;
    }
    let saved = original as f64 - converted as f64;
    (100.0 * saved / original as f64).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_reference_case() {
        assert_eq!(compression_ratio(1_000_000, Some(250_000)), 75);
    }

    #[test]
    fn test_ratio_absent_converted() {
        assert_eq!(compression_ratio(1_000_000, None), 0);
    }

    #[test]
    fn test_ratio_zero_original() {
        assert_eq!(compression_ratio(0, Some(100)), 0);
    }

    #[test]
    fn test_ratio_negative_when_payload_grows() {
        assert_eq!(compression_ratio(100, Some(150)), -50);
    }

    #[test]
    fn test_ratio_rounds() {
        // 1000 -> 667 saves 33.3%, rounds to 33
        assert_eq!(compression_ratio(1000, Some(667)), 33);
        // 1000 -> 665 saves 33.5%, rounds to 34
        assert_eq!(compression_ratio(1000, Some(665)), 34);
    }

    #[test]
    fn test_stats_ratio_zero_without_completions() {
        let stats = QueueStats {
            total: 3,
            completed: 0,
            original_bytes: 4096,
            converted_bytes: 0,
        };
        assert_eq!(stats.compression_ratio(), 0);
    }
}
