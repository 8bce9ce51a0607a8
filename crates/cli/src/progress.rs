//! Progress indicators
//!
//! Provides progress bars for batch conversion runs.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use imgpress_queue::{EntryStatus, ProgressEvent};

/// Create a progress bar over a batch of queued images.
pub fn batch_progress(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} images {msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Feed one orchestrator progress event into the batch bar.
///
/// The bar advances one tick per settled entry; in-flight milestones only
/// update the message line.
pub fn observe(pb: &ProgressBar, event: &ProgressEvent) {
    match event.status {
        EntryStatus::Processing => {
            pb.set_message(format!("{} ({}%)", event.file_name, event.progress));
        }
        EntryStatus::Completed | EntryStatus::Error => {
            pb.set_message(event.file_name.clone());
            pb.inc(1);
        }
        EntryStatus::Pending => {}
    }
}

/// Finish a progress bar with a success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

/// Finish a progress bar with an error message
pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✗ {}", message));
}
