//! Terminal output utilities
//!
//! Provides consistent formatting for conversion results.

use owo_colors::OwoColorize;

use imgpress_queue::{EntryStatus, QueueStats};

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.len()));
    }
}

/// Colored one-character badge for an entry status.
pub fn status_badge(status: EntryStatus) -> String {
    match status {
        EntryStatus::Pending => format!("{}", "·".dimmed()),
        EntryStatus::Processing => format!("{}", "…".blue()),
        EntryStatus::Completed => format!("{}", "✓".green()),
        EntryStatus::Error => format!("{}", "✗".red()),
    }
}

/// Format a file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format the size change of one conversion, e.g.
/// `2.00 MB -> 500.00 KB (saved 76%)`.
pub fn format_reduction(original: u64, converted: u64, ratio: i32) -> String {
    let change = if ratio >= 0 {
        format!("saved {}%", ratio)
    } else {
        format!("grew {}%", -ratio)
    };
    format!(
        "{} -> {} ({})",
        format_size(original),
        format_size(converted),
        change
    )
}

/// Print the aggregate statistics block after a run.
pub fn print_stats(stats: &QueueStats) {
    Status::header("Statistics");
    println!("  Files:           {} total, {} completed", stats.total, stats.completed);
    println!("  Original size:   {}", format_size(stats.original_bytes));
    if stats.completed > 0 {
        println!("  Converted size:  {}", format_size(stats.converted_bytes));
        println!("  Space saved:     {}%", stats.compression_ratio());
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
