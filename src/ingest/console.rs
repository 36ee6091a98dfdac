//! Console mirror - human-readable echo of every ingested record

use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::types::LogRecord;

/// Longest data preview printed before truncation
pub const DATA_PREVIEW_CHARS: usize = 200;

/// Stack lines printed under an error
pub const STACK_PREVIEW_LINES: usize = 3;

/// Writes a short summary of each stored record to stdout
#[derive(Debug, Clone, Copy)]
pub struct ConsoleMirror {
    enabled: bool,
}

impl ConsoleMirror {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A mirror that prints nothing
    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Print the record summary if mirroring is on
    pub fn show(&self, record: &LogRecord) {
        if self.enabled {
            println!("{}", render(record));
        }
    }
}

impl Default for ConsoleMirror {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Render the multi-line console summary for a record
pub fn render(record: &LogRecord) -> String {
    let time = DateTime::<Utc>::from_timestamp_millis(record.received_at)
        .map(|dt| dt.format("%H:%M:%S%.3f").to_string())
        .unwrap_or_default();

    let level = record.level().to_uppercase();
    let level = match record.level() {
        "error" => level.red().bold(),
        "warn" => level.yellow().bold(),
        "debug" => level.dimmed(),
        _ => level.cyan(),
    };

    let mut out = format!(
        "{} {} {} {}",
        format!("#{}", record.sequence_number).dimmed(),
        time.dimmed(),
        level,
        record.message().unwrap_or("(no message)"),
    );

    if let Some(location) = record.location() {
        out.push_str(&format!("\n    {} {}", "at".dimmed(), location.blue()));
    }

    if let Some(session) = record.session_id() {
        out.push_str(&format!("\n    {} {}", "session".dimmed(), session));
    }

    if let Some(hypothesis) = record.hypothesis_id() {
        out.push_str(&format!("\n    {} {}", "hypothesis".dimmed(), hypothesis.magenta()));
    }

    if let Some(data) = record.data() {
        out.push_str(&format!("\n    {} {}", "data".dimmed(), preview(&data.to_string())));
    }

    if let Some(error) = record.error() {
        let message = error.message.as_deref().unwrap_or("(no message)");
        let label = match &error.name {
            Some(name) => format!("{}: {}", name, message),
            None => message.to_string(),
        };
        out.push_str(&format!("\n    {} {}", "error".red(), label.red()));
        for line in error.stack_head(STACK_PREVIEW_LINES) {
            out.push_str(&format!("\n      {}", line.dimmed()));
        }
    }

    out
}

/// Truncate on a char boundary, marking the cut with an ellipsis
fn preview(text: &str) -> String {
    match text.char_indices().nth(DATA_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
