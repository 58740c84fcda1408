//! Append-only transcript log shared by the UI surfaces.

use chrono::Local;
use parking_lot::RwLock;

/// A single transcript entry. The timestamp is captured at append time
/// and kept separate from the text so callers can render either form.
#[derive(Debug, Clone)]
pub struct Entry {
    pub stamp: Option<String>,
    pub text: String,
}

/// Append-only log of display lines.
///
/// The console surface timestamps every line the way the popup did
/// (`[HH:MM:SS] text`); the bubble surface logs bare text.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: RwLock<Vec<Entry>>,
    timestamped: bool,
}

impl Transcript {
    /// Transcript without timestamps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcript that stamps each line with the local wall-clock time.
    pub fn timestamped() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            timestamped: true,
        }
    }

    /// Append a line. The stamp, if any, is taken at append time.
    pub fn push(&self, text: impl Into<String>) {
        let stamp = self
            .timestamped
            .then(|| Local::now().format("%H:%M:%S").to_string());
        self.entries.write().push(Entry {
            stamp,
            text: text.into(),
        });
    }

    /// Raw line texts, without timestamps.
    pub fn texts(&self) -> Vec<String> {
        self.entries.read().iter().map(|e| e.text.clone()).collect()
    }

    /// Display lines, timestamp-prefixed where present.
    pub fn rendered(&self) -> Vec<String> {
        self.entries
            .read()
            .iter()
            .map(|e| match &e.stamp {
                Some(stamp) => format!("[{}] {}", stamp, e.text),
                None => e.text.clone(),
            })
            .collect()
    }

    /// Entries appended at or after `start`, with their render form.
    ///
    /// Used by the REPL to print only what arrived since the last poll.
    pub fn rendered_from(&self, start: usize) -> Vec<String> {
        self.entries
            .read()
            .iter()
            .skip(start)
            .map(|e| match &e.stamp {
                Some(stamp) => format!("[{}] {}", stamp, e.text),
                None => e.text.clone(),
            })
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Most recent line text.
    pub fn last(&self) -> Option<String> {
        self.entries.read().last().map(|e| e.text.clone())
    }
}
