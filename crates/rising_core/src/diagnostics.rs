//! One-time reporting of recovered failures

use std::collections::HashSet;

use crate::error::SimError;

/// Remembers which failures were already logged
///
/// A missing clip is looked up every frame, so the registry keeps the log to
/// one warning per distinct failure while still counting every occurrence.
#[derive(Debug, Default)]
pub struct Diagnostics {
    reported: HashSet<String>,
    occurrences: u64,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error. Returns true the first time this failure is seen.
    pub fn report(&mut self, error: &SimError) -> bool {
        self.occurrences += 1;
        let first = self.reported.insert(error.report_key());
        if first {
            log::warn!("{error}");
        }
        first
    }

    /// Log a free-form warning once per key
    pub fn warn_once(&mut self, key: &str, message: &str) -> bool {
        self.occurrences += 1;
        let first = self.reported.insert(key.to_string());
        if first {
            log::warn!("{message}");
        }
        first
    }

    /// Check if a key was already reported
    pub fn has_reported(&self, key: &str) -> bool {
        self.reported.contains(key)
    }

    /// Number of distinct failures seen
    pub fn distinct(&self) -> usize {
        self.reported.len()
    }

    /// Total number of reports, including repeats
    pub fn occurrences(&self) -> u64 {
        self.occurrences
    }
}
