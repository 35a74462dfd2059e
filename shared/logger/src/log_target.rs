//! Log destinations.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// Where a [`Logger`](crate::Logger) sends its messages.
#[derive(Debug, Clone)]
pub enum LogTarget {
    /// Appends to a file, created if it doesn't exist.
    File(PathBuf),
    Stderr,
    /// Keeps formatted lines in memory.
    Memory(MemoryLog),
}

/// Shared in-memory buffer of formatted log lines.
///
/// Clones see the same lines. Lines are recorded on the calling thread, with no writer
/// thread in between, so a test can assert right after the call that logged.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines logged so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns true if any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|line| line.contains(needle))
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub(crate) fn push(&self, line: String) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }
}
