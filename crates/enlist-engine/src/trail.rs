// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded, timestamped log of user-facing events.
//!
//! The trail is what `/status` shows to the operator. Every entry is also
//! emitted through `tracing` so it lands in the process log.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default number of retained entries.
pub const DEFAULT_CAPACITY: usize = 100;

/// Ring buffer of `[HH:MM:SS] message` entries.
#[derive(Debug)]
pub struct LogTrail {
    capacity: usize,
    entries: Mutex<VecDeque<String>>,
}

impl LogTrail {
    /// Creates an empty trail. A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Appends a message, evicting the oldest entry past capacity.
    pub fn push(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");

        let entry = format!("[{}] {message}", chrono::Local::now().format("%H:%M:%S"));
        let mut entries = self.entries();
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// The last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<String> {
        let entries = self.entries();
        let skip = entries.len().saturating_sub(n);
        entries.iter().skip(skip).cloned().collect()
    }

    /// Every retained entry, oldest first.
    pub fn snapshot(&self) -> Vec<String> {
        self.recent(self.capacity)
    }

    fn entries(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LogTrail {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn entries_are_timestamped() {
        let trail = LogTrail::default();
        trail.push("hello");
        let entries = trail.snapshot();
        assert_eq!(entries.len(), 1);
        // "[HH:MM:SS] hello"
        assert!(entries[0].starts_with('['));
        assert_eq!(&entries[0][9..], "] hello");
    }

    #[test]
    fn oldest_entries_are_dropped_past_capacity() {
        let trail = LogTrail::new(3);
        for i in 0..5 {
            trail.push(format!("event {i}"));
        }
        let entries = trail.snapshot();
        assert_eq!(entries.len(), 3);
        assert!(entries[0].ends_with("event 2"));
        assert!(entries[2].ends_with("event 4"));
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let trail = LogTrail::new(100);
        for i in 0..30 {
            trail.push(format!("event {i}"));
        }
        let recent = trail.recent(20);
        assert_eq!(recent.len(), 20);
        assert!(recent[0].ends_with("event 10"));
        assert!(recent[19].ends_with("event 29"));
        assert_eq!(trail.recent(500).len(), 30);
    }

    #[test]
    fn zero_capacity_keeps_one_entry() {
        let trail = LogTrail::new(0);
        trail.push("a");
        trail.push("b");
        let entries = trail.snapshot();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].ends_with("b"));
    }

    #[test]
    #[traced_test]
    fn entries_are_mirrored_to_tracing() {
        let trail = LogTrail::new(5);
        trail.push("Found 3 users in source group");
        assert!(logs_contain("Found 3 users in source group"));
    }
}
