//! Bounded, timestamped operation trace.

use std::collections::VecDeque;
use std::time::Duration;

/// FIFO trace that keeps only the newest `capacity` lines.
#[derive(Debug, Clone)]
pub struct TraceLog {
    capacity: usize,
    lines: VecDeque<String>,
}

impl TraceLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            lines: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends `message` stamped with `at`, evicting the oldest line if full.
    /// Returns the stamped line.
    pub fn push(&mut self, at: Duration, message: &str) -> String {
        let line = format!("[{}] {message}", timestamp(at));
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.clone());
        line
    }

    pub fn retain(&mut self, keep: impl FnMut(&String) -> bool) {
        self.lines.retain(keep);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Formats elapsed simulator time as `mm:ss.mmm`.
pub fn timestamp(at: Duration) -> String {
    let millis = at.as_millis();
    format!("{:02}:{:02}.{:03}", millis / 60_000, (millis / 1000) % 60, millis % 1000)
}
