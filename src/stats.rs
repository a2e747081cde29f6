//! Session statistics: rolling detection rate, message buffer, timer format.

use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;

use crate::classify::Word;

/// Default trailing window for the detection rate.
pub const DEFAULT_RATE_WINDOW_MS: u64 = 60_000;

/// Rolling count of gesture detections in a trailing window.
///
/// Entries at least one window old are pruned on every update, so the
/// buffer stays bounded by the detections within one window.
#[derive(Clone, Debug)]
pub struct DetectionRate {
    window_ms: u64,
    times: VecDeque<u64>,
}

impl DetectionRate {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            times: VecDeque::new(),
        }
    }

    /// Record a detection at `now_ms` and prune the window.
    pub fn record(&mut self, now_ms: u64) -> usize {
        self.times.push_back(now_ms);
        self.prune(now_ms)
    }

    /// Drop entries outside the window ending at `now_ms`; returns the count.
    pub fn prune(&mut self, now_ms: u64) -> usize {
        let window_ms = self.window_ms;
        self.times
            .retain(|&t| now_ms.saturating_sub(t) < window_ms);
        self.times.len()
    }

    /// Detections currently in the window.
    pub fn per_minute(&self) -> usize {
        self.times.len()
    }

    /// Detections inside the window ending at `now_ms`, without pruning.
    pub fn count_at(&self, now_ms: u64) -> usize {
        self.times
            .iter()
            .filter(|&&t| now_ms.saturating_sub(t) < self.window_ms)
            .count()
    }

    pub fn clear(&mut self) {
        self.times.clear();
    }
}

impl Default for DetectionRate {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_WINDOW_MS)
    }
}

/// Append-only committed word buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Message {
    words: Vec<Word>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, word: Word) {
        self.words.push(word);
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words joined by single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(Word::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }
}

/// `HH:MM:SS`, hours unbounded.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_prunes_entries_older_than_window() {
        let mut rate = DetectionRate::default();
        rate.record(0);
        rate.record(30_000);
        assert_eq!(rate.record(61_000), 2);
        assert_eq!(rate.per_minute(), 2);
    }

    #[test]
    fn rate_boundary_entry_is_pruned() {
        let mut rate = DetectionRate::default();
        rate.record(0);
        assert_eq!(rate.record(60_000), 1);
        assert_eq!(rate.prune(60_000 + 59_999), 1);
        assert_eq!(rate.prune(120_000), 0);
    }

    #[test]
    fn count_at_ages_out_without_new_detections() {
        let mut rate = DetectionRate::default();
        rate.record(0);
        rate.record(10_000);
        assert_eq!(rate.count_at(59_999), 2);
        assert_eq!(rate.count_at(65_000), 1);
        assert_eq!(rate.count_at(70_000), 0);
        assert_eq!(rate.per_minute(), 2);
        rate.clear();
        assert_eq!(rate.count_at(10_000), 0);
    }

    #[test]
    fn message_text_joins_words() {
        let mut message = Message::new();
        assert_eq!(message.text(), "");
        message.push(Word::Hello);
        message.push(Word::Yes);
        assert_eq!(message.text(), "HELLO YES");
        assert_eq!(message.len(), 2);
        message.clear();
        assert!(message.is_empty());
    }

    #[test]
    fn elapsed_formats_as_clock() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_elapsed(Duration::from_secs(3_725)), "01:02:05");
        assert_eq!(format_elapsed(Duration::from_millis(59_999)), "00:00:59");
    }
}
