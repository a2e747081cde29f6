//! Hold/debounce tracking.
//!
//! Converts the per-frame label stream into discrete transitions. A gesture
//! must be seen on consecutive frames for longer than the hold duration
//! before its word is committed; holding it further re-commits after each
//! additional hold duration. Any change of label, including a single frame
//! with no gesture, restarts the hold window.

use crate::classify::{GestureLabel, Word};

/// Default hold duration before a word is committed.
pub const DEFAULT_HOLD_MS: u64 = 800;

/// Result of observing one frame's label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoldTransition {
    /// A new gesture appeared. No word is committed yet.
    Started(GestureLabel),
    /// The label changed to "none".
    Released,
    /// The current gesture was held past the hold duration.
    Committed { label: GestureLabel, word: Word },
}

/// Session-lifetime hold state.
///
/// The hold window only moves through [`HoldTracker::observe`]:
///
/// ```compile_fail
/// let mut tracker = handword::HoldTracker::default();
/// tracker.hold_start_ms = 0;
/// ```
#[derive(Clone, Debug)]
pub struct HoldTracker {
    hold_ms: u64,
    last_label: Option<GestureLabel>,
    hold_start_ms: u64,
}

impl HoldTracker {
    pub fn new(hold_ms: u64) -> Self {
        Self {
            hold_ms,
            last_label: None,
            hold_start_ms: 0,
        }
    }

    /// Label seen on the most recent frame.
    pub fn current(&self) -> Option<GestureLabel> {
        self.last_label
    }

    /// Milliseconds the current label has been held since the last start or
    /// commit.
    pub fn held_for(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.hold_start_ms)
    }

    /// Feed one frame's label.
    ///
    /// Commits only when strictly more than the hold duration has elapsed.
    pub fn observe(&mut self, label: Option<GestureLabel>, now_ms: u64) -> Option<HoldTransition> {
        if label != self.last_label {
            self.last_label = label;
            self.hold_start_ms = now_ms;
            return Some(match label {
                Some(label) => HoldTransition::Started(label),
                None => HoldTransition::Released,
            });
        }

        let label = label?;
        if self.held_for(now_ms) > self.hold_ms {
            self.hold_start_ms = now_ms;
            return Some(HoldTransition::Committed {
                label,
                word: label.word(),
            });
        }
        None
    }

    /// Forget the current hold (session stop).
    pub fn reset(&mut self) {
        self.last_label = None;
        self.hold_start_ms = 0;
    }
}

impl Default for HoldTracker {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Option<GestureLabel> = Some(GestureLabel::Peace);
    const B: Option<GestureLabel> = Some(GestureLabel::Fist);

    fn commits(tracker: &mut HoldTracker, frames: &[(Option<GestureLabel>, u64)]) -> usize {
        frames
            .iter()
            .filter_map(|(label, t)| tracker.observe(*label, *t))
            .filter(|t| matches!(t, HoldTransition::Committed { .. }))
            .count()
    }

    #[test]
    fn first_frame_starts_without_commit() {
        let mut tracker = HoldTracker::default();
        assert_eq!(
            tracker.observe(A, 0),
            Some(HoldTransition::Started(GestureLabel::Peace))
        );
        assert_eq!(tracker.current(), A);
    }

    #[test]
    fn commits_once_after_hold_duration() {
        let mut tracker = HoldTracker::default();
        assert_eq!(commits(&mut tracker, &[(A, 0), (A, 801)]), 1);
    }

    #[test]
    fn exactly_hold_duration_does_not_commit() {
        let mut tracker = HoldTracker::default();
        assert_eq!(commits(&mut tracker, &[(A, 0), (A, 400), (A, 800)]), 0);
    }

    #[test]
    fn continuous_hold_repeats_commit() {
        let mut tracker = HoldTracker::default();
        let frames: Vec<_> = (0..=250).map(|i| (A, i * 10)).collect();
        let transitions: Vec<_> = frames
            .iter()
            .filter_map(|(label, t)| tracker.observe(*label, *t).map(|tr| (*t, tr)))
            .collect();
        let commit_times: Vec<u64> = transitions
            .iter()
            .filter(|(_, tr)| matches!(tr, HoldTransition::Committed { .. }))
            .map(|(t, _)| *t)
            .collect();
        assert_eq!(commit_times, vec![810, 1620, 2430]);
    }

    #[test]
    fn single_none_frame_resets_hold() {
        let mut tracker = HoldTracker::default();
        let mut frames: Vec<_> = (0..=70).map(|i| (A, i * 10)).collect();
        frames.push((None, 710));
        frames.extend((0..=70).map(|i| (A, 720 + i * 10)));
        assert_eq!(commits(&mut tracker, &frames), 0);
    }

    #[test]
    fn switching_labels_restarts_window() {
        let mut tracker = HoldTracker::default();
        assert_eq!(commits(&mut tracker, &[(A, 0), (A, 700), (B, 750), (B, 1500)]), 0);
        assert_eq!(
            tracker.observe(B, 1551),
            Some(HoldTransition::Committed {
                label: GestureLabel::Fist,
                word: Word::Stop
            })
        );
    }

    #[test]
    fn none_transition_is_released_then_silent() {
        let mut tracker = HoldTracker::default();
        tracker.observe(A, 0);
        assert_eq!(tracker.observe(None, 10), Some(HoldTransition::Released));
        assert_eq!(tracker.observe(None, 5000), None);
    }

    #[test]
    fn clock_going_backwards_does_not_commit() {
        let mut tracker = HoldTracker::default();
        tracker.observe(A, 5_000);
        assert_eq!(tracker.observe(A, 1_000), None);
        assert_eq!(tracker.held_for(1_000), 0);
    }

    #[test]
    fn reset_forgets_label() {
        let mut tracker = HoldTracker::default();
        tracker.observe(A, 0);
        tracker.reset();
        assert_eq!(tracker.current(), None);
        assert_eq!(
            tracker.observe(A, 900),
            Some(HoldTransition::Started(GestureLabel::Peace))
        );
    }

    #[test]
    fn custom_hold_duration() {
        let mut tracker = HoldTracker::new(100);
        assert_eq!(commits(&mut tracker, &[(A, 0), (A, 101), (A, 202)]), 2);
    }
}
