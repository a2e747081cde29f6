use crate::landmark::Hand;

use super::result::Classification;
use super::rules::RuleClassifier;

/// Gesture classifier seam.
///
/// Implementations map one frame's hand to a classification. They must be
/// pure: no state carried between calls, no I/O, no failure modes. Input that
/// cannot be classified yields [`Classification::NONE`].
pub trait GestureClassifier: Send {
    /// Classifier identifier (for logs).
    fn name(&self) -> &'static str;

    /// Classify a single frame. `None` means no hand was detected.
    fn classify(&self, hand: Option<&Hand>) -> Classification;
}

/// Classify with the default rule set.
pub fn classify(hand: Option<&Hand>) -> Classification {
    RuleClassifier::default().classify(hand)
}
