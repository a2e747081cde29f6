mod backend;
mod result;
mod rules;

pub use backend::{classify, GestureClassifier};
pub use result::{Classification, GestureLabel, Word};
pub use rules::{FingerFlags, RuleClassifier, ThumbRule, OK_PINCH_THRESHOLD};
