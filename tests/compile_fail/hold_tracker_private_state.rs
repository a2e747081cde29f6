// Hold timing can only advance through observe().
use handword::HoldTracker;

fn main() {
    let mut tracker = HoldTracker::default();
    tracker.hold_start_ms = 0;
}
