// Landmarks are only reachable through the read-only accessors.
use handword::{Hand, Landmark};

fn main() {
    let hand = Hand::from_points(&[Landmark::default(); 21]).unwrap();
    let _points = hand.points;
}
