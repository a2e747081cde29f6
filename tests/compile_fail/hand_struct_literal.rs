// A Hand can only be built through the 21-point validating constructor.
use handword::{Hand, Landmark};

fn main() {
    let _hand = Hand {
        points: [Landmark::default(); 21],
    };
}
