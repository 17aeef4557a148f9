#![no_main]

use libfuzzer_sys::fuzz_target;
use libseqdiff::diff::{Algorithms, DiffOptions, diff};
use libseqdiff::patch::verify_round_trip;
use strum::IntoEnumIterator;

/// The full-matrix Wagner-Fischer variant is quadratic in memory, so inputs are kept small
const MAX_INPUT_LEN: usize = 512;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_LEN {
        return;
    }
    // The first byte picks where the input is split into the two sequences
    let Some((split, rest)) = data.split_first() else {
        return;
    };
    let split = usize::from(*split).min(rest.len());
    let (left, right) = rest.split_at(split);

    for algorithm in Algorithms::iter() {
        let ops = diff(&algorithm, left, right, DiffOptions::new()).unwrap();
        verify_round_trip(left, right, &ops, |a, b| a == b).unwrap();
    }
});
