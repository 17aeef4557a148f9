use libseqdiff::{
    diff::{
        Algorithms, DiffOptions, diff, marchetti_diff, myers_diff, wagner_fischer_diff,
        wagner_fischer_original_diff,
    },
    operation::Operation,
    patch::verify_round_trip,
};
use proptest::prelude::*;
use strum::IntoEnumIterator;

/// Short sequences over a small alphabet, so that they share plenty of values
fn sequence() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..4, 0..24)
}

/// The length of a longest common subsequence, by the textbook table
fn lcs_len(left: &[u8], right: &[u8]) -> usize {
    let mut table = vec![vec![0usize; right.len() + 1]; left.len() + 1];
    for (i, l) in left.iter().enumerate() {
        for (j, r) in right.iter().enumerate() {
            table[i + 1][j + 1] = if l == r {
                table[i][j] + 1
            } else {
                table[i][j + 1].max(table[i + 1][j])
            };
        }
    }
    table[left.len()][right.len()]
}

fn edit_count(ops: &[Operation<u8>]) -> usize {
    ops.iter()
        .filter(|op| !matches!(op, Operation::Copy { .. }))
        .count()
}

proptest! {
    #[test]
    fn every_algorithm_round_trips(left in sequence(), right in sequence()) {
        for algorithm in Algorithms::iter() {
            let ops = diff(&algorithm, &left, &right, DiffOptions::new()).unwrap();
            let replayed = verify_round_trip(&left, &right, &ops, |a, b| a == b);
            prop_assert!(replayed.is_ok(), "{}: {:#}", algorithm, replayed.unwrap_err());
        }
    }

    #[test]
    fn snake_searches_are_minimal(left in sequence(), right in sequence()) {
        let minimal = left.len() + right.len() - 2 * lcs_len(&left, &right);
        let myers = myers_diff(&left, &right, DiffOptions::new()).unwrap();
        let marchetti = marchetti_diff(&left, &right, DiffOptions::new()).unwrap();
        prop_assert_eq!(edit_count(&myers), minimal);
        prop_assert_eq!(edit_count(&marchetti), minimal);
    }

    #[test]
    fn wagner_fischer_variants_agree(left in sequence(), right in sequence()) {
        prop_assert_eq!(
            wagner_fischer_diff(&left, &right, DiffOptions::new()).unwrap(),
            wagner_fischer_original_diff(&left, &right, DiffOptions::new()).unwrap()
        );
    }

    #[test]
    fn caching_does_not_change_the_result(left in sequence(), right in sequence()) {
        for algorithm in Algorithms::iter() {
            let plain = diff(&algorithm, &left, &right, DiffOptions::new()).unwrap();
            let cached =
                diff(&algorithm, &left, &right, DiffOptions::new().cache_equals(true)).unwrap();
            prop_assert_eq!(plain, cached);
        }
    }

    #[test]
    fn lossy_comparison_round_trips(left in sequence(), right in sequence()) {
        // Values compare by parity only
        for algorithm in Algorithms::iter() {
            let options = DiffOptions::new().process_value(|v: &u8| v % 2);
            let ops = diff(&algorithm, &left, &right, options).unwrap();
            let replayed = verify_round_trip(&left, &right, &ops, |a, b| a % 2 == b % 2);
            prop_assert!(replayed.is_ok(), "{}: {:#}", algorithm, replayed.unwrap_err());
        }
    }
}
