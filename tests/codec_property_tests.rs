//! Property tests for cache key canonicalization: determinism, whitespace
//! insensitivity, and absent-versus-empty variables equivalence.

use proptest::collection::btree_map;
use proptest::prelude::*;
use serde_json::{Map, Value};
use stakescan::compute_key;

fn to_variables(entries: &std::collections::BTreeMap<String, i64>) -> Map<String, Value> {
    let mut variables = Map::new();
    for (key, value) in entries {
        variables.insert(key.clone(), Value::from(*value));
    }
    variables
}

proptest! {
    #[test]
    fn prop_key_is_deterministic(
        query in ".{0,64}",
        entries in btree_map("[a-zA-Z_][a-zA-Z0-9_]{0,7}", -1000i64..1000, 0..6),
    ) {
        let variables = to_variables(&entries);
        prop_assert_eq!(
            compute_key(&query, Some(&variables)),
            compute_key(&query, Some(&variables)),
        );
    }

    #[test]
    fn prop_whitespace_padding_never_changes_the_key(
        query in "[a-zA-Z0-9 {}():,\"]{1,64}",
        pad_left in "[ \t\r\n]{0,8}",
        pad_right in "[ \t\r\n]{0,8}",
    ) {
        let padded = format!("{pad_left}{query}{pad_right}");
        prop_assert_eq!(compute_key(&padded, None), compute_key(&query, None));
    }

    #[test]
    fn prop_absent_variables_equal_empty_mapping(query in ".{0,64}") {
        prop_assert_eq!(
            compute_key(&query, None),
            compute_key(&query, Some(&Map::new())),
        );
    }

    #[test]
    fn prop_insertion_order_never_changes_the_key(
        entries in btree_map("[a-zA-Z_][a-zA-Z0-9_]{0,7}", -1000i64..1000, 1..6),
    ) {
        let forward = to_variables(&entries);
        let mut reversed = Map::new();
        for (key, value) in entries.iter().rev() {
            reversed.insert(key.clone(), Value::from(*value));
        }
        prop_assert_eq!(
            compute_key("{ assets { slug } }", Some(&forward)),
            compute_key("{ assets { slug } }", Some(&reversed)),
        );
    }

    #[test]
    fn prop_distinct_variables_give_distinct_keys(
        base in btree_map("[a-z]{1,8}", 0i64..1000, 1..4),
        extra_key in "[A-Z]{1,8}",
        extra_value in 0i64..1000,
    ) {
        let variables = to_variables(&base);
        let mut extended = variables.clone();
        extended.insert(extra_key, Value::from(extra_value));
        prop_assert_ne!(
            compute_key("{ assets }", Some(&variables)),
            compute_key("{ assets }", Some(&extended)),
        );
    }
}
