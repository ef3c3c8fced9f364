//! Property-based testing strategies.

use proptest::collection::btree_set;
use proptest::prelude::*;

use tbs_core::data::VariableDecl;

/// Distinct identifier-like element names, `1..=max` of them.
pub fn arb_element_names(max: usize) -> impl Strategy<Value = Vec<String>> {
    btree_set("[a-z][a-zA-Z0-9]{0,7}", 1..=max).prop_map(|names| names.into_iter().collect())
}

/// A variable declaration with distinct elements.
pub fn arb_variable(name: &'static str, max: usize) -> impl Strategy<Value = VariableDecl> {
    arb_element_names(max).prop_map(move |elements| VariableDecl {
        name: name.to_string(),
        elements,
    })
}

/// Valid chance parameters `(hit, sides)`, including the boundary cases
/// where no roll happens.
pub fn arb_chance() -> impl Strategy<Value = (i32, i32)> {
    prop_oneof![
        (1i32..=12).prop_flat_map(|sides| (0..=sides, Just(sides))),
        Just((0, 0)),
    ]
}

/// Whether a chance gate with these parameters rolls the dice.
#[must_use]
pub fn chance_rolls(hit: i32, sides: i32) -> bool {
    hit > 0 && hit < sides
}

/// A dice seed.
pub fn arb_seed() -> impl Strategy<Value = u64> {
    any::<u64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_element_names_are_distinct(names in arb_element_names(6)) {
            let mut sorted = names.clone();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), names.len());
            prop_assert!(!names.is_empty() && names.len() <= 6);
        }

        #[test]
        fn test_chance_hit_within_sides((hit, sides) in arb_chance()) {
            prop_assert!((0..=sides).contains(&hit));
            prop_assert_eq!(chance_rolls(hit, sides), hit != 0 && hit != sides);
        }
    }
}
