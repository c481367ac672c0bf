//! Structural comparison helpers.
//!
//! Records are compared as sets of `(key, value)` pairs so that declaration
//! order never influences identity. Field lists are compared by containment.

/// Returns true if both records hold the same keys with equal values,
/// regardless of order.
pub fn records_equal<V: PartialEq>(a: &[(String, V)], b: &[(String, V)]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().all(|(key, value)| {
        b.iter()
            .find(|(other_key, _)| other_key == key)
            .is_some_and(|(_, other_value)| other_value == value)
    })
}

/// Returns true if every element of `subset` appears in `set`.
pub fn contains_all<T: PartialEq>(set: &[T], subset: &[T]) -> bool {
    subset.iter().all(|item| set.contains(item))
}
