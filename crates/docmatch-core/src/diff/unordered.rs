//! Greedy first-fit pairing for order-insensitive collections.
//!
//! Each expected element, in original order, claims the first unused actual
//! element it matches. This is not a minimum-cost assignment: an early
//! expected element can claim an actual element that a later one needed,
//! leaving a mismatch that a different pairing would have avoided.

/// An expected element that found no match, paired with the actual element
/// reported alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Unmatched {
    /// Index into the expected collection.
    pub expected: usize,
    /// Index into the actual collection, or `None` if every actual element
    /// was already used.
    pub actual: Option<usize>,
}

/// Pairs `expected` against `actual` and returns the expected elements left
/// without a match.
///
/// Unmatched expected elements are paired positionally with the leftover
/// actual elements, in index order.
pub(crate) fn greedy_pairing<E, A>(
    expected: &[E],
    actual: &[A],
    mut matches: impl FnMut(&E, &A) -> bool,
) -> Vec<Unmatched> {
    let mut used = vec![false; actual.len()];
    let mut unmatched = Vec::new();

    for (i, exp) in expected.iter().enumerate() {
        let found = actual
            .iter()
            .enumerate()
            .find(|(j, act)| !used[*j] && matches(exp, act))
            .map(|(j, _)| j);
        match found {
            Some(j) => used[j] = true,
            None => unmatched.push(i),
        }
    }

    if !unmatched.is_empty() {
        tracing::trace!(
            unmatched = unmatched.len(),
            "unordered pairing fell back to positional pairing"
        );
    }

    let mut leftovers = used
        .iter()
        .enumerate()
        .filter(|(_, u)| !**u)
        .map(|(j, _)| j);
    unmatched
        .into_iter()
        .map(|expected| Unmatched {
            expected,
            actual: leftovers.next(),
        })
        .collect()
}
