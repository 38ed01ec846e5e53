//! Assertion utilities for testing.
//!
//! Helpers for comparing float sequences that may contain NaN.

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Assert that two sequences are element-wise equal, treating NaN as equal to NaN.
///
/// # Panics
///
/// Panics if the lengths differ or any pair differs by more than `epsilon`.
pub fn assert_series_eq(actual: &[f64], expected: &[f64], epsilon: Option<f64>) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Series have different lengths: actual = {}, expected = {}",
        actual.len(),
        expected.len()
    );

    let eps = epsilon.unwrap_or(DEFAULT_EPSILON);
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        if a.is_nan() && e.is_nan() {
            continue;
        }
        assert!(
            (a - e).abs() <= eps,
            "Series differ at index {}: actual = {}, expected = {}, epsilon = {}",
            i,
            a,
            e,
            eps
        );
    }
}

/// Assert that a sequence is sorted in ascending order.
pub fn assert_ascending(values: &[f64]) {
    for (i, pair) in values.windows(2).enumerate() {
        assert!(
            pair[0] <= pair[1],
            "Sequence not ascending at index {}: {} > {}",
            i,
            pair[0],
            pair[1]
        );
    }
}
