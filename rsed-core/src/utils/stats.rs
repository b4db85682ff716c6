//! Small reductions over slices.

use num::{Float, NumCast};

/// Median of a slice
///
/// Even-length slices return the mean of the two central values. Returns NaN
/// for an empty slice. NaN values sort after every finite value.
pub fn median<T: Float>(values: &[T]) -> T {
    if values.is_empty() {
        return T::nan();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or_else(|| a.is_nan().cmp(&b.is_nan())));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / (T::one() + T::one())
    } else {
        sorted[mid]
    }
}

/// Arithmetic mean of a slice, NaN when empty
pub fn mean<T: Float>(values: &[T]) -> T {
    let total = values.iter().fold(T::zero(), |acc, &v| acc + v);
    total / <T as NumCast>::from(values.len()).unwrap_or_else(T::nan)
}

/// Weighted average $\sum_i w_i v_i / \sum_i w_i$
///
/// An empty selection or zero total weight yields a non-finite result.
///
/// # Panics
/// Panics if the slices have different lengths.
pub fn weighted_average<T: Float>(values: &[T], weights: &[T]) -> T {
    assert_eq!(
        values.len(),
        weights.len(),
        "values and weights must have the same length"
    );
    let (weighted, total) = values
        .iter()
        .zip(weights.iter())
        .fold((T::zero(), T::zero()), |(acc, norm), (&v, &w)| {
            (acc + v * w, norm + w)
        });
    weighted / total
}
