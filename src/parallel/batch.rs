//! Batch boundaries for the parallel seed aggregation, which hands each rayon task one
//! contiguous slice of the power range.

use std::ops::Range;

/// Split `range` into up to `num_batches` contiguous sub-ranges, in order.
/// Batches are as equal in size as possible; earlier batches take the remainder.
///
/// # Example
/// ```
/// # use seedfinder::parallel::batch_ranges;
/// let ranges = batch_ranges(0..100, 4);
/// assert_eq!(ranges, vec![0..25, 25..50, 50..75, 75..100]);
/// ```
pub fn batch_ranges(range: Range<u32>, num_batches: usize) -> Vec<Range<u32>> {
    let total = range.len();
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;

    let mut start = range.start;
    (0..num_batches)
        .map(|i| {
            let size = (base + usize::from(i < remainder)) as u32;
            let batch = start..start + size;
            start += size;
            batch
        })
        .collect()
}
