use std::cmp::Ordering;

use crate::breakpoint_comparator::compare_calls;
use crate::containers::{CallRecord, SortMode};

/// Sort the call indices of one bin in place.
///
/// Each position is compared against every later position and the two are
/// swapped as soon as they are out of order, so later comparisons at the same
/// position see the newly placed call. Ties therefore resolve the same way on
/// every run. Returns the number of swaps made.
pub fn sort_bin(calls: &[CallRecord], bin: &mut [usize], mode: SortMode) -> usize {
    let mut swap_count = 0;
    let bin_len = bin.len();
    for first in 0..bin_len.saturating_sub(1) {
        for second in (first + 1)..bin_len {
            if compare_calls(&calls[bin[first]], &calls[bin[second]], mode) == Ordering::Greater {
                bin.swap(first, second);
                swap_count += 1;
            }
        }
    }
    swap_count
}
