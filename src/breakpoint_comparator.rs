use std::cmp::Ordering;

use crate::containers::{CallRecord, SortMode};

/// Total order used to sort the calls of one bin.
///
/// Keys, in priority order:
/// 1. breakpoint sum, ascending
/// 2. indel size, descending (larger events first)
/// 3. left breakpoint, ascending
/// 4. right breakpoint, ascending
/// 5. non-template size, descending (non-template mode only)
/// 6. breakpoint offset in the read, ascending
pub fn compare_calls(first: &CallRecord, second: &CallRecord, mode: SortMode) -> Ordering {
    let ordering = first
        .breakpoint_sum()
        .cmp(&second.breakpoint_sum())
        .then_with(|| second.indel_size.cmp(&first.indel_size))
        .then_with(|| first.left_breakpoint.cmp(&second.left_breakpoint))
        .then_with(|| first.right_breakpoint.cmp(&second.right_breakpoint));

    let ordering = if mode.uses_non_template_size() {
        ordering.then_with(|| second.non_template_size.cmp(&first.non_template_size))
    } else {
        ordering
    };

    ordering.then_with(|| first.breakpoint_offset.cmp(&second.breakpoint_offset))
}
