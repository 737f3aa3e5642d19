use crate::containers::CallRecord;

/// Flag calls whose alignment duplicates an earlier call in the sorted bin.
///
/// Two calls are duplicates if they are on the same strand and share either
/// their leftmost aligned position or their aligned end. The later call is
/// marked non-unique; flags are only ever cleared, never set back. Returns
/// the number of calls newly marked.
pub fn mark_duplicate_calls(calls: &mut [CallRecord], bin: &[usize]) -> usize {
    let mut marked_count = 0;
    for (first_pos, &first) in bin.iter().enumerate() {
        for &second in bin.iter().skip(first_pos + 1) {
            if is_duplicate_alignment(&calls[first], &calls[second]) && calls[second].is_unique {
                calls[second].is_unique = false;
                marked_count += 1;
            }
        }
    }
    marked_count
}

fn is_duplicate_alignment(first: &CallRecord, second: &CallRecord) -> bool {
    let same_start = first.leftmost_aligned_position == second.leftmost_aligned_position;
    let same_end = first.aligned_end() == second.aligned_end();
    (same_start || same_end) && first.strand == second.strand
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_sorter::sort_bin;
    use crate::containers::{SortMode, Strand};
    use crate::utils;

    #[test]
    fn test_same_start_same_strand() {
        let mut calls = vec![
            utils::create_test_call_with_alignment(100, 200, 50, Strand::Forward, 40, 150),
            utils::create_test_call_with_alignment(101, 200, 50, Strand::Forward, 40, 120),
        ];
        let bin = vec![0, 1];
        assert_eq!(mark_duplicate_calls(&mut calls, &bin), 1);
        assert!(calls[0].is_unique);
        assert!(!calls[1].is_unique);
    }

    #[test]
    fn test_same_end_same_strand() {
        let mut calls = vec![
            utils::create_test_call_with_alignment(100, 200, 50, Strand::Reverse, 40, 150),
            utils::create_test_call_with_alignment(101, 200, 50, Strand::Reverse, 60, 130),
        ];
        let bin = vec![1, 0];
        mark_duplicate_calls(&mut calls, &bin);
        // call 0 is later in the bin
        assert!(!calls[0].is_unique);
        assert!(calls[1].is_unique);
    }

    #[test]
    fn test_different_strand_not_duplicate() {
        let mut calls = vec![
            utils::create_test_call_with_alignment(100, 200, 50, Strand::Forward, 40, 150),
            utils::create_test_call_with_alignment(100, 200, 50, Strand::Reverse, 40, 150),
        ];
        let bin = vec![0, 1];
        assert_eq!(mark_duplicate_calls(&mut calls, &bin), 0);
        assert!(calls.iter().all(|call| call.is_unique));
    }

    #[test]
    fn test_non_adjacent_pairs_are_checked() {
        let mut calls = vec![
            utils::create_test_call_with_alignment(100, 200, 50, Strand::Forward, 40, 150),
            utils::create_test_call_with_alignment(100, 200, 50, Strand::Forward, 70, 150),
            utils::create_test_call_with_alignment(100, 200, 50, Strand::Forward, 40, 100),
        ];
        let bin = vec![0, 1, 2];
        mark_duplicate_calls(&mut calls, &bin);
        assert!(calls[0].is_unique);
        assert!(calls[1].is_unique);
        assert!(!calls[2].is_unique);
    }

    #[test]
    fn test_flag_never_reset() {
        let mut calls = vec![
            utils::create_test_call_with_alignment(100, 200, 50, Strand::Forward, 40, 150),
            utils::create_test_call_with_alignment(300, 400, 50, Strand::Forward, 500, 150),
        ];
        calls[1].is_unique = false;
        let bin = vec![0, 1];
        assert_eq!(mark_duplicate_calls(&mut calls, &bin), 0);
        assert!(!calls[1].is_unique);
    }

    #[test]
    fn test_flag_follows_sorted_order() {
        // call 0 sorts after call 1, so it is the one flagged
        let mut calls = vec![
            utils::create_test_call_with_alignment(150, 250, 50, Strand::Forward, 40, 150),
            utils::create_test_call_with_alignment(100, 200, 50, Strand::Forward, 40, 150),
        ];
        let mut bin = vec![0, 1];
        sort_bin(&calls, &mut bin, SortMode::Inversion);
        assert_eq!(bin, vec![1, 0]);
        mark_duplicate_calls(&mut calls, &bin);
        assert!(!calls[0].is_unique);
        assert!(calls[1].is_unique);
    }
}
