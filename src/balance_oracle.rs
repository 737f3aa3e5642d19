use crate::containers::CallRecord;
use crate::utils;

/// Adjudicates whether an event large enough to need it has balanced support
/// across its member reads.
pub trait BalanceOracle {
    fn is_balanced(&self, calls: &[CallRecord], members: &[usize]) -> bool;
}

/// Accepts every event, for callers that run the balance check elsewhere
pub struct AcceptAll;

impl BalanceOracle for AcceptAll {
    fn is_balanced(&self, _calls: &[CallRecord], _members: &[usize]) -> bool {
        true
    }
}

/// Requires the breakpoint to be seen at both ends of the supporting reads.
///
/// Each side of the breakpoint (the read prefix up to the offset and the
/// suffix after it) must be observed at least once as a short anchor and at
/// least once as a long anchor across the members. Anchor lengths are judged
/// against the read length minus any non-template insertion.
pub struct ReadPositionBalance {
    pub min_anchor_ratio: f64,
}

impl ReadPositionBalance {
    pub fn new(min_anchor_ratio: f64) -> Self {
        ReadPositionBalance { min_anchor_ratio }
    }

    /// Short and long anchor length limits for one call
    fn anchor_limits(&self, call: &CallRecord) -> (i64, i64) {
        let effective_len = (call.read_length as i64 - call.non_template_size as i64) as f64;
        let short_limit = (effective_len * self.min_anchor_ratio).round() as i64 - 1;
        let long_limit = (effective_len * (1.0 - self.min_anchor_ratio)).round() as i64 - 1;
        (short_limit, long_limit)
    }
}

impl Default for ReadPositionBalance {
    fn default() -> Self {
        ReadPositionBalance::new(utils::DEFAULT_MIN_ANCHOR_RATIO)
    }
}

impl BalanceOracle for ReadPositionBalance {
    fn is_balanced(&self, calls: &[CallRecord], members: &[usize]) -> bool {
        let mut left_short = false;
        let mut left_long = false;
        let mut right_short = false;
        let mut right_long = false;

        for &call_index in members {
            let call = &calls[call_index];
            let (short_limit, long_limit) = self.anchor_limits(call);
            let left_anchor = call.breakpoint_offset;
            let right_anchor =
                call.read_length as i64 - call.breakpoint_offset - call.non_template_size as i64;

            left_short |= left_anchor <= short_limit;
            left_long |= left_anchor >= long_limit;
            right_short |= right_anchor <= short_limit;
            right_long |= right_anchor >= long_limit;
        }
        left_short && left_long && right_short && right_long
    }
}
