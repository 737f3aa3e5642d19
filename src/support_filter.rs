use log::debug;

use crate::balance_oracle::BalanceOracle;
use crate::containers::{CallRecord, InversionEvent, ReportSettings, SortMode};
use crate::result_writer::InversionWriter;

/// Check an aggregated event against the support and balance thresholds.
///
/// Events smaller than the balance cutoff are accepted on support alone;
/// larger ones also need the balance oracle to agree.
pub fn passes_support_filter(
    calls: &[CallRecord],
    bin: &[usize],
    event: &InversionEvent,
    settings: &ReportSettings,
    oracle: &dyn BalanceOracle,
) -> bool {
    if event.support < settings.min_read_support {
        debug!(
            "Event {}-{} skipped: support {} below {}",
            event.real_start, event.real_end, event.support, settings.min_read_support
        );
        return false;
    }
    let members = event.members(bin);
    if calls[members[0]].indel_size < settings.balance_cutoff {
        return true;
    }
    let balanced = oracle.is_balanced(calls, members);
    if !balanced {
        debug!(
            "Event {}-{} skipped: unbalanced support",
            event.real_start, event.real_end
        );
    }
    balanced
}

/// Write every event of a bin that passes the filters, in aggregation order.
/// Returns the number of events written.
#[allow(clippy::too_many_arguments)]
pub fn report_events(
    calls: &[CallRecord],
    bin: &[usize],
    events: &[InversionEvent],
    settings: &ReportSettings,
    oracle: &dyn BalanceOracle,
    writer: &mut dyn InversionWriter,
    chrom: &str,
    mode: SortMode,
) -> std::io::Result<usize> {
    let mut reported_count = 0;
    for event in events.iter() {
        if passes_support_filter(calls, bin, event, settings, oracle) {
            writer.write_inversion(chrom, calls, event.members(bin), event, mode)?;
            reported_count += 1;
        }
    }
    Ok(reported_count)
}
