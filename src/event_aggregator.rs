use log::debug;

use crate::containers::{CallRecord, InversionEvent, Strand};
use crate::utils;

/// Walk a sorted bin and group adjacent calls sharing a breakpoint sum into
/// events, rescaling each event's members to its consensus size.
///
/// Only events that passed the consensus consistency checks are returned.
pub fn aggregate_events(calls: &mut [CallRecord], bin: &[usize]) -> Vec<InversionEvent> {
    let events = build_events(calls, bin);
    let event_count = events.len();
    let reportable_events: Vec<InversionEvent> =
        events.into_iter().filter(|event| event.reportable).collect();
    debug!(
        "{} events in bin, {} dropped by consensus checks",
        event_count,
        event_count - reportable_events.len()
    );
    reportable_events
}

/// Group and rescale all events of a sorted bin, including those that failed
/// the consensus checks. The event ranges partition the bin.
pub fn build_events(calls: &mut [CallRecord], bin: &[usize]) -> Vec<InversionEvent> {
    let mut events = Vec::new();
    let Some(&first_index) = bin.first() else {
        return events;
    };

    let mut current_event = InversionEvent::new(0, &calls[first_index]);
    for (position, &call_index) in bin.iter().enumerate().skip(1) {
        if calls[call_index].breakpoint_sum() == current_event.representative_sum() {
            current_event.end = position;
        } else {
            rescale_event(calls, bin, &mut current_event);
            events.push(current_event);
            current_event = InversionEvent::new(position, &calls[call_index]);
        }
    }
    rescale_event(calls, bin, &mut current_event);
    events.push(current_event);
    events
}

/// Rescale the members of an event to the largest indel size among them.
///
/// Smaller calls are widened symmetrically around their breakpoints. The first
/// member failing a consistency check marks the event unreportable and stops
/// the rescale; members before it keep their rescaled values.
pub fn rescale_event(calls: &mut [CallRecord], bin: &[usize], event: &mut InversionEvent) {
    let members = event.members(bin);
    let max_size = members
        .iter()
        .map(|&call_index| calls[call_index].indel_size)
        .max()
        .unwrap_or(0);

    for &call_index in members {
        let call = &mut calls[call_index];
        if !fits_consensus_size(call, max_size) {
            debug!("Event rejected at {} (consensus size {})", call, max_size);
            event.reportable = false;
            break;
        }
        let diff = ((max_size - call.indel_size) / 2) as i64;
        call.indel_size = max_size;
        call.left_breakpoint -= diff;
        call.right_breakpoint += diff;

        match call.strand {
            Strand::Forward => {
                if call.breakpoint_offset > diff {
                    call.breakpoint_offset -= diff;
                }
            }
            Strand::Reverse => {
                if call.breakpoint_offset + diff < call.max_breakpoint_offset() {
                    call.breakpoint_offset += diff;
                }
            }
        }
    }

    let representative = &calls[members[0]];
    event.real_start = representative.left_breakpoint;
    event.real_end = representative.right_breakpoint;
    event.support = event.end - event.start + 1;
}

/// An event with no size at all cannot be rescaled and is always rejected
fn fits_consensus_size(call: &CallRecord, max_size: u32) -> bool {
    if max_size == 0 {
        return false;
    }
    let size_ratio = call.indel_size as f64 / max_size as f64;
    let read_span = call.read_length as u64 + call.indel_size as u64;
    size_ratio >= utils::MIN_SIZE_RATIO
        && max_size as u64 + utils::READ_LENGTH_SLACK as u64 <= read_span
}
