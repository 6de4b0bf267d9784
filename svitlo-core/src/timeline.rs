//! Merging raw outage ranges into a gapless day timeline.
//!
//! Messages accumulate overlapping, unordered ranges per day. These two
//! functions turn that raw set into the timeline consumers see: a sorted,
//! contiguous slot list that exactly tiles `[0, MINUTES_IN_DAY)`.

use crate::schedule::{Slot, SlotKind, TimeRange, MINUTES_IN_DAY};

/// Coalesce ranges into a minimal, sorted, non-overlapping set.
///
/// Ranges are sorted by start and swept left to right; a range whose start
/// is at or before the running end extends the current interval. Touching
/// ranges (`end == next.start`) merge into one.
pub fn merge_ranges(ranges: &[TimeRange]) -> Vec<TimeRange> {
    let mut sorted = ranges.to_vec();
    sorted.sort();

    let mut merged: Vec<TimeRange> = Vec::new();
    for range in sorted {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}

/// Expand a raw range set into slots that exactly tile the day.
///
/// Merged ranges become `Definite` slots; the space before, between and
/// after them is filled with `NotPlanned` slots. An empty input yields a
/// single `NotPlanned` slot spanning the whole day.
pub fn ranges_to_slots(ranges: &[TimeRange]) -> Vec<Slot> {
    let merged = merge_ranges(ranges);
    if merged.is_empty() {
        return vec![Slot {
            start: 0,
            end: MINUTES_IN_DAY,
            kind: SlotKind::NotPlanned,
        }];
    }

    let mut slots = Vec::with_capacity(merged.len() * 2 + 1);
    let mut cursor = 0;
    for range in merged {
        if range.start > cursor {
            slots.push(Slot {
                start: cursor,
                end: range.start,
                kind: SlotKind::NotPlanned,
            });
        }
        slots.push(Slot {
            start: range.start,
            end: range.end,
            kind: SlotKind::Definite,
        });
        cursor = range.end;
    }
    if cursor < MINUTES_IN_DAY {
        slots.push(Slot {
            start: cursor,
            end: MINUTES_IN_DAY,
            kind: SlotKind::NotPlanned,
        });
    }
    slots
}
