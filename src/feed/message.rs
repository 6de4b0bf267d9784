//! Parsing one message body into per-group schedule updates.
//!
//! A message mentions one or more groups, each introduced by a marker token
//! (`📌 1.1`, `🔹 Черга 2.2`, …) followed by that group's time ranges. A
//! message carrying one of the full-schedule phrases replaces the
//! accumulated ranges of every group it mentions; anything else is a patch
//! that only adds ranges. Slots are recomputed from the full accumulated
//! range set after every update.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use lazy_static::lazy_static;
use regex::Regex;

use svitlo_core::{ranges_to_slots, DayKey, DayRecord, Schedule, TimeRange, MINUTES_IN_DAY};

lazy_static! {
    // "📌 1.1", "🔹 Черга 1.1", "📌 Черга 1.1", "🔹 1.1"
    static ref GROUP_MARKER_RE: Regex = Regex::new(r"[📌🔹]\s*(?:[Чч]ерга\s*)?(\d\.\d)")
        .expect("Failed to compile GROUP_MARKER_RE regex");
    // "06:00 - 11:00", "06:00 до 11:00", "06:00 по 11:00"
    static ref TIME_RANGE_RE: Regex =
        Regex::new(r"(?i)(\d{1,2}:\d{2})\s*(?:до|по|-)\s*(\d{1,2}:\d{2})")
            .expect("Failed to compile TIME_RANGE_RE regex");
}

/// Phrases marking a message as a full schedule replacement rather than a
/// patch. Matched case-insensitively against the whole message.
const FULL_SCHEDULE_MARKERS: [&str; 4] = [
    "зміни в гпв",
    "графік погодинних відключень",
    "застосовуватимуться відключення наступних черг",
    "графік може змінюватися",
];

/// Whether a message replaces the accumulated ranges of the groups it
/// mentions instead of patching them.
pub fn is_full_update(text: &str) -> bool {
    let lowered = text.to_lowercase();
    FULL_SCHEDULE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Apply one message's group segments to the shared schedule.
///
/// Each group marker owns the text up to the next marker. A segment that
/// yields no usable time range contributes nothing and does not mark its
/// group as touched. Groups that received ranges are added to `touched` for
/// publish-time bookkeeping.
pub fn apply_message(
    schedule: &mut Schedule,
    text: &str,
    key: DayKey,
    date: DateTime<FixedOffset>,
    full_update: bool,
    touched: &mut HashSet<String>,
) {
    let markers: Vec<(std::ops::Range<usize>, &str)> = GROUP_MARKER_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let group = caps.get(1)?;
            Some((whole.range(), group.as_str()))
        })
        .collect();

    for (i, (marker, group)) in markers.iter().enumerate() {
        let segment_end = markers
            .get(i + 1)
            .map_or(text.len(), |(next, _)| next.start);
        let ranges = extract_ranges(&text[marker.end..segment_end]);
        if ranges.is_empty() {
            continue;
        }

        let day = schedule
            .entry(group)
            .day_mut(key)
            .get_or_insert_with(|| DayRecord::new(date));

        if full_update {
            day.raw_ranges = ranges;
        } else {
            day.raw_ranges.extend(ranges);
        }
        day.slots = ranges_to_slots(&day.raw_ranges);

        touched.insert((*group).to_string());
    }
}

/// Extract outage ranges from a body segment.
///
/// A raw `00:00` end token means end of day and becomes `MINUTES_IN_DAY`.
/// Ranges that are degenerate after that normalization are dropped.
pub fn extract_ranges(text: &str) -> Vec<TimeRange> {
    TIME_RANGE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let start = time_to_minutes(&caps[1])?;
            let mut end = time_to_minutes(&caps[2])?;
            if end == 0 {
                end = MINUTES_IN_DAY;
            }
            (start < end && end <= MINUTES_IN_DAY).then(|| TimeRange::new(start, end))
        })
        .collect()
}

fn time_to_minutes(time: &str) -> Option<u16> {
    let (hours, minutes) = time.split_once(':')?;
    let hours: u16 = hours.parse().ok()?;
    let minutes: u16 = minutes.parse().ok()?;
    Some(hours * 60 + minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use svitlo_core::{DayStatus, Slot, SlotKind};

    fn midnight() -> DateTime<FixedOffset> {
        "2025-06-10T00:00:00+03:00".parse().unwrap()
    }

    fn apply(schedule: &mut Schedule, text: &str, full_update: bool) -> HashSet<String> {
        let mut touched = HashSet::new();
        apply_message(
            schedule,
            text,
            DayKey::Today,
            midnight(),
            full_update,
            &mut touched,
        );
        touched
    }

    #[test]
    fn test_extract_ranges_supports_all_separators() {
        assert_eq!(
            extract_ranges("06:00 - 11:00, 14:00 до 16:00, 20:00 по 22:00"),
            vec![
                TimeRange::new(360, 660),
                TimeRange::new(840, 960),
                TimeRange::new(1200, 1320),
            ]
        );
    }

    #[test]
    fn test_extract_ranges_rewrites_midnight_end() {
        assert_eq!(
            extract_ranges("з 23:00 до 00:00"),
            vec![TimeRange::new(1380, MINUTES_IN_DAY)]
        );
    }

    #[test]
    fn test_extract_ranges_drops_degenerate() {
        assert_eq!(extract_ranges("13:00 - 13:00"), vec![]);
        assert_eq!(extract_ranges("15:00 - 14:00"), vec![]);
        assert_eq!(extract_ranges("25:00 - 26:00"), vec![]);
    }

    #[test]
    fn test_both_marker_styles_are_recognized() {
        let mut schedule = Schedule::new();
        let touched = apply(
            &mut schedule,
            "📌 1.1\n06:00 - 11:00\n🔹 Черга 2.2\n12:00 - 14:00",
            false,
        );

        assert_eq!(
            touched,
            HashSet::from(["1.1".to_string(), "2.2".to_string()])
        );
        assert_eq!(
            schedule.group("1.1").unwrap().today.as_ref().unwrap().raw_ranges,
            vec![TimeRange::new(360, 660)]
        );
        assert_eq!(
            schedule.group("2.2").unwrap().today.as_ref().unwrap().raw_ranges,
            vec![TimeRange::new(720, 840)]
        );
    }

    #[test]
    fn test_segment_without_ranges_is_ignored() {
        let mut schedule = Schedule::new();
        let touched = apply(&mut schedule, "📌 1.1\nочікуйте на оновлення", false);

        assert!(touched.is_empty());
        assert!(schedule.group("1.1").is_none());
    }

    #[test]
    fn test_fresh_day_defaults_to_schedule_applies() {
        let mut schedule = Schedule::new();
        apply(&mut schedule, "📌 Черга 1.1 06:00 - 11:00", false);

        let day = schedule.group("1.1").unwrap().today.as_ref().unwrap();
        assert_eq!(day.status, DayStatus::ScheduleApplies);
        assert_eq!(day.date, midnight());
        assert_eq!(
            day.slots,
            vec![
                Slot { start: 0, end: 360, kind: SlotKind::NotPlanned },
                Slot { start: 360, end: 660, kind: SlotKind::Definite },
                Slot { start: 660, end: MINUTES_IN_DAY, kind: SlotKind::NotPlanned },
            ]
        );
    }

    #[test]
    fn test_patch_appends_to_accumulated_ranges() {
        let mut schedule = Schedule::new();
        apply(&mut schedule, "📌 1.1 06:00 - 11:00", false);
        apply(&mut schedule, "📌 1.1 14:00 - 16:00", false);

        let day = schedule.group("1.1").unwrap().today.as_ref().unwrap();
        assert_eq!(
            day.raw_ranges,
            vec![TimeRange::new(360, 660), TimeRange::new(840, 960)]
        );
    }

    #[test]
    fn test_full_update_replaces_accumulated_ranges() {
        let mut schedule = Schedule::new();
        apply(&mut schedule, "📌 1.1 06:00 - 11:00", false);
        apply(&mut schedule, "📌 1.1 14:00 - 16:00", true);

        let day = schedule.group("1.1").unwrap().today.as_ref().unwrap();
        assert_eq!(day.raw_ranges, vec![TimeRange::new(840, 960)]);
        assert_eq!(
            day.slots,
            vec![
                Slot { start: 0, end: 840, kind: SlotKind::NotPlanned },
                Slot { start: 840, end: 960, kind: SlotKind::Definite },
                Slot { start: 960, end: MINUTES_IN_DAY, kind: SlotKind::NotPlanned },
            ]
        );
    }

    #[test]
    fn test_full_schedule_marker_detection() {
        assert!(is_full_update("Графік погодинних відключень на 10 червня"));
        assert!(is_full_update("УВАГА! Зміни в ГПВ"));
        assert!(!is_full_update("Додаткові відключення для черги 1.1"));
    }

    #[test]
    fn test_multiple_ranges_in_one_segment() {
        let mut schedule = Schedule::new();
        apply(
            &mut schedule,
            "📌 1.1\n06:00 - 11:00\n14:00 - 16:00",
            false,
        );

        let day = schedule.group("1.1").unwrap().today.as_ref().unwrap();
        assert_eq!(
            day.raw_ranges,
            vec![TimeRange::new(360, 660), TimeRange::new(840, 960)]
        );
        assert_eq!(day.slots.len(), 5);
    }
}
