//! Source-neutral schedule types.
//!
//! These types represent a per-group, per-day outage schedule in a way that
//! is independent of where the data came from. The feed pipeline builds them
//! from channel messages, planned-outage sources deserialize their API
//! responses into them, and the reconciler works exclusively with them.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minutes in one civil day.
pub const MINUTES_IN_DAY: u16 = 1440;

/// Half-open minute range `[start, end)` within one day.
///
/// An end of `00:00` in source text means end-of-day and is stored as
/// `MINUTES_IN_DAY` by the parser, so `start < end` holds for every range
/// that reaches the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: u16,
    pub end: u16,
}

impl TimeRange {
    pub fn new(start: u16, end: u16) -> Self {
        TimeRange { start, end }
    }
}

/// What a slot of the day timeline means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    /// A confirmed outage window.
    #[serde(rename = "DEFINITE")]
    Definite,
    /// No outage currently known for this window.
    #[serde(rename = "NOT_PLANNED")]
    NotPlanned,
}

/// One tile of a day timeline.
///
/// The slots of a single day are sorted, contiguous, non-overlapping and
/// exactly cover `[0, MINUTES_IN_DAY)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: u16,
    pub end: u16,
    #[serde(rename = "type")]
    pub kind: SlotKind,
}

/// Per-day schedule status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayStatus {
    /// The slot timeline below is in effect.
    ScheduleApplies,
    /// No schedule has been published for this day yet.
    WaitingForSchedule,
    /// Unplanned emergency shutdowns override the published timeline.
    EmergencyShutdowns,
}

/// Which day of the reconciliation window a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKey {
    Today,
    Tomorrow,
}

impl DayKey {
    /// Both day keys, in window order.
    pub const ALL: [DayKey; 2] = [DayKey::Today, DayKey::Tomorrow];
}

/// Schedule for one group on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    /// Local midnight of the day in the publication timezone.
    pub date: DateTime<FixedOffset>,
    pub status: DayStatus,
    pub slots: Vec<Slot>,
    /// Accumulated raw ranges behind `slots`, kept so a later patch message
    /// can extend the day without losing earlier updates.
    #[serde(rename = "rawRanges", default, skip_serializing_if = "Vec::is_empty")]
    pub raw_ranges: Vec<TimeRange>,
}

impl DayRecord {
    /// A freshly announced day: schedule applies, nothing accumulated yet.
    pub fn new(date: DateTime<FixedOffset>) -> Self {
        DayRecord {
            date,
            status: DayStatus::ScheduleApplies,
            slots: Vec::new(),
            raw_ranges: Vec::new(),
        }
    }

    /// A day no message has touched: waiting for a schedule, empty slots.
    pub fn waiting(date: DateTime<FixedOffset>) -> Self {
        DayRecord {
            date,
            status: DayStatus::WaitingForSchedule,
            slots: Vec::new(),
            raw_ranges: Vec::new(),
        }
    }
}

/// Schedule for one group across the Today/Tomorrow window.
///
/// The `Option`s are only `None` mid-accumulation; `fold_messages` finalizes
/// every group with both days and an `updated_on` stamp before returning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today: Option<DayRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tomorrow: Option<DayRecord>,
    /// Publish time of the latest message that touched this group.
    #[serde(
        rename = "updatedOn",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_on: Option<DateTime<FixedOffset>>,
}

impl GroupSchedule {
    pub fn day(&self, key: DayKey) -> Option<&DayRecord> {
        match key {
            DayKey::Today => self.today.as_ref(),
            DayKey::Tomorrow => self.tomorrow.as_ref(),
        }
    }

    pub fn day_mut(&mut self, key: DayKey) -> &mut Option<DayRecord> {
        match key {
            DayKey::Today => &mut self.today,
            DayKey::Tomorrow => &mut self.tomorrow,
        }
    }
}

/// Per-group schedules keyed by group token (e.g. `"1.1"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    pub groups: BTreeMap<String, GroupSchedule>,
}

impl Schedule {
    pub fn new() -> Self {
        Schedule::default()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, group: &str) -> Option<&GroupSchedule> {
        self.groups.get(group)
    }

    pub fn group_mut(&mut self, group: &str) -> Option<&mut GroupSchedule> {
        self.groups.get_mut(group)
    }

    /// Get or create the schedule entry for a group.
    pub fn entry(&mut self, group: &str) -> &mut GroupSchedule {
        self.groups.entry(group.to_string()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_serializes_with_type_tag() {
        let slot = Slot {
            start: 360,
            end: 660,
            kind: SlotKind::Definite,
        };
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"start": 360, "end": 660, "type": "DEFINITE"})
        );
    }

    #[test]
    fn test_group_schedule_serializes_day_keys_and_updated_on() {
        let date: DateTime<FixedOffset> = "2025-06-10T00:00:00+03:00".parse().unwrap();
        let mut schedule = Schedule::new();
        let entry = schedule.entry("1.1");
        entry.today = Some(DayRecord::waiting(date));
        entry.updated_on = Some("2025-06-10T08:15:00+03:00".parse().unwrap());

        let json = serde_json::to_value(&schedule).unwrap();
        let group = &json["1.1"];
        assert_eq!(group["today"]["status"], "WaitingForSchedule");
        assert_eq!(group["today"]["slots"], serde_json::json!([]));
        assert!(group["today"].get("rawRanges").is_none());
        assert_eq!(group["updatedOn"], "2025-06-10T08:15:00+03:00");
        assert!(group.get("tomorrow").is_none());
    }

    #[test]
    fn test_schedule_roundtrips_through_json() {
        let date: DateTime<FixedOffset> = "2025-06-10T00:00:00+03:00".parse().unwrap();
        let mut schedule = Schedule::new();
        let entry = schedule.entry("2.1");
        let mut day = DayRecord::new(date);
        day.raw_ranges = vec![TimeRange::new(360, 660)];
        day.slots = vec![
            Slot {
                start: 0,
                end: 360,
                kind: SlotKind::NotPlanned,
            },
            Slot {
                start: 360,
                end: 660,
                kind: SlotKind::Definite,
            },
            Slot {
                start: 660,
                end: MINUTES_IN_DAY,
                kind: SlotKind::NotPlanned,
            },
        ];
        entry.tomorrow = Some(day);

        let json = serde_json::to_string(&schedule).unwrap();
        let back: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schedule);
    }
}
