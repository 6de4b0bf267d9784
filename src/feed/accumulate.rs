//! Folding the chronological message stream into a finalized schedule.
//!
//! State is rebuilt from scratch on every run by replaying the currently
//! fetched messages oldest to newest. Each message either patches or
//! replaces the accumulated ranges of the groups it mentions; afterwards
//! every group is finalized so no day or timestamp is left unpopulated.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use svitlo_core::{DayKey, DayRecord, Schedule};

use super::date::{local_midnight, resolve_date, PUBLICATION_TZ};
use super::extract::Message;
use super::message::{apply_message, is_full_update};

/// Announcements mentioning these places cover a different service area and
/// never contribute schedule entries. Matched against the uppercased text.
const IGNORED_PLACES: [&str; 6] = [
    "ЖОВТІ ВОДИ",
    "ВІЛЬНОГІРСЬК",
    "ПАВЛОГРАД",
    "ЗЕЛЕНОДОЛЬСЬК",
    "АПОСТОЛОВЕ",
    "КРИВОРІЗЬК",
];

/// Replay messages (oldest to newest) into a finalized schedule.
///
/// Every group in the result carries both day records and an `updated_on`
/// stamp: days no message touched are backfilled as `WaitingForSchedule`,
/// and groups with no usable publish time are stamped with `now`.
pub fn fold_messages<I>(messages: I, now: DateTime<Utc>) -> Schedule
where
    I: IntoIterator<Item = Message>,
{
    let mut schedule = Schedule::new();
    let mut latest_publish: HashMap<String, String> = HashMap::new();

    for message in messages {
        let upper = message.text.to_uppercase();
        if IGNORED_PLACES.iter().any(|place| upper.contains(place)) {
            debug!("skipping out-of-area announcement");
            continue;
        }

        let resolved = match resolve_date(&message.text, now) {
            Some(resolved) => resolved,
            None => continue,
        };

        let mut touched = HashSet::new();
        apply_message(
            &mut schedule,
            &message.text,
            resolved.key,
            resolved.date,
            is_full_update(&message.text),
            &mut touched,
        );

        if let Some(published) = message.published {
            for group in touched {
                record_publish_time(&mut latest_publish, group, &published);
            }
        }
    }

    finalize(&mut schedule, &latest_publish, now);
    schedule
}

/// Keep the later of the stored and incoming publish times for a group.
/// If either side fails to parse, the incoming value wins.
fn record_publish_time(latest: &mut HashMap<String, String>, group: String, incoming: &str) {
    if let Some(stored) = latest.get(&group) {
        let keep_stored = matches!(
            (
                DateTime::parse_from_rfc3339(stored),
                DateTime::parse_from_rfc3339(incoming),
            ),
            (Ok(stored), Ok(incoming)) if incoming <= stored
        );
        if keep_stored {
            return;
        }
    }
    latest.insert(group, incoming.to_string());
}

/// Backfill missing day records and resolve `updated_on` for every group.
fn finalize(schedule: &mut Schedule, latest_publish: &HashMap<String, String>, now: DateTime<Utc>) {
    let today = now.with_timezone(&PUBLICATION_TZ).date_naive();
    let tomorrow = today.succ_opt().unwrap_or(today);
    let fallback_stamp = now.with_timezone(&PUBLICATION_TZ).fixed_offset();

    for (group, entry) in schedule.groups.iter_mut() {
        for key in DayKey::ALL {
            if entry.day(key).is_some() {
                continue;
            }
            let date = match key {
                DayKey::Today => today,
                DayKey::Tomorrow => tomorrow,
            };
            if let Some(midnight) = local_midnight(date) {
                debug!(group = %group, day = ?key, "no update seen, backfilling as waiting");
                *entry.day_mut(key) = Some(DayRecord::waiting(midnight));
            }
        }

        entry.updated_on = latest_publish
            .get(group)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .or(Some(fallback_stamp));
    }
}
