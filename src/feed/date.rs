//! Resolving message dates in the publication timezone.
//!
//! Announcements carry a day number and a month name but no year. The year
//! is taken from the reference instant, rolling across the December/January
//! boundary in whichever direction matches the message. All dates are
//! anchored at local midnight in the publication timezone so day boundaries
//! do not shift for operators running in a different offset.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;

use svitlo_core::DayKey;

/// The civil timezone all schedule dates are anchored in.
pub(crate) const PUBLICATION_TZ: Tz = chrono_tz::Europe::Kyiv;

const MONTH_JANUARY: u32 = 1;
const MONTH_DECEMBER: u32 = 12;

lazy_static! {
    // "29 ГРУДНЯ", "02 грудня"
    static ref DAY_MONTH_RE: Regex = Regex::new(r"(\d{1,2})\s+([А-ЯІЇЄа-яіїє]+)")
        .expect("Failed to compile DAY_MONTH_RE regex");
}

/// Genitive month names as they appear in announcements.
fn month_number(name: &str) -> Option<u32> {
    match name.to_uppercase().as_str() {
        "СІЧНЯ" => Some(1),
        "ЛЮТОГО" => Some(2),
        "БЕРЕЗНЯ" => Some(3),
        "КВІТНЯ" => Some(4),
        "ТРАВНЯ" => Some(5),
        "ЧЕРВНЯ" => Some(6),
        "ЛИПНЯ" => Some(7),
        "СЕРПНЯ" => Some(8),
        "ВЕРЕСНЯ" => Some(9),
        "ЖОВТНЯ" => Some(10),
        "ЛИСТОПАДА" => Some(11),
        "ГРУДНЯ" => Some(12),
        _ => None,
    }
}

/// A message date resolved against the reconciliation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub key: DayKey,
    /// Local midnight in the publication timezone.
    pub date: DateTime<FixedOffset>,
}

/// Find the first day-number followed by a recognized month name and
/// classify the resolved date against `now`.
///
/// Returns `None` when the text carries no recognizable date, the date does
/// not exist in the resolved year, or it falls outside the Today/Tomorrow
/// window — all of which mean the message is skipped upstream.
pub fn resolve_date(text: &str, now: DateTime<Utc>) -> Option<ResolvedDate> {
    let today = now.with_timezone(&PUBLICATION_TZ).date_naive();
    let tomorrow = today.succ_opt()?;

    let (day, month) = DAY_MONTH_RE.captures_iter(text).find_map(|caps| {
        let month = month_number(&caps[2])?;
        let day: u32 = caps[1].parse().ok()?;
        Some((day, month))
    })?;

    let date = NaiveDate::from_ymd_opt(resolve_year(month, today), month, day)?;

    let key = if date == today {
        DayKey::Today
    } else if date == tomorrow {
        DayKey::Tomorrow
    } else {
        return None;
    };

    Some(ResolvedDate {
        key,
        date: local_midnight(date)?,
    })
}

/// Default to the reference year; a January message seen in December belongs
/// to the next year, a December message seen in January to the previous one.
fn resolve_year(month: u32, today: NaiveDate) -> i32 {
    if month == MONTH_JANUARY && today.month() == MONTH_DECEMBER {
        today.year() + 1
    } else if month == MONTH_DECEMBER && today.month() == MONTH_JANUARY {
        today.year() - 1
    } else {
        today.year()
    }
}

/// Midnight of `date` in the publication timezone, with its fixed offset.
pub(crate) fn local_midnight(date: NaiveDate) -> Option<DateTime<FixedOffset>> {
    PUBLICATION_TZ
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .earliest()
        .map(|dt| dt.fixed_offset())
}
