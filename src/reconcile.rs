//! Combining the feed-derived schedule with the planned source.
//!
//! The feed is authoritative for groups it covers; the planned source
//! contributes its emergency status and serves as a wholesale fallback.
//! Either fetch may fail without failing the run — only both failing does.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use svitlo_core::{DayKey, DayStatus, Schedule, SvitloError, SvitloResult};

use crate::feed::ChannelFeed;
use crate::provider::PlannedSource;

/// Result of one upstream fetch, with failure demoted to a logged state
/// instead of propagating as an error.
enum SourceOutcome {
    Ready(Schedule),
    Unavailable,
}

impl SourceOutcome {
    fn from_result(result: SvitloResult<Schedule>, source: &str) -> Self {
        match result {
            Ok(schedule) => SourceOutcome::Ready(schedule),
            Err(error) => {
                warn!(source, error = %error, "source unavailable, continuing without it");
                SourceOutcome::Unavailable
            }
        }
    }

    fn ready(self) -> Option<Schedule> {
        match self {
            SourceOutcome::Ready(schedule) => Some(schedule),
            SourceOutcome::Unavailable => None,
        }
    }
}

/// Builds the authoritative schedule for one group from both sources.
pub struct Reconciler<S> {
    feed: ChannelFeed,
    planned: S,
    group: String,
}

impl<S: PlannedSource + Sync> Reconciler<S> {
    pub fn new(feed: ChannelFeed, planned: S, group: impl Into<String>) -> Self {
        Reconciler {
            feed,
            planned,
            group: group.into(),
        }
    }

    /// Fetch both sources and combine them.
    ///
    /// Fails only when neither source produced data; the caller owns the
    /// stale-cache or error-display policy for that case.
    pub async fn reconcile(&self, now: DateTime<Utc>) -> SvitloResult<Schedule> {
        let planned = SourceOutcome::from_result(
            self.planned.fetch_schedule(&self.group).await,
            self.planned.name(),
        )
        .ready();
        let primary =
            SourceOutcome::from_result(self.feed.fetch_schedule(now).await, "feed").ready();

        combine(primary, planned, &self.group)
    }
}

/// Pure combination rule.
///
/// If the feed covers the group it wins, except that an emergency status
/// reported by the planned source overrides the feed's day status. A group
/// the feed does not cover falls back to the planned schedule wholesale.
fn combine(
    primary: Option<Schedule>,
    planned: Option<Schedule>,
    group: &str,
) -> SvitloResult<Schedule> {
    match (primary, planned) {
        (Some(mut primary), planned) if primary.group(group).is_some() => {
            if let Some(planned) = planned {
                inject_emergency_status(&mut primary, &planned, group);
            }
            Ok(primary)
        }
        (_, Some(planned)) if !planned.is_empty() => {
            warn!(group, "feed has no entry for group, falling back to planned source");
            Ok(planned)
        }
        _ => Err(SvitloError::BothSourcesFailed),
    }
}

/// Copy an emergency day status from the planned source onto the feed's
/// record for the same group and day. Slots stay untouched.
fn inject_emergency_status(primary: &mut Schedule, planned: &Schedule, group: &str) {
    let planned_group = match planned.group(group) {
        Some(entry) => entry,
        None => return,
    };
    let primary_group = match primary.group_mut(group) {
        Some(entry) => entry,
        None => return,
    };

    for key in DayKey::ALL {
        let emergency = planned_group
            .day(key)
            .is_some_and(|day| day.status == DayStatus::EmergencyShutdowns);
        if !emergency {
            continue;
        }
        if let Some(day) = primary_group.day_mut(key).as_mut() {
            info!(group, day = ?key, "planned source reports emergency shutdowns, overriding status");
            day.status = DayStatus::EmergencyShutdowns;
        }
    }
}
