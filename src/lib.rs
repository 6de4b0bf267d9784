//! Rebuilding power-outage schedules from a public announcement channel.
//!
//! The pipeline: fetch the channel page, extract its messages, replay them
//! chronologically into per-group day timelines, then reconcile the result
//! with a structured planned-outages source:
//! - `feed` module: fetch, extraction, date resolution and the stateful fold
//! - `provider` module: the seam for the structured source
//! - `reconcile` module: combining both sources into the final schedule
//!
//! Schedule types live in the `svitlo-core` crate and are re-exported here
//! for convenience.

pub mod feed;
pub mod provider;
pub mod reconcile;

pub use feed::{ChannelFeed, Message, FEED_URL};
pub use provider::PlannedSource;
pub use reconcile::Reconciler;

pub use svitlo_core::{
    merge_ranges, ranges_to_slots, DayKey, DayRecord, DayStatus, GroupSchedule, Schedule, Slot,
    SlotKind, SvitloError, SvitloResult, TimeRange, MINUTES_IN_DAY,
};
