//! Core types for the svitlo ecosystem.
//!
//! This crate provides the types shared by the feed pipeline and planned
//! outage sources:
//! - `schedule` module: `Schedule`, `GroupSchedule`, `DayRecord` and friends
//! - `timeline` module: merging raw ranges into a gapless day timeline
//! - `error` module: the common error type

pub mod error;
pub mod schedule;
pub mod timeline;

pub use error::{SvitloError, SvitloResult};
pub use schedule::*;
pub use timeline::{merge_ranges, ranges_to_slots};
