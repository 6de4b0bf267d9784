//! Error types for the svitlo ecosystem.

use thiserror::Error;

/// Errors that can occur while building or reconciling a schedule.
#[derive(Error, Debug)]
pub enum SvitloError {
    #[error("Feed unavailable: {0}")]
    FeedUnavailable(String),

    #[error("Planned source '{source_name}' unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    #[error("No schedule data from either the feed or the planned source")]
    BothSourcesFailed,
}

/// Result type alias for svitlo operations.
pub type SvitloResult<T> = Result<T, SvitloError>;
