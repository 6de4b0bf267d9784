//! Seam for the structured planned-outages source.

use async_trait::async_trait;

use svitlo_core::{Schedule, SvitloResult};

/// A structured source of planned-outage schedules.
///
/// Implementations live with the host; the reconciler only reads the
/// returned schedule and never mutates it. A failed fetch is reported once
/// per run — retries and backoff are the caller's policy.
#[async_trait]
pub trait PlannedSource {
    /// Source name used for log attribution.
    fn name(&self) -> &str;

    /// Fetch the current schedule covering `group`.
    async fn fetch_schedule(&self, group: &str) -> SvitloResult<Schedule>;
}
