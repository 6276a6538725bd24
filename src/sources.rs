//! Boundary traits for the external data collaborators.
//!
//! The core never talks to a sensor API directly; it asks these traits and
//! treats any error as "unavailable this cycle" — the ledger is simply left
//! unchanged.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};

use crate::models::ActivitySample;

/// Supplies chronological motion samples for a time window.
pub trait MotionSource: Send + Sync {
    fn fetch(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<ActivitySample>>;
}

/// Supplies the total step count for a calendar day. Queried only after the
/// night's segments are known.
pub trait StepSource: Send + Sync {
    fn fetch_steps(&self, date: NaiveDate) -> Result<u64>;
}
