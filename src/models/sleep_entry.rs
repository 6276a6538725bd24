//! Sleep interval and nightly ledger entry data models.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A consolidated span believed to represent uninterrupted sleep.
/// Invariant: `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SleepInterval {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// One calendar day of sleep statistics. `date` names the night being
/// described ("yesterday" from the refresh cycle's point of view).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepEntry {
    pub id: String,
    pub date: NaiveDate,
    /// Start of each consolidated sleep segment, sorted ascending.
    pub bedtimes: Vec<DateTime<Utc>>,
    /// Total hours slept inside the night window, one decimal.
    pub hours: f64,
    /// 1-5 rating, either predicted or user-set.
    pub quality: u8,
    /// Most recent automatic prediction. `None` means no prediction was
    /// ever recorded for this entry, so any stored quality is user-authored.
    pub predicted: Option<u8>,
    /// Daily step count, reconciled after the fact.
    pub steps: Option<u64>,
}

impl SleepEntry {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            bedtimes: Vec::new(),
            hours: 0.0,
            quality: 3,
            predicted: None,
            steps: None,
        }
    }
}
