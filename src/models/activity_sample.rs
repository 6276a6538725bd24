//! Motion activity sample data model.
//!
//! Represents a single timestamped classification from the external motion
//! source: was the device stationary at that instant, and how sure is the
//! classifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// One raw sample from the motion source. Samples are valid from their
/// `start_time` until the next sample's `start_time`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySample {
    pub start_time: DateTime<Utc>,
    pub stationary: bool,
    pub confidence: Confidence,
}

impl ActivitySample {
    pub fn new(start_time: DateTime<Utc>, stationary: bool, confidence: Confidence) -> Self {
        Self {
            start_time,
            stationary,
            confidence,
        }
    }
}
