//! Reminder planning for the notification layer.
//!
//! The core only computes *when* the reminders should fire; scheduling and
//! delivery belong to whatever notification backend the host application
//! wires in. The cue offsets are product decisions and must not drift.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::settings::{ClockTime, SleepGoals};

/// One-off cues anchored to a target bedtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BedtimeCues {
    /// Last caffeine, six hours out.
    pub caffeine_cutoff: DateTime<Utc>,
    /// Start winding down, one hour out.
    pub wind_down: DateTime<Utc>,
}

/// Repeating wake reminder at a fixed wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyAlarm {
    pub time: ClockTime,
}

pub fn bedtime_cues(target_bedtime: DateTime<Utc>) -> BedtimeCues {
    BedtimeCues {
        caffeine_cutoff: target_bedtime - Duration::hours(6),
        wind_down: target_bedtime - Duration::hours(1),
    }
}

pub fn daily_alarm(goals: &SleepGoals) -> DailyAlarm {
    DailyAlarm {
        time: goals.wake_time,
    }
}

/// Cues for the night beginning on `date`, if a target bedtime is
/// configured.
pub fn cues_for_night(goals: &SleepGoals, date: NaiveDate) -> Option<BedtimeCues> {
    goals.target_bedtime_for(date).map(bedtime_cues)
}
