use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::models::SleepInterval;

/// Half-open night window `[start, end)` that detected intervals are
/// clipped against. All calendar math is fixed to UTC so "midnight" is
/// unambiguous and reproducible.
#[derive(Debug, Clone, Copy)]
pub struct NightWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Clipped totals for one night.
#[derive(Debug, Clone, PartialEq)]
pub struct NightSummary {
    /// Unclipped start times of the surviving intervals, sorted ascending.
    pub bedtimes: Vec<DateTime<Utc>>,
    /// Sum of clipped interval durations, rounded to one decimal place
    /// (half rounds up).
    pub hours: f64,
}

impl NightWindow {
    /// The window for the night described by `date`: `[date 00:00, date+1 00:00)`.
    pub fn for_night(date: NaiveDate) -> Self {
        Self {
            start: midnight(date),
            end: midnight(date.succ_opt().unwrap_or(date)),
        }
    }

    /// Clip an interval to the window; intervals that end up empty or
    /// inverted are discarded.
    pub fn clip(&self, interval: &SleepInterval) -> Option<SleepInterval> {
        let start = interval.start.max(self.start);
        let end = interval.end.min(self.end);
        (end > start).then_some(SleepInterval { start, end })
    }

    /// Total hours inside the window plus the bedtime list for the night.
    pub fn summarize(&self, intervals: &[SleepInterval]) -> NightSummary {
        let mut bedtimes = Vec::new();
        let mut total_secs: i64 = 0;

        for interval in intervals {
            if let Some(clipped) = self.clip(interval) {
                bedtimes.push(interval.start);
                total_secs += clipped.duration().num_seconds();
            }
        }
        bedtimes.sort();

        NightSummary {
            bedtimes,
            hours: round_tenths(total_secs as f64 / 3600.0),
        }
    }
}

/// 00:00 UTC on the given day.
pub fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn round_tenths(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}
