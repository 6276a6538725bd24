//! Rule-based sleep-quality rating (1 = poor ... 5 = excellent).
//!
//! Deterministic additive-penalty engine: every rule can only subtract from
//! a perfect 5, and the result clamps back into [1, 5]. No I/O, no state —
//! identical inputs always produce identical output.

use chrono::{DateTime, Timelike, Utc};

/// Everything known about a single night at scoring time.
#[derive(Debug, Clone)]
pub struct NightStats<'a> {
    pub hours: f64,
    pub goal_hours: f64,
    /// Number of consolidated sleep segments (1 = uninterrupted night).
    pub segments: usize,
    pub steps: Option<u64>,
    /// First bedtime of the night being scored.
    pub bedtime: Option<DateTime<Utc>>,
    pub target_bedtime: Option<DateTime<Utc>>,
    /// First bedtimes of the surrounding ledger nights.
    pub recent_bedtimes: &'a [DateTime<Utc>],
}

/// Predict a star rating for a single night.
pub fn predict_quality(stats: &NightStats) -> u8 {
    let mut score: i32 = 5;

    // 1. duration vs goal
    let severe_deficit = stats.goal_hours * 0.80; // > 20% below goal
    if stats.hours < severe_deficit {
        score -= 2;
    } else if stats.hours < stats.goal_hours {
        score -= 1;
    }

    // 2. fragmentation
    if stats.segments > 1 {
        score -= 1;
    }
    if stats.segments > 2 {
        score -= 1; // multiple awakenings
    }

    // 3. bedtime regularity
    if stats.recent_bedtimes.len() >= 2 {
        let minutes: Vec<f64> = stats
            .recent_bedtimes
            .iter()
            .map(|bt| minutes_from_6pm(*bt))
            .collect();
        let mean = minutes.iter().sum::<f64>() / minutes.len() as f64;
        let avg_dev =
            minutes.iter().map(|m| (m - mean).abs()).sum::<f64>() / minutes.len() as f64;
        if avg_dev > 60.0 {
            score -= 1; // > 1h average deviation
        }
    }

    // deviation from user-set target
    if let (Some(target), Some(actual)) = (stats.target_bedtime, stats.bedtime) {
        if (actual - target).num_seconds().abs() > 3_600 {
            score -= 1;
        }
    }

    // 4. daytime activity
    if let Some(step_count) = stats.steps {
        if step_count < 3_000 {
            score -= 1; // very low activity
        }
    }

    score.clamp(1, 5) as u8
}

/// Minutes from 6 PM; times after midnight roll past 24h so bedtimes on
/// either side of midnight stay comparable (11 PM -> 300, 1 AM -> 420).
fn minutes_from_6pm(bedtime: DateTime<Utc>) -> f64 {
    let mut total = (bedtime.hour() * 60 + bedtime.minute()) as f64;
    if bedtime.hour() < 18 {
        total += 24.0 * 60.0; // 0:00-17:59 treated as next day
    }
    total - 18.0 * 60.0
}
