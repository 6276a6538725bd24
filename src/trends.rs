//! Derived weekly metrics: sleep debt and personalized tips.
//!
//! Presentation-layer math over the ledger snapshot; nothing here feeds back
//! into scoring or persistence.

use chrono::Timelike;

use crate::models::SleepEntry;

/// Cumulative shortfall of actual hours below the nightly goal across the
/// week. Surplus nights do not pay the debt down.
pub fn sleep_debt(week: &[SleepEntry], goal_hours: f64) -> f64 {
    week.iter().fold(0.0, |total, entry| {
        let deficit = goal_hours - entry.hours;
        if deficit > 0.0 {
            total + deficit
        } else {
            total
        }
    })
}

/// Personalized tips derived from the week.
pub fn suggestions(week: &[SleepEntry], goal_hours: f64) -> Vec<String> {
    let mut tips = Vec::new();

    let debt = sleep_debt(week, goal_hours);
    if debt > 0.5 {
        tips.push(format!(
            "You accumulated {debt:.1} h of sleep debt - aim for an earlier bed."
        ));
    } else {
        tips.push("Great job keeping debt low!".to_string());
    }

    let firsts: Vec<i64> = week
        .iter()
        .filter_map(|e| e.bedtimes.first())
        .map(|bt| (bt.hour() * 60 + bt.minute()) as i64)
        .collect();
    if firsts.len() >= 2 {
        let lo = firsts.iter().min().unwrap();
        let hi = firsts.iter().max().unwrap();
        if hi - lo > 120 {
            tips.push("Your bedtime shifts more than 2 h - try to stay consistent.".to_string());
        }
    }

    let steps: Vec<u64> = week.iter().filter_map(|e| e.steps).collect();
    if !steps.is_empty() {
        let avg = steps.iter().sum::<u64>() / steps.len() as u64;
        if avg < 5_000 {
            tips.push(format!(
                "Average steps = {avg}. More daytime activity can improve sleep."
            ));
        }
    }

    if !week.is_empty() {
        let avg_hours = week.iter().map(|e| e.hours).sum::<f64>() / week.len() as f64;
        if avg_hours + 0.5 < goal_hours {
            tips.push(format!(
                "You're averaging {avg_hours:.1} h vs {goal_hours:.0} h goal - go to bed earlier."
            ));
        }
    }

    tips
}
