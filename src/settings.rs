//! User sleep-goal configuration and its JSON-backed store.
//!
//! The goal values are passed around as a plain `SleepGoals` value rather
//! than read from ambient global state, so the store and analyzer stay
//! testable without a settings file on disk.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

/// Wall-clock time of day (24h), minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    fn total_minutes(&self) -> i64 {
        (self.hour * 60 + self.minute) as i64
    }
}

/// Target bedtime and wake/alarm time. `target_bedtime` is optional; without
/// it the nightly goal falls back to 8 hours and the target-deviation
/// penalty never applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepGoals {
    pub target_bedtime: Option<ClockTime>,
    pub wake_time: ClockTime,
}

impl Default for SleepGoals {
    fn default() -> Self {
        Self {
            target_bedtime: None,
            wake_time: ClockTime::new(7, 0),
        }
    }
}

impl SleepGoals {
    /// Nightly sleep-goal duration in hours.
    ///
    /// An evening target (hour >= 18) counts minutes to midnight plus
    /// minutes from midnight to the alarm; a post-midnight target counts
    /// straight to the alarm on the same day. Negative spans clamp to 0.
    pub fn goal_hours(&self) -> f64 {
        let Some(target) = self.target_bedtime else {
            return 8.0; // fallback
        };

        let bt = target.total_minutes();
        let al = self.wake_time.total_minutes();
        let diff = if target.hour >= 18 {
            (24 * 60 - bt) + al
        } else {
            al - bt
        };
        diff.max(0) as f64 / 60.0
    }

    /// Absolute instant of the configured target bedtime for the night
    /// beginning on `date`. A target before 18:00 is an after-midnight
    /// bedtime and lands on the following calendar day.
    pub fn target_bedtime_for(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        let target = self.target_bedtime?;
        let day = if target.hour < 18 {
            date.succ_opt()?
        } else {
            date
        };
        day.and_hms_opt(target.hour, target.minute, 0)
            .map(|naive| naive.and_utc())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct UserSettings {
    goals: SleepGoals,
}

/// JSON-file settings store. Unreadable or missing files degrade to the
/// defaults instead of failing startup.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn goals(&self) -> SleepGoals {
        self.data.read().unwrap().goals
    }

    pub fn update_goals(&self, goals: SleepGoals) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            guard.goals = goals;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
