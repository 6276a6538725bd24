//! Rolling 7-night sleep ledger.
//!
//! Owns the week of `SleepEntry` records, drives the quality analyzer and
//! reconciles the two-phase update: segments arrive first from the detector,
//! the day's step count arrives later from the step source, and the user may
//! have rated the night by hand at any point in between.
//!
//! Every mutation is a read-modify-write over the ledger, so all of them
//! serialize through one async mutex. Persistence is best-effort: a failed
//! write logs and the next successful mutation overwrites with current
//! state.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, NaiveDate, Utc};
use log::error;
use tokio::sync::Mutex;

use crate::analyzer::{predict_quality, NightStats};
use crate::db::Database;
use crate::models::SleepEntry;
use crate::settings::SleepGoals;

/// Ledger length bound; the oldest night falls off on overflow.
const LEDGER_DAYS: usize = 7;

#[derive(Clone)]
pub struct SleepStore {
    week: Arc<Mutex<Vec<SleepEntry>>>,
    goals: Arc<RwLock<SleepGoals>>,
    db: Option<Database>,
}

impl SleepStore {
    /// Open the ledger at `db_path`. Unreadable or corrupt storage degrades
    /// to an empty in-memory ledger; this constructor never fails.
    pub async fn open(db_path: PathBuf, goals: SleepGoals) -> Self {
        let db = match Database::new(db_path) {
            Ok(db) => Some(db),
            Err(err) => {
                error!("sleep ledger storage unavailable, continuing in memory: {err:#}");
                None
            }
        };
        Self::load(db, goals).await
    }

    /// Build a store over an already-open database (or none, for a purely
    /// in-memory ledger) and load the persisted week.
    pub async fn load(db: Option<Database>, goals: SleepGoals) -> Self {
        let week = match &db {
            Some(db) => match db.load_entries().await {
                Ok(mut entries) => {
                    entries.sort_by_key(|e| e.date);
                    entries
                }
                Err(err) => {
                    error!("failed to load sleep ledger, starting empty: {err:#}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Self {
            week: Arc::new(Mutex::new(week)),
            goals: Arc::new(RwLock::new(goals)),
            db,
        }
    }

    pub fn goals(&self) -> SleepGoals {
        *self.goals.read().unwrap()
    }

    pub fn set_goals(&self, goals: SleepGoals) {
        *self.goals.write().unwrap() = goals;
    }

    /// Nightly sleep-goal duration derived from the configured times.
    pub fn goal_hours(&self) -> f64 {
        self.goals().goal_hours()
    }

    /// Configured target-bedtime instant for the night beginning on `date`.
    pub fn target_bedtime_for(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        self.goals().target_bedtime_for(date)
    }

    /// Snapshot of the current week, date ascending.
    pub async fn week(&self) -> Vec<SleepEntry> {
        self.week.lock().await.clone()
    }

    /// Stored quality for `date`, or the neutral default.
    pub async fn quality_for(&self, date: NaiveDate) -> u8 {
        self.week
            .lock()
            .await
            .iter()
            .find(|e| e.date == date)
            .map(|e| e.quality)
            .unwrap_or(3)
    }

    /// First pass: new detector output for a night. Creates or updates the
    /// entry, re-predicts quality, and preserves a user override.
    ///
    /// An entry counts as overridden when its stored quality no longer
    /// matches the last recorded prediction (or when no prediction was ever
    /// recorded, which means the entry was created by hand). Overridden
    /// entries still take the new bedtimes and hours; only the rating stays
    /// pinned.
    pub async fn upsert_night(
        &self,
        date: NaiveDate,
        mut bedtimes: Vec<DateTime<Utc>>,
        hours: f64,
    ) {
        let goals = self.goals();
        let goal_hours = goals.goal_hours();
        let target = goals.target_bedtime_for(date);

        let mut week = self.week.lock().await;
        let recent = recent_bedtimes(&week, date);

        bedtimes.sort();
        let idx = week.iter().position(|e| e.date == date);
        let mut entry = match idx {
            Some(i) => week[i].clone(),
            None => SleepEntry::new(date),
        };
        entry.bedtimes = bedtimes;
        entry.hours = hours.max(0.0);

        let predicted = predict_quality(&NightStats {
            hours: entry.hours,
            goal_hours,
            segments: entry.bedtimes.len(),
            steps: entry.steps,
            bedtime: entry.bedtimes.first().copied(),
            target_bedtime: target,
            recent_bedtimes: &recent,
        });

        let overridden = idx.is_some() && entry.predicted.map_or(true, |p| p != entry.quality);
        if !overridden {
            entry.quality = predicted;
        }
        entry.predicted = Some(predicted);

        match idx {
            Some(i) => week[i] = entry,
            None => week.push(entry),
        }

        trim(&mut week);
        self.persist(&week).await;
    }

    /// Second pass: the day's step count arrived. A night evicted from the
    /// ledger in the meantime is a no-op. The override check compares
    /// against the pre-reconciliation prediction, so a rating the user set
    /// between the two passes survives.
    pub async fn reconcile_steps(&self, date: NaiveDate, steps: u64) {
        let goals = self.goals();
        let goal_hours = goals.goal_hours();
        let target = goals.target_bedtime_for(date);

        let mut week = self.week.lock().await;
        let Some(idx) = week.iter().position(|e| e.date == date) else {
            return;
        };
        let recent = recent_bedtimes(&week, date);

        let mut entry = week[idx].clone();
        let overridden = entry.predicted.map_or(true, |p| p != entry.quality);
        entry.steps = Some(steps);

        let predicted = predict_quality(&NightStats {
            hours: entry.hours,
            goal_hours,
            segments: entry.bedtimes.len(),
            steps: entry.steps,
            bedtime: entry.bedtimes.first().copied(),
            target_bedtime: target,
            recent_bedtimes: &recent,
        });

        if !overridden {
            entry.quality = predicted;
        }
        entry.predicted = Some(predicted);

        week[idx] = entry;
        self.persist(&week).await;
    }

    /// Explicit user rating. Creates the entry (zero hours, no bedtimes)
    /// when the night has no data yet. The value wins over subsequent
    /// automatic predictions; if it happens to equal the recorded
    /// prediction it becomes indistinguishable from one.
    pub async fn set_quality(&self, date: NaiveDate, value: u8) {
        let value = value.clamp(1, 5);

        let mut week = self.week.lock().await;
        match week.iter().position(|e| e.date == date) {
            Some(i) => week[i].quality = value,
            None => {
                let mut entry = SleepEntry::new(date);
                entry.quality = value;
                week.push(entry);
            }
        }

        trim(&mut week);
        self.persist(&week).await;
    }

    async fn persist(&self, week: &[SleepEntry]) {
        let Some(db) = &self.db else {
            return;
        };
        if let Err(err) = db.replace_entries(week.to_vec()).await {
            error!("failed to persist sleep ledger: {err:#}");
        }
    }
}

/// First bedtime of every other night in the ledger. The night being scored
/// is excluded so the first-pass and reconciliation-pass score calls see the
/// same regularity input.
fn recent_bedtimes(week: &[SleepEntry], date: NaiveDate) -> Vec<DateTime<Utc>> {
    week.iter()
        .filter(|e| e.date != date)
        .filter_map(|e| e.bedtimes.first().copied())
        .collect()
}

/// Sort ascending by date and keep the most recent `LEDGER_DAYS` nights.
fn trim(week: &mut Vec<SleepEntry>) {
    week.sort_by_key(|e| e.date);
    if week.len() > LEDGER_DAYS {
        let excess = week.len() - LEDGER_DAYS;
        week.drain(..excess);
    }
}
