//! Daily refresh loop: once per calendar day, pull the last 48 hours of
//! motion samples, consolidate them into last night's summary, and hand the
//! result to the ledger.

use std::sync::Arc;

use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use log::{info, warn};
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

use crate::detector::window::midnight;
use crate::detector::{detect_sleep_segments, DetectorConfig, NightWindow};
use crate::sources::{MotionSource, StepSource};
use crate::store::SleepStore;

/// Lookback for the motion query; wide enough to catch a bedtime from the
/// evening before the night being summarized.
const LOOKBACK_HOURS: i64 = 48;

pub async fn refresh_loop(
    store: SleepStore,
    motion: Arc<dyn MotionSource>,
    steps: Arc<dyn StepSource>,
    cancel_token: CancellationToken,
) {
    // Catch up immediately on start, then once per midnight
    refresh_once(&store, motion.as_ref(), steps.as_ref(), Utc::now().date_naive()).await;

    loop {
        let wait = until_next_midnight();
        tokio::select! {
            _ = sleep(wait) => {
                refresh_once(&store, motion.as_ref(), steps.as_ref(), Utc::now().date_naive()).await;
            }
            _ = cancel_token.cancelled() => {
                info!("refresh loop shutting down");
                break;
            }
        }
    }
}

/// One refresh cycle for the night that ended on the morning of `today`.
///
/// A motion source error skips the whole cycle without touching the ledger.
/// A step source error leaves the first-pass entry in place; the count can
/// still be reconciled by a later cycle.
pub async fn refresh_once(
    store: &SleepStore,
    motion: &dyn MotionSource,
    steps: &dyn StepSource,
    today: NaiveDate,
) {
    let Some(yesterday) = today.pred_opt() else {
        return;
    };
    let today_midnight = midnight(today);
    let window_start = today_midnight - ChronoDuration::hours(LOOKBACK_HOURS);

    let samples = match motion.fetch(window_start, today_midnight) {
        Ok(samples) => samples,
        Err(err) => {
            warn!("motion source unavailable, skipping refresh: {err:#}");
            return;
        }
    };

    let segments = detect_sleep_segments(&samples, &DetectorConfig::default());
    let summary = NightWindow::for_night(yesterday).summarize(&segments);
    info!(
        "night of {yesterday}: {} segment(s), {:.1}h",
        summary.bedtimes.len(),
        summary.hours
    );
    store
        .upsert_night(yesterday, summary.bedtimes, summary.hours)
        .await;

    match steps.fetch_steps(yesterday) {
        Ok(count) => store.reconcile_steps(yesterday, count).await,
        Err(err) => warn!("step source unavailable for {yesterday}: {err:#}"),
    }
}

fn until_next_midnight() -> Duration {
    let now = Utc::now();
    let next = match now.date_naive().succ_opt() {
        Some(tomorrow) => midnight(tomorrow),
        None => return Duration::from_secs(24 * 3600),
    };
    (next - now).to_std().unwrap_or(Duration::ZERO)
}
