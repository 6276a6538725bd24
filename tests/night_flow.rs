//! End-to-end flow: samples -> detector -> night window -> ledger -> SQLite.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use nocturne::{
    detect_sleep_segments, predict_quality, ActivitySample, ClockTime, Confidence, Database,
    DetectorConfig, NightStats, NightWindow, SleepGoals, SleepInterval, SleepStore,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn goals() -> SleepGoals {
    SleepGoals {
        target_bedtime: Some(ClockTime::new(23, 0)),
        wake_time: ClockTime::new(7, 0),
    }
}

fn at(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, min, 0).unwrap()
}

#[test]
fn textbook_night_scores_four() {
    init_logging();

    // One stationary run from 23:10 to 06:40, high confidence throughout
    let samples = vec![
        ActivitySample::new(at(9, 22, 0), false, Confidence::High),
        ActivitySample::new(at(9, 23, 10), true, Confidence::High),
        ActivitySample::new(at(10, 2, 0), true, Confidence::Medium),
        ActivitySample::new(at(10, 6, 40), false, Confidence::High),
    ];

    let segments = detect_sleep_segments(&samples, &DetectorConfig::default());
    assert_eq!(
        segments,
        vec![SleepInterval {
            start: at(9, 23, 10),
            end: at(10, 6, 40),
        }]
    );

    // A window containing the whole run: clipping is the identity
    let window = NightWindow {
        start: at(9, 18, 0),
        end: at(10, 18, 0),
    };
    let summary = window.summarize(&segments);
    assert_eq!(summary.hours, 7.5);
    assert_eq!(summary.bedtimes, vec![at(9, 23, 10)]);

    // 7.5h against an 8h goal: the duration penalty alone
    let score = predict_quality(&NightStats {
        hours: summary.hours,
        goal_hours: 8.0,
        segments: summary.bedtimes.len(),
        steps: None,
        bedtime: summary.bedtimes.first().copied(),
        target_bedtime: None,
        recent_bedtimes: &[],
    });
    assert_eq!(score, 4);
}

#[tokio::test]
async fn full_week_flows_through_sqlite() {
    init_logging();

    let db_path = std::env::temp_dir().join(format!("nocturne-test-{}.sqlite3", Uuid::new_v4()));
    let config = DetectorConfig::default();

    {
        let db = Database::new(db_path.clone()).unwrap();
        let store = SleepStore::load(Some(db), goals()).await;

        // Eight consecutive nights; each sleeps 00:10 -> 06:40
        for day in 2..=9 {
            let night = NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
            let samples = vec![
                ActivitySample::new(at(day, 0, 10), true, Confidence::High),
                ActivitySample::new(at(day, 6, 40), false, Confidence::High),
            ];
            let segments = detect_sleep_segments(&samples, &config);
            let summary = NightWindow::for_night(night).summarize(&segments);
            assert_eq!(summary.hours, 6.5);

            store
                .upsert_night(night, summary.bedtimes, summary.hours)
                .await;
            store.reconcile_steps(night, 10_000 + day as u64).await;
        }

        // The user disagrees with the latest rating
        store
            .set_quality(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(), 5)
            .await;
    }

    // A fresh process sees the trimmed, reconciled, overridden ledger
    let db = Database::new(db_path.clone()).unwrap();
    let store = SleepStore::load(Some(db), goals()).await;
    let week = store.week().await;

    assert_eq!(week.len(), 7);
    assert_eq!(week[0].date, NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
    assert_eq!(week[6].date, NaiveDate::from_ymd_opt(2026, 3, 9).unwrap());
    assert!(week.iter().all(|e| e.hours == 6.5));
    assert!(week.iter().all(|e| e.steps.is_some()));
    assert_eq!(week[6].quality, 5);
    // 6.5h vs 8h goal costs one; an after-midnight bedtime against the
    // 23:00 target costs another
    assert_eq!(week[0].quality, 3);

    let _ = std::fs::remove_file(&db_path);
    let _ = std::fs::remove_file(db_path.with_extension("sqlite3-wal"));
    let _ = std::fs::remove_file(db_path.with_extension("sqlite3-shm"));
}

#[tokio::test]
async fn corrupt_ledger_file_degrades_to_an_empty_week() {
    init_logging();

    let db_path = std::env::temp_dir().join(format!("nocturne-test-{}.sqlite3", Uuid::new_v4()));
    std::fs::write(&db_path, "definitely not a sqlite database").unwrap();

    let store = SleepStore::open(db_path.clone(), goals()).await;
    assert!(store.week().await.is_empty());

    // The store still accepts data in memory
    let night = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
    store.upsert_night(night, vec![at(10, 23, 0)], 8.0).await;
    assert_eq!(store.quality_for(night).await, 5);

    let _ = std::fs::remove_file(&db_path);
}
