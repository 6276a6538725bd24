use chrono::{DateTime, Utc};

use crate::detector::config::DetectorConfig;
use crate::models::{ActivitySample, Confidence, SleepInterval};

/// Main detection function: consolidates noisy stationary/active samples
/// into nightly sleep blocks.
///
/// A "stationary run" opens at the first sample that is stationary with
/// non-low confidence and closes at the start time of the first sample that
/// breaks that condition (or at the last sample's start time if still open
/// at end of input). Runs whose gap is at most `merge_gap_secs` are merged,
/// then anything shorter than `min_duration_secs` is dropped. Brief movement
/// bursts during sleep disappear in the merge; daytime stillness falls to
/// the duration floor.
pub fn detect_sleep_segments(
    samples: &[ActivitySample],
    config: &DetectorConfig,
) -> Vec<SleepInterval> {
    // Edge case: empty input
    if samples.is_empty() {
        return Vec::new();
    }

    // Input order is not guaranteed by the motion source
    let mut samples = samples.to_vec();
    samples.sort_by_key(|s| s.start_time);

    // Step 1: raw stationary runs
    let mut blocks: Vec<SleepInterval> = Vec::new();
    let mut current_start: Option<DateTime<Utc>> = None;

    for sample in &samples {
        if sample.stationary && sample.confidence != Confidence::Low {
            if current_start.is_none() {
                current_start = Some(sample.start_time);
            }
        } else if let Some(start) = current_start.take() {
            blocks.push(SleepInterval {
                start,
                end: sample.start_time,
            });
        }
    }
    // A run still open at end of input closes at the last sample's start time
    if let Some(start) = current_start {
        blocks.push(SleepInterval {
            start,
            end: samples.last().unwrap().start_time,
        });
    }

    // Malformed input can produce zero-length runs; never surface them
    blocks.retain(|b| b.end > b.start);

    if blocks.is_empty() {
        return Vec::new();
    }

    // Step 2: merge blocks separated by at most merge_gap_secs
    blocks.sort_by_key(|b| b.start);
    let mut merged = Vec::new();
    let mut start = blocks[0].start;
    let mut end = blocks[0].end;

    for block in &blocks[1..] {
        if (block.start - end).num_seconds() <= config.merge_gap_secs as i64 {
            end = block.end;
        } else {
            merged.push(SleepInterval { start, end });
            start = block.start;
            end = block.end;
        }
    }
    merged.push(SleepInterval { start, end });

    // Step 3: drop merged blocks below the duration floor
    merged
        .into_iter()
        .filter(|b| b.duration().num_seconds() >= config.min_duration_secs as i64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, hour, min, 0).unwrap()
    }

    fn sample(time: DateTime<Utc>, stationary: bool, confidence: Confidence) -> ActivitySample {
        ActivitySample::new(time, stationary, confidence)
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let config = DetectorConfig::default();
        assert!(detect_sleep_segments(&[], &config).is_empty());
    }

    #[test]
    fn single_overnight_run_is_detected() {
        // Stationary 22:00 -> 06:00 next day, closed by a walking sample
        let start = at(22, 0);
        let end = start + chrono::Duration::hours(8);
        let samples = vec![
            sample(start - chrono::Duration::minutes(30), false, Confidence::High),
            sample(start, true, Confidence::High),
            sample(start + chrono::Duration::hours(4), true, Confidence::Medium),
            sample(end, false, Confidence::High),
        ];

        let segments = detect_sleep_segments(&samples, &DetectorConfig::default());
        assert_eq!(segments, vec![SleepInterval { start, end }]);
    }

    #[test]
    fn run_open_at_end_of_input_closes_at_last_sample() {
        let start = at(23, 0);
        let last = start + chrono::Duration::hours(6);
        let samples = vec![
            sample(start, true, Confidence::High),
            sample(last, true, Confidence::High),
        ];

        let segments = detect_sleep_segments(&samples, &DetectorConfig::default());
        assert_eq!(segments, vec![SleepInterval { start, end: last }]);
    }

    #[test]
    fn low_confidence_stationary_breaks_a_run() {
        let start = at(22, 0);
        let break_at = start + chrono::Duration::hours(2);
        let resume = break_at + chrono::Duration::hours(1);
        let end = resume + chrono::Duration::hours(6);
        let samples = vec![
            sample(start, true, Confidence::High),
            sample(break_at, true, Confidence::Low),
            sample(resume, true, Confidence::High),
            sample(end, false, Confidence::High),
        ];

        // Gap of 1h exceeds the merge window, first run is only 2h
        let segments = detect_sleep_segments(&samples, &DetectorConfig::default());
        assert_eq!(segments, vec![SleepInterval { start: resume, end }]);
    }

    #[test]
    fn detection_is_stable_under_input_reordering() {
        let start = at(22, 0);
        let end = start + chrono::Duration::hours(8);
        let sorted = vec![
            sample(start, true, Confidence::High),
            sample(start + chrono::Duration::hours(3), true, Confidence::High),
            sample(end, false, Confidence::High),
        ];
        let mut shuffled = sorted.clone();
        shuffled.swap(0, 2);
        shuffled.swap(1, 2);

        let config = DetectorConfig::default();
        assert_eq!(
            detect_sleep_segments(&sorted, &config),
            detect_sleep_segments(&shuffled, &config)
        );
    }

    #[test]
    fn gap_of_exactly_merge_gap_is_merged() {
        let config = DetectorConfig::default();
        let start = at(22, 0);
        let first_end = start + chrono::Duration::hours(3);
        let second_start = first_end + chrono::Duration::seconds(config.merge_gap_secs as i64);
        let second_end = second_start + chrono::Duration::hours(4);
        let samples = vec![
            sample(start, true, Confidence::High),
            sample(first_end, false, Confidence::High),
            sample(second_start, true, Confidence::High),
            sample(second_end, false, Confidence::High),
        ];

        let segments = detect_sleep_segments(&samples, &config);
        assert_eq!(
            segments,
            vec![SleepInterval {
                start,
                end: second_end
            }]
        );
    }

    #[test]
    fn gap_just_over_merge_gap_is_not_merged() {
        let config = DetectorConfig::default();
        let start = at(20, 0);
        let first_end = start + chrono::Duration::hours(6);
        let second_start =
            first_end + chrono::Duration::seconds(config.merge_gap_secs as i64 + 1);
        let second_end = second_start + chrono::Duration::hours(6);
        let samples = vec![
            sample(start, true, Confidence::High),
            sample(first_end, false, Confidence::High),
            sample(second_start, true, Confidence::High),
            sample(second_end, false, Confidence::High),
        ];

        let segments = detect_sleep_segments(&samples, &config);
        assert_eq!(
            segments,
            vec![
                SleepInterval {
                    start,
                    end: first_end
                },
                SleepInterval {
                    start: second_start,
                    end: second_end
                },
            ]
        );
    }

    #[test]
    fn block_of_exactly_min_duration_is_kept() {
        let config = DetectorConfig::default();
        let start = at(23, 0);
        let end = start + chrono::Duration::seconds(config.min_duration_secs as i64);
        let samples = vec![
            sample(start, true, Confidence::High),
            sample(end, false, Confidence::High),
        ];

        let segments = detect_sleep_segments(&samples, &config);
        assert_eq!(segments, vec![SleepInterval { start, end }]);
    }

    #[test]
    fn block_just_under_min_duration_is_dropped() {
        let config = DetectorConfig::default();
        let start = at(23, 0);
        let end = start + chrono::Duration::seconds(config.min_duration_secs as i64 - 1);
        let samples = vec![
            sample(start, true, Confidence::High),
            sample(end, false, Confidence::High),
        ];

        assert!(detect_sleep_segments(&samples, &config).is_empty());
    }

    #[test]
    fn two_short_fragmented_runs_fall_below_the_floor() {
        // 00:30-03:00 and 03:20-06:00: the 20-min gap exceeds the 15-min
        // merge window, so neither fragment reaches 5h on its own
        let samples = vec![
            sample(at(0, 30), true, Confidence::High),
            sample(at(3, 0), false, Confidence::High),
            sample(at(3, 20), true, Confidence::High),
            sample(at(6, 0), false, Confidence::High),
        ];

        assert!(detect_sleep_segments(&samples, &DetectorConfig::default()).is_empty());
    }

    #[test]
    fn only_active_samples_yield_nothing() {
        let samples = vec![
            sample(at(9, 0), false, Confidence::High),
            sample(at(10, 0), false, Confidence::Medium),
        ];
        assert!(detect_sleep_segments(&samples, &DetectorConfig::default()).is_empty());
    }
}
