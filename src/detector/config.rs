/// Configuration for sleep segment detection with tunable thresholds.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Minimum consolidated block duration; shorter blocks are discarded.
    pub min_duration_secs: u64,

    /// Adjacent stationary blocks whose gap is at most this get merged.
    pub merge_gap_secs: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_duration_secs: 5 * 3600,
            merge_gap_secs: 15 * 60,
        }
    }
}
