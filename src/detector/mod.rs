pub mod algorithm;
pub mod config;
pub mod window;

pub use algorithm::detect_sleep_segments;
pub use config::DetectorConfig;
pub use window::{NightSummary, NightWindow};
