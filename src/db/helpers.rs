use std::convert::TryFrom;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

pub fn to_i64(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {value} exceeds SQLite INTEGER range"))
}

pub fn to_u64(value: i64, field: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| anyhow!("{field} contains negative value {value}"))
}

pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("failed to parse {field} '{value}'"))
}

/// Bedtime lists are stored as one JSON array column of RFC 3339 strings.
pub fn parse_bedtimes(value: &str) -> Result<Vec<DateTime<Utc>>> {
    serde_json::from_str(value).context("failed to parse bedtimes column")
}

pub fn encode_bedtimes(bedtimes: &[DateTime<Utc>]) -> Result<String> {
    serde_json::to_string(bedtimes).context("failed to encode bedtimes column")
}

/// Star ratings are 1-5 by construction; clamp anything a foreign writer
/// might have left behind.
pub fn quality_from_i64(value: i64) -> u8 {
    value.clamp(1, 5) as u8
}
