use anyhow::{Context, Result};
use rusqlite::params;

use crate::db::{
    helpers::{encode_bedtimes, parse_bedtimes, parse_date, quality_from_i64, to_i64, to_u64},
    Database,
};
use crate::models::SleepEntry;

impl Database {
    /// Load the whole ledger, ordered by date ascending.
    pub async fn load_entries(&self) -> Result<Vec<SleepEntry>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, date, bedtimes, hours, quality, predicted, steps
                 FROM sleep_entries
                 ORDER BY date ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut entries = Vec::new();
            while let Some(row) = rows.next()? {
                entries.push(SleepEntry {
                    id: row.get(0)?,
                    date: parse_date(&row.get::<_, String>(1)?, "date")?,
                    bedtimes: parse_bedtimes(&row.get::<_, String>(2)?)?,
                    hours: row.get(3)?,
                    quality: quality_from_i64(row.get(4)?),
                    predicted: row
                        .get::<_, Option<i64>>(5)?
                        .map(quality_from_i64),
                    steps: row
                        .get::<_, Option<i64>>(6)?
                        .map(|raw| to_u64(raw, "steps"))
                        .transpose()?,
                });
            }

            Ok(entries)
        })
        .await
    }

    /// Rewrite the table from the in-memory ledger. The on-disk copy is
    /// always a direct serialization of the week, never a partial merge.
    pub async fn replace_entries(&self, entries: Vec<SleepEntry>) -> Result<()> {
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            tx.execute("DELETE FROM sleep_entries", [])
                .context("failed to clear sleep entries")?;

            for entry in &entries {
                tx.execute(
                    "INSERT INTO sleep_entries (id, date, bedtimes, hours, quality, predicted, steps)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        entry.id,
                        entry.date.format("%Y-%m-%d").to_string(),
                        encode_bedtimes(&entry.bedtimes)?,
                        entry.hours,
                        entry.quality as i64,
                        entry.predicted.map(|p| p as i64),
                        entry.steps.map(to_i64).transpose()?,
                    ],
                )
                .with_context(|| format!("failed to insert sleep entry for {}", entry.date))?;
            }

            tx.commit().context("failed to commit ledger write")?;
            Ok(())
        })
        .await
    }
}
