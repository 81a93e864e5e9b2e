// SQLite download history. downloads keeps one row per plugin per UTC day
// (same-day appends replace in place); plugins carries last_fetched so the
// refresh throttle survives restarts.

use crate::config::DatabaseConfig;
use crate::models::Sample;
use chrono::{DateTime, Duration, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage query: {0}")]
    Db(#[from] sqlx::Error),
}

pub struct DownloadsRepo {
    pool: SqlitePool,
}

impl DownloadsRepo {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StorageError> {
        if let Some(parent) = Path::new(&config.path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", config.path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_pool_size)
            .connect_with(opts)
            .await?;
        Ok(Self { pool })
    }

    pub async fn init(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS plugins (
                id TEXT PRIMARY KEY,
                created_at INTEGER NOT NULL,
                last_fetched INTEGER
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS downloads (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                plugin_id TEXT NOT NULL,
                day TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                count INTEGER NOT NULL,
                UNIQUE (plugin_id, day),
                FOREIGN KEY (plugin_id) REFERENCES plugins (id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_downloads_plugin_timestamp ON downloads(plugin_id, timestamp)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Records one observation and stamps plugins.last_fetched in the same
    /// transaction. The day key is the UTC calendar date of `timestamp`; an
    /// existing row for that day gets its count and timestamp replaced.
    /// Returns the sample as stored (timestamp truncated to milliseconds).
    #[instrument(skip(self), fields(repo = "downloads", operation = "append"))]
    pub async fn append(
        &self,
        plugin_id: &str,
        timestamp: DateTime<Utc>,
        count: u64,
    ) -> Result<Sample, StorageError> {
        let ts_ms = timestamp.timestamp_millis();
        let day = timestamp.format("%Y-%m-%d").to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO plugins (id, created_at, last_fetched) VALUES ($1, $2, $3)
             ON CONFLICT (id) DO UPDATE SET last_fetched = excluded.last_fetched",
        )
        .bind(plugin_id)
        .bind(ts_ms)
        .bind(ts_ms)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO downloads (plugin_id, day, timestamp, count) VALUES ($1, $2, $3, $4)
             ON CONFLICT (plugin_id, day) DO UPDATE SET timestamp = excluded.timestamp, count = excluded.count",
        )
        .bind(plugin_id)
        .bind(&day)
        .bind(ts_ms)
        .bind(count as i64)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Sample {
            plugin_id: plugin_id.to_string(),
            timestamp: datetime_from_ms(ts_ms),
            count,
        })
    }

    /// Most recent sample for a plugin, or None if nothing is stored.
    pub async fn latest(&self, plugin_id: &str) -> Result<Option<Sample>, StorageError> {
        let row = sqlx::query(
            "SELECT timestamp, count FROM downloads WHERE plugin_id = $1 ORDER BY timestamp DESC LIMIT 1",
        )
        .bind(plugin_id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(parse_sample_row(plugin_id, &row)?))
    }

    /// Samples with timestamp >= now - since_days, ascending by timestamp.
    /// Unknown plugins and empty windows return an empty vec, not an error.
    #[instrument(skip(self), fields(repo = "downloads", operation = "history"))]
    pub async fn history(
        &self,
        plugin_id: &str,
        since_days: u32,
    ) -> Result<Vec<Sample>, StorageError> {
        let cutoff_ms = (Utc::now() - Duration::days(since_days as i64)).timestamp_millis();
        let rows = sqlx::query(
            "SELECT timestamp, count FROM downloads
             WHERE plugin_id = $1 AND timestamp >= $2
             ORDER BY timestamp ASC",
        )
        .bind(plugin_id)
        .bind(cutoff_ms)
        .fetch_all(&self.pool)
        .await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(parse_sample_row(plugin_id, &row)?);
        }
        Ok(out)
    }

    /// When the plugin was last fetched from the catalogue, if ever.
    pub async fn last_fetched(
        &self,
        plugin_id: &str,
    ) -> Result<Option<DateTime<Utc>>, StorageError> {
        let row = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT last_fetched FROM plugins WHERE id = $1",
        )
        .bind(plugin_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.flatten().map(datetime_from_ms))
    }
}

fn parse_sample_row(plugin_id: &str, row: &sqlx::sqlite::SqliteRow) -> Result<Sample, StorageError> {
    let ts_ms: i64 = row.try_get("timestamp")?;
    let count: i64 = row.try_get("count")?;
    Ok(Sample {
        plugin_id: plugin_id.to_string(),
        timestamp: datetime_from_ms(ts_ms),
        count: count.max(0) as u64,
    })
}

/// Millisecond epoch to DateTime; out-of-range values collapse to the epoch.
fn datetime_from_ms(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}
