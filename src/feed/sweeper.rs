//! Retention sweeper for the raw-article store.
//!
//! Deletes raw articles older than the retention window, processed or
//! not, in bounded batches. A failed batch ends the run; the next
//! scheduled run re-discovers any remaining old articles because the
//! query is re-evaluated fresh each time.

use chrono::{Duration, Utc};
use tracing::{debug, error, info};

use crate::db::Database;
use crate::feed::repository::RawArticleRepository;
use crate::feed::types::{RETENTION_DAYS, SWEEP_BATCH_SIZE};
use crate::Result;

/// Sweeps old raw articles on a schedule.
pub struct RetentionSweeper {
    db: Database,
    retention_days: i64,
}

impl RetentionSweeper {
    /// Create a sweeper with the default retention window.
    pub fn new(db: Database) -> Self {
        Self {
            db,
            retention_days: RETENTION_DAYS,
        }
    }

    /// Create a sweeper with a custom retention window.
    pub fn with_retention_days(db: Database, retention_days: i64) -> Self {
        Self { db, retention_days }
    }

    /// Delete every raw article older than the retention window.
    ///
    /// Returns the total number of articles deleted.
    pub async fn sweep(&self) -> Result<u64> {
        let cutoff = Utc::now() - Duration::days(self.retention_days);
        info!("Sweeping raw articles older than {}", cutoff);

        let repo = RawArticleRepository::new(self.db.pool());
        let ids = repo.list_ids_older_than(cutoff).await?;

        if ids.is_empty() {
            info!("No old articles to delete");
            return Ok(0);
        }

        let mut total_deleted = 0u64;
        for chunk in ids.chunks(SWEEP_BATCH_SIZE) {
            match repo.delete_batch(chunk).await {
                Ok(deleted) => {
                    total_deleted += deleted;
                    debug!("Deleted batch of {} article(s)", deleted);
                }
                Err(e) => {
                    // No rollback of prior batches; the next run retries
                    error!(
                        "Sweep batch failed after {} deletion(s): {}",
                        total_deleted, e
                    );
                    return Ok(total_deleted);
                }
            }
        }

        info!("Sweep complete, {} article(s) deleted", total_deleted);
        Ok(total_deleted)
    }
}
