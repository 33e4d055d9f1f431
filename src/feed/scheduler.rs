//! Background jobs: the hourly ingestion pass and the daily sweep.
//!
//! Each job is an interval loop in its own task. Every tick is a
//! self-contained pass with no shared state between ticks; a slow pass
//! overlapping the next tick is not guarded against, which is safe for
//! ingestion (idempotent creates) and for the sweep (re-deleting rows
//! that are already gone is a no-op).

use tokio::time::{interval, Duration};
use tracing::{error, info};

use crate::config::IngestConfig;
use crate::db::Database;
use crate::feed::ingest::IngestRunner;
use crate::feed::sweeper::RetentionSweeper;
use crate::Result;

/// Spawns and owns the scheduled ingestion and sweep loops.
pub struct JobScheduler {
    db: Database,
    config: IngestConfig,
}

impl JobScheduler {
    /// Create a scheduler for the given database and settings.
    pub fn new(db: Database, config: IngestConfig) -> Self {
        Self { db, config }
    }

    /// Spawn both job loops. The first tick of each fires immediately.
    pub fn start(self) -> Result<()> {
        let runner = IngestRunner::new(self.db.clone())?;
        let fetch_every = Duration::from_secs(self.config.fetch_interval_secs);

        info!(
            "Scheduling ingestion every {}s, sweep every {}s (retention {} days)",
            self.config.fetch_interval_secs,
            self.config.sweep_interval_secs,
            self.config.retention_days
        );

        tokio::spawn(async move {
            let mut timer = interval(fetch_every);
            loop {
                timer.tick().await;
                if let Err(e) = runner.run_once().await {
                    error!("Ingestion pass failed: {}", e);
                }
            }
        });

        let sweeper = RetentionSweeper::with_retention_days(self.db, self.config.retention_days);
        let sweep_every = Duration::from_secs(self.config.sweep_interval_secs);

        tokio::spawn(async move {
            let mut timer = interval(sweep_every);
            loop {
                timer.tick().await;
                match sweeper.sweep().await {
                    Ok(deleted) if deleted > 0 => {
                        info!("Retention sweep deleted {} article(s)", deleted)
                    }
                    Ok(_) => {}
                    Err(e) => error!("Retention sweep failed: {}", e),
                }
            }
        });

        Ok(())
    }
}
