//! Feed ingestion pipeline for newsdesk.
//!
//! Feed sources, HTTP fetching/parsing, idempotent ingestion into the
//! raw-article store, retention sweeping and the job scheduler.

pub mod fetcher;
pub mod ingest;
pub mod repository;
pub mod scheduler;
pub mod sweeper;
pub mod types;

pub use fetcher::{validate_url, FeedFetcher};
pub use ingest::{IngestReport, IngestRunner};
pub use repository::{FeedSourceRepository, RawArticleRepository};
pub use scheduler::JobScheduler;
pub use sweeper::RetentionSweeper;
pub use types::{
    FeedSource, FeedSourceUpdate, NewFeedSource, NewRawArticle, ParsedFeed, ParsedItem, RawArticle,
    DEFAULT_TITLE, MAX_FEED_SIZE, MAX_SUMMARY_LENGTH, RETENTION_DAYS, SWEEP_BATCH_SIZE,
    UNPROCESSED_PAGE_SIZE,
};
