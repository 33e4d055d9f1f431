//! newsdesk - News aggregation backend
//!
//! Scheduled RSS ingestion into a content-addressed raw-article store,
//! an HTTP boundary for an external AI classification pipeline,
//! category fan-out of classified articles and a cached category tree.

pub mod category;
pub mod config;
pub mod db;
pub mod error;
pub mod fanout;
pub mod feed;
pub mod ident;
pub mod logging;
pub mod web;

pub use category::{CategoryService, CategoryTree};
pub use config::Config;
pub use db::Database;
pub use error::{NewsdeskError, Result};
pub use fanout::{FanoutReport, FanoutWriter, ProcessedSubmission};
pub use feed::{FeedFetcher, IngestRunner, JobScheduler, RetentionSweeper};
pub use ident::derive_article_id;
pub use web::WebServer;
