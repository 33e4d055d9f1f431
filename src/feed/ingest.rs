//! Scheduled feed ingestion pass.
//!
//! One pass fetches every enabled source concurrently, and within one
//! source attempts every item create concurrently. There is no ordering
//! guarantee between sources or items. A source whose retrieval or parse
//! fails is skipped with a warning and never blocks its siblings.

use chrono::Utc;
use futures::future::join_all;
use tracing::{error, info, warn};

use crate::db::Database;
use crate::feed::fetcher::FeedFetcher;
use crate::feed::repository::{FeedSourceRepository, RawArticleRepository};
use crate::feed::types::{FeedSource, NewRawArticle, ParsedItem, DEFAULT_TITLE};
use crate::ident::derive_article_id;
use crate::Result;

/// Outcome of one ingestion pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct IngestReport {
    /// Sources fetched and parsed successfully.
    pub feeds_fetched: usize,
    /// Sources skipped because retrieval or parse failed.
    pub feeds_failed: usize,
    /// Items seen across all fetched sources.
    pub items_seen: usize,
    /// New articles added to the raw store.
    pub articles_added: usize,
}

/// Per-feed outcome, folded into the report.
struct FeedOutcome {
    failed: bool,
    items: usize,
    added: usize,
}

/// Runs ingestion passes over the configured feed sources.
pub struct IngestRunner {
    db: Database,
    fetcher: FeedFetcher,
}

impl IngestRunner {
    /// Create a new runner.
    pub fn new(db: Database) -> Result<Self> {
        Ok(Self {
            db,
            fetcher: FeedFetcher::new()?,
        })
    }

    /// Run one self-contained ingestion pass over all enabled sources.
    pub async fn run_once(&self) -> Result<IngestReport> {
        let sources = FeedSourceRepository::new(self.db.pool()).list_enabled().await?;

        if sources.is_empty() {
            info!("No enabled feed sources to fetch");
            return Ok(IngestReport::default());
        }

        let outcomes = join_all(sources.iter().map(|source| self.ingest_source(source))).await;

        let mut report = IngestReport::default();
        for outcome in outcomes {
            if outcome.failed {
                report.feeds_failed += 1;
            } else {
                report.feeds_fetched += 1;
            }
            report.items_seen += outcome.items;
            report.articles_added += outcome.added;
        }

        info!(
            "Ingestion pass complete: {} source(s) fetched, {} failed, {} new article(s)",
            report.feeds_fetched, report.feeds_failed, report.articles_added
        );
        Ok(report)
    }

    /// Fetch one source and ingest its items.
    async fn ingest_source(&self, source: &FeedSource) -> FeedOutcome {
        match self.fetcher.fetch(&source.url).await {
            Ok(parsed) => {
                let items = parsed.items.len();
                let added = self.ingest_items(&source.name, parsed.items).await;
                info!(
                    "Fetched {} item(s) from {}, added {} new article(s)",
                    items, source.name, added
                );
                FeedOutcome {
                    failed: false,
                    items,
                    added,
                }
            }
            Err(e) => {
                warn!("Skipping feed {} ({}): {}", source.name, source.url, e);
                FeedOutcome {
                    failed: true,
                    items: 0,
                    added: 0,
                }
            }
        }
    }

    /// Attempt idempotent creates for every item with a non-empty link.
    ///
    /// Items with no link are dropped before id derivation. Missing
    /// titles get a placeholder, missing publish dates get the fetch
    /// time, missing summaries become empty. Returns the number of
    /// articles actually added.
    pub async fn ingest_items(&self, source_name: &str, items: Vec<ParsedItem>) -> usize {
        let now = Utc::now();

        let candidates: Vec<NewRawArticle> = items
            .into_iter()
            .filter_map(|item| {
                let link = item.link.filter(|l| !l.is_empty())?;
                Some(NewRawArticle {
                    id: derive_article_id(&link),
                    source: source_name.to_string(),
                    title: item.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                    link,
                    summary: item.summary.unwrap_or_default(),
                    published_at: item.published_at.unwrap_or(now),
                })
            })
            .collect();

        let results = join_all(candidates.iter().map(|article| async move {
            let repo = RawArticleRepository::new(self.db.pool());
            match repo.create_if_absent(article).await {
                Ok(true) => 1,
                // Already ingested in an earlier cycle or by a sibling feed
                Ok(false) => 0,
                Err(e) => {
                    error!("Failed to store article {}: {}", article.link, e);
                    0
                }
            }
        }))
        .await;

        results.into_iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::repository::RawArticleRepository;
    use chrono::{Duration, TimeZone};

    fn item(link: &str) -> ParsedItem {
        ParsedItem {
            title: Some("Story".to_string()),
            link: Some(link.to_string()),
            summary: Some("text".to_string()),
            published_at: Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_ingest_items_adds_new_articles() {
        let db = Database::connect_in_memory().await.unwrap();
        let runner = IngestRunner::new(db.clone()).unwrap();

        let added = runner
            .ingest_items(
                "Tech Daily",
                vec![item("https://example.com/1"), item("https://example.com/2")],
            )
            .await;
        assert_eq!(added, 2);

        let repo = RawArticleRepository::new(db.pool());
        assert_eq!(repo.count().await.unwrap(), 2);
        let stored = repo
            .get_by_id(&derive_article_id("https://example.com/1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.source, "Tech Daily");
        assert!(!stored.is_processed);
    }

    #[tokio::test]
    async fn test_reingest_is_idempotent() {
        let db = Database::connect_in_memory().await.unwrap();
        let runner = IngestRunner::new(db.clone()).unwrap();

        let items = vec![item("https://example.com/1"), item("https://example.com/2")];
        assert_eq!(runner.ingest_items("Tech Daily", items.clone()).await, 2);
        // Re-ingesting the same feed adds nothing
        assert_eq!(runner.ingest_items("Tech Daily", items).await, 0);

        let repo = RawArticleRepository::new(db.pool());
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_same_link_across_feeds_dedupes() {
        let db = Database::connect_in_memory().await.unwrap();
        let runner = IngestRunner::new(db.clone()).unwrap();

        assert_eq!(
            runner
                .ingest_items("Feed A", vec![item("https://example.com/shared")])
                .await,
            1
        );
        assert_eq!(
            runner
                .ingest_items("Feed B", vec![item("https://example.com/shared")])
                .await,
            0
        );
    }

    #[tokio::test]
    async fn test_empty_link_dropped() {
        let db = Database::connect_in_memory().await.unwrap();
        let runner = IngestRunner::new(db.clone()).unwrap();

        let mut no_link = item("unused");
        no_link.link = None;
        let mut empty_link = item("unused");
        empty_link.link = Some(String::new());

        let added = runner
            .ingest_items("Tech Daily", vec![no_link, empty_link])
            .await;
        assert_eq!(added, 0);
        assert_eq!(
            RawArticleRepository::new(db.pool()).count().await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_missing_fields_defaulted() {
        let db = Database::connect_in_memory().await.unwrap();
        let runner = IngestRunner::new(db.clone()).unwrap();
        let before = Utc::now() - Duration::seconds(1);

        let bare = ParsedItem {
            title: None,
            link: Some("https://example.com/bare".to_string()),
            summary: None,
            published_at: None,
        };
        assert_eq!(runner.ingest_items("Tech Daily", vec![bare]).await, 1);

        let stored = RawArticleRepository::new(db.pool())
            .get_by_id(&derive_article_id("https://example.com/bare"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.title, DEFAULT_TITLE);
        assert_eq!(stored.summary, "");
        // Publish date defaulted to fetch time
        assert!(stored.published_at >= before - Duration::seconds(1));
    }

    #[tokio::test]
    async fn test_run_once_no_sources() {
        let db = Database::connect_in_memory().await.unwrap();
        let runner = IngestRunner::new(db).unwrap();
        let report = runner.run_once().await.unwrap();
        assert_eq!(report.feeds_fetched, 0);
        assert_eq!(report.articles_added, 0);
    }
}
