//! Feed and raw-article types for newsdesk.

use chrono::{DateTime, Utc};

/// Days a raw article is kept before the retention sweeper removes it.
pub const RETENTION_DAYS: i64 = 30;

/// Maximum unprocessed articles returned to the AI pipeline per request.
pub const UNPROCESSED_PAGE_SIZE: i64 = 50;

/// Maximum deletions per sweep batch (the store's per-transaction limit).
pub const SWEEP_BATCH_SIZE: usize = 500;

/// Maximum feed document size in bytes (5MB).
pub const MAX_FEED_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum length kept for an item summary.
pub const MAX_SUMMARY_LENGTH: usize = 10000;

/// Placeholder title for items that carry none.
pub const DEFAULT_TITLE: &str = "No Title";

/// A configured feed source.
#[derive(Debug, Clone)]
pub struct FeedSource {
    /// Source id.
    pub id: String,
    /// Display name, stamped onto ingested articles.
    pub name: String,
    /// Feed URL.
    pub url: String,
    /// Whether the fetcher polls this source.
    pub enabled: bool,
    /// When the source was created.
    pub created_at: DateTime<Utc>,
}

/// New feed source for creation.
#[derive(Debug, Clone)]
pub struct NewFeedSource {
    /// Explicit id; generated when absent.
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Feed URL.
    pub url: String,
    /// Whether the source starts enabled.
    pub enabled: bool,
}

impl NewFeedSource {
    /// Create a new enabled feed source.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            url: url.into(),
            enabled: true,
        }
    }

    /// Set an explicit id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Create the source disabled.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Feed source update request. Unset fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct FeedSourceUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New feed URL.
    pub url: Option<String>,
    /// New enabled state.
    pub enabled: Option<bool>,
}

impl FeedSourceUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the feed URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the enabled state.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }
}

/// An ingested, not-yet-classified article.
#[derive(Debug, Clone)]
pub struct RawArticle {
    /// Content-derived id (hash of the link).
    pub id: String,
    /// Name of the source feed.
    pub source: String,
    /// Article title.
    pub title: String,
    /// Article link.
    pub link: String,
    /// Summary text from the feed item.
    pub summary: String,
    /// Publish time, or fetch time when the feed carried none.
    pub published_at: DateTime<Utc>,
    /// Set once the fan-out writer has stored classified copies.
    pub is_processed: bool,
}

/// Raw article candidate for ingestion.
#[derive(Debug, Clone)]
pub struct NewRawArticle {
    /// Content-derived id.
    pub id: String,
    /// Name of the source feed.
    pub source: String,
    /// Article title.
    pub title: String,
    /// Article link.
    pub link: String,
    /// Summary text.
    pub summary: String,
    /// Publish time.
    pub published_at: DateTime<Utc>,
}

/// A parsed feed document.
#[derive(Debug, Clone)]
pub struct ParsedFeed {
    /// Feed title.
    pub title: String,
    /// Candidate items.
    pub items: Vec<ParsedItem>,
}

/// A candidate item extracted from a feed.
///
/// Fields are optional here; ingestion applies the defaults.
#[derive(Debug, Clone, Default)]
pub struct ParsedItem {
    /// Item title.
    pub title: Option<String>,
    /// Item link.
    pub link: Option<String>,
    /// Item summary (HTML already stripped).
    pub summary: Option<String>,
    /// Publish time.
    pub published_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_feed_source_defaults() {
        let source = NewFeedSource::new("Tech Daily", "https://example.com/rss");
        assert!(source.id.is_none());
        assert!(source.enabled);
    }

    #[test]
    fn test_new_feed_source_builders() {
        let source = NewFeedSource::new("Tech Daily", "https://example.com/rss")
            .with_id("tech-daily")
            .disabled();
        assert_eq!(source.id.as_deref(), Some("tech-daily"));
        assert!(!source.enabled);
    }

    #[test]
    fn test_feed_source_update_builders() {
        let update = FeedSourceUpdate::new()
            .with_name("Renamed")
            .with_enabled(false);
        assert_eq!(update.name.as_deref(), Some("Renamed"));
        assert!(update.url.is_none());
        assert_eq!(update.enabled, Some(false));
    }
}
