//! Feed source and raw-article repositories.

use chrono::{DateTime, Utc};
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::db::{format_datetime, parse_datetime, DbPool};
use crate::error::{NewsdeskError, Result};
use crate::feed::types::{FeedSource, FeedSourceUpdate, NewFeedSource, NewRawArticle, RawArticle};

/// Row type for a feed source.
#[derive(Debug, Clone, sqlx::FromRow)]
struct FeedSourceRow {
    id: String,
    name: String,
    url: String,
    enabled: bool,
    created_at: String,
}

impl From<FeedSourceRow> for FeedSource {
    fn from(row: FeedSourceRow) -> Self {
        FeedSource {
            id: row.id,
            name: row.name,
            url: row.url,
            enabled: row.enabled,
            created_at: parse_datetime(&row.created_at).unwrap_or_else(Utc::now),
        }
    }
}

/// Row type for a raw article.
#[derive(Debug, Clone, sqlx::FromRow)]
struct RawArticleRow {
    id: String,
    source: String,
    title: String,
    link: String,
    summary: String,
    published_at: String,
    is_processed: bool,
}

impl From<RawArticleRow> for RawArticle {
    fn from(row: RawArticleRow) -> Self {
        RawArticle {
            id: row.id,
            source: row.source,
            title: row.title,
            link: row.link,
            summary: row.summary,
            published_at: parse_datetime(&row.published_at).unwrap_or_else(Utc::now),
            is_processed: row.is_processed,
        }
    }
}

/// Repository for feed source CRUD.
pub struct FeedSourceRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FeedSourceRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new feed source. An id is generated when none is supplied.
    pub async fn create(&self, source: &NewFeedSource) -> Result<FeedSource> {
        let id = source
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        sqlx::query("INSERT INTO feeds (id, name, url, enabled) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(&source.name)
            .bind(&source.url)
            .bind(source.enabled)
            .execute(self.pool)
            .await
            .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| NewsdeskError::NotFound("feed".to_string()))
    }

    /// Get a feed source by id.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<FeedSource>> {
        let row = sqlx::query_as::<_, FeedSourceRow>(
            "SELECT id, name, url, enabled, created_at FROM feeds WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(row.map(FeedSource::from))
    }

    /// List all feed sources, ordered by name.
    pub async fn list(&self) -> Result<Vec<FeedSource>> {
        let rows = sqlx::query_as::<_, FeedSourceRow>(
            "SELECT id, name, url, enabled, created_at FROM feeds ORDER BY name",
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(FeedSource::from).collect())
    }

    /// List enabled feed sources, ordered by name.
    pub async fn list_enabled(&self) -> Result<Vec<FeedSource>> {
        let rows = sqlx::query_as::<_, FeedSourceRow>(
            "SELECT id, name, url, enabled, created_at FROM feeds WHERE enabled = 1 ORDER BY name",
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(FeedSource::from).collect())
    }

    /// Update a feed source. Unset fields keep their current value.
    pub async fn update(&self, id: &str, update: &FeedSourceUpdate) -> Result<FeedSource> {
        let existing = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| NewsdeskError::NotFound("feed".to_string()))?;

        let name = update.name.clone().unwrap_or(existing.name);
        let url = update.url.clone().unwrap_or(existing.url);
        let enabled = update.enabled.unwrap_or(existing.enabled);

        sqlx::query("UPDATE feeds SET name = ?, url = ?, enabled = ? WHERE id = ?")
            .bind(&name)
            .bind(&url)
            .bind(enabled)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| NewsdeskError::NotFound("feed".to_string()))
    }

    /// Delete a feed source. Does not cascade to already-ingested articles.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM feeds WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Repository for the raw-article store.
pub struct RawArticleRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> RawArticleRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Idempotent create: insert the article unless its id already exists.
    ///
    /// Returns `true` when the article was inserted and `false` when a
    /// record with the same id was already present. The duplicate case
    /// is the expected "already ingested" outcome, not an error.
    pub async fn create_if_absent(&self, article: &NewRawArticle) -> Result<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO raw_articles
                 (id, source, title, link, summary, published_at, is_processed)
             VALUES (?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(&article.id)
        .bind(&article.source)
        .bind(&article.title)
        .bind(&article.link)
        .bind(&article.summary)
        .bind(format_datetime(article.published_at))
        .execute(self.pool)
        .await
        .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Get a raw article by id.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<RawArticle>> {
        let row = sqlx::query_as::<_, RawArticleRow>(
            "SELECT id, source, title, link, summary, published_at, is_processed
             FROM raw_articles WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(row.map(RawArticle::from))
    }

    /// List oldest-first unprocessed articles no older than the cutoff.
    pub async fn list_unprocessed(
        &self,
        limit: i64,
        not_older_than: DateTime<Utc>,
    ) -> Result<Vec<RawArticle>> {
        let rows = sqlx::query_as::<_, RawArticleRow>(
            "SELECT id, source, title, link, summary, published_at, is_processed
             FROM raw_articles
             WHERE is_processed = 0 AND published_at >= ?
             ORDER BY published_at ASC
             LIMIT ?",
        )
        .bind(format_datetime(not_older_than))
        .bind(limit)
        .fetch_all(self.pool)
        .await
        .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(RawArticle::from).collect())
    }

    /// Mark an article as processed.
    ///
    /// Returns `false` when no article with the given id exists.
    pub async fn mark_processed(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE raw_articles SET is_processed = 1 WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// List ids of articles published before the cutoff, regardless of
    /// processed state.
    pub async fn list_ids_older_than(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>> {
        let ids: Vec<String> =
            sqlx::query_scalar("SELECT id FROM raw_articles WHERE published_at < ?")
                .bind(format_datetime(cutoff))
                .fetch_all(self.pool)
                .await
                .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(ids)
    }

    /// Delete a batch of articles by id in one statement.
    ///
    /// Returns the number of rows deleted. Callers bound the batch size.
    pub async fn delete_batch(&self, ids: &[String]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut qb: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new("DELETE FROM raw_articles WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let result = qb
            .build()
            .execute(self.pool)
            .await
            .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// Total number of raw articles.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM raw_articles")
            .fetch_one(self.pool)
            .await
            .map_err(|e| NewsdeskError::Database(e.to_string()))?;
        Ok(count)
    }
}
