//! Storage for processed-article copies.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::db::{format_datetime, parse_datetime, DbPool};
use crate::error::{NewsdeskError, Result};
use crate::fanout::{Mutation, ProcessedSubmission};

/// A stored processed-article copy.
#[derive(Debug, Clone)]
pub struct ProcessedArticle {
    /// Category this copy is filed under.
    pub category_id: String,
    /// Article id (same id as the source raw article).
    pub article_id: String,
    /// Article title.
    pub title: String,
    /// Article link.
    pub link: String,
    /// Source feed name.
    pub source: String,
    /// Original publish time.
    pub timestamp: DateTime<Utc>,
    /// Summary from the feed item.
    pub original_summary: String,
    /// Every category the article was assigned to.
    pub categories: Vec<String>,
    /// Summary generated by the AI pipeline.
    pub generated_summary: String,
    /// Embedding of the generated summary.
    pub summary_embedding: Vec<f32>,
    /// Server-assigned processing time.
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct ProcessedArticleRow {
    category_id: String,
    article_id: String,
    title: String,
    link: String,
    source: String,
    timestamp: String,
    original_summary: String,
    categories: String,
    generated_summary: String,
    summary_embedding: String,
    processed_at: String,
}

impl From<ProcessedArticleRow> for ProcessedArticle {
    fn from(row: ProcessedArticleRow) -> Self {
        ProcessedArticle {
            category_id: row.category_id,
            article_id: row.article_id,
            title: row.title,
            link: row.link,
            source: row.source,
            timestamp: parse_datetime(&row.timestamp).unwrap_or_else(Utc::now),
            original_summary: row.original_summary,
            categories: serde_json::from_str(&row.categories).unwrap_or_default(),
            generated_summary: row.generated_summary,
            summary_embedding: serde_json::from_str(&row.summary_embedding).unwrap_or_default(),
            processed_at: parse_datetime(&row.processed_at).unwrap_or_else(Utc::now),
        }
    }
}

const SELECT_COLUMNS: &str = "category_id, article_id, title, link, source, timestamp, \
     original_summary, categories, generated_summary, summary_embedding, processed_at";

/// Repository for processed-article copies.
pub struct ProcessedArticleRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ProcessedArticleRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Commit one batch of fan-out mutations in a single transaction.
    ///
    /// A missing raw article behind a mark-processed mutation is logged
    /// and skipped; the category copies of that submission still land.
    pub(crate) async fn commit_batch(&self, mutations: &[Mutation]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        let processed_at = format_datetime(Utc::now());

        for mutation in mutations {
            match mutation {
                Mutation::MarkProcessed { id } => {
                    let result =
                        sqlx::query("UPDATE raw_articles SET is_processed = 1 WHERE id = ?")
                            .bind(id)
                            .execute(&mut *tx)
                            .await
                            .map_err(|e| NewsdeskError::Database(e.to_string()))?;

                    if result.rows_affected() == 0 {
                        warn!("No raw article {} to mark processed", id);
                    }
                }
                Mutation::SaveCopy {
                    category_id,
                    submission,
                } => {
                    let timestamp = parse_submission_timestamp(&submission.timestamp);
                    let categories = serde_json::to_string(&submission.categories)
                        .map_err(|e| NewsdeskError::Validation(e.to_string()))?;
                    let embedding = serde_json::to_string(&submission.summary_embedding)
                        .map_err(|e| NewsdeskError::Validation(e.to_string()))?;

                    sqlx::query(
                        "INSERT OR REPLACE INTO processed_articles
                             (category_id, article_id, title, link, source, timestamp,
                              original_summary, categories, generated_summary,
                              summary_embedding, processed_at)
                         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    )
                    .bind(category_id)
                    .bind(&submission.id)
                    .bind(&submission.title)
                    .bind(&submission.link)
                    .bind(&submission.source)
                    .bind(format_datetime(timestamp))
                    .bind(&submission.original_summary)
                    .bind(&categories)
                    .bind(&submission.generated_summary)
                    .bind(&embedding)
                    .bind(&processed_at)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| NewsdeskError::Database(e.to_string()))?;
                }
            }
        }

        tx.commit()
            .await
            .map_err(|e| NewsdeskError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get one stored copy by (category, article).
    pub async fn get(
        &self,
        category_id: &str,
        article_id: &str,
    ) -> Result<Option<ProcessedArticle>> {
        let row = sqlx::query_as::<_, ProcessedArticleRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM processed_articles
             WHERE category_id = ? AND article_id = ?"
        ))
        .bind(category_id)
        .bind(article_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(row.map(ProcessedArticle::from))
    }

    /// List copies under a category, newest first.
    pub async fn list_for_category(
        &self,
        category_id: &str,
        limit: i64,
    ) -> Result<Vec<ProcessedArticle>> {
        let rows = sqlx::query_as::<_, ProcessedArticleRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM processed_articles
             WHERE category_id = ?
             ORDER BY timestamp DESC
             LIMIT ?"
        ))
        .bind(category_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await
        .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(ProcessedArticle::from).collect())
    }

    /// Total copies stored under a category.
    pub async fn count_for_category(&self, category_id: &str) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM processed_articles WHERE category_id = ?")
                .bind(category_id)
                .fetch_one(self.pool)
                .await
                .map_err(|e| NewsdeskError::Database(e.to_string()))?;
        Ok(count)
    }
}

/// Parse the pipeline's ISO timestamp, falling back to the current time.
fn parse_submission_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
