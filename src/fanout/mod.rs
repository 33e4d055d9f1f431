//! Processed-article fan-out.
//!
//! The external AI pipeline classifies raw articles and posts the
//! results back. Each valid submission marks its raw article processed
//! and materializes one processed-article copy per assigned category:
//! the category list is a fan-out key, not a filter. All writes for one
//! call are grouped into bounded batches committed sequentially; a batch
//! failure aborts the rest of the call but earlier batches stay
//! committed (accepted partial application).

mod repository;

pub use repository::{ProcessedArticle, ProcessedArticleRepository};

use serde::Deserialize;
use tracing::warn;

use crate::db::Database;
use crate::Result;

/// Mutations per committed batch. Kept well below the store's
/// per-transaction limit because each copy carries an embedding payload.
pub const FANOUT_BATCH_SIZE: usize = 100;

/// Embedding vector length produced by the classification pipeline.
pub const EMBEDDING_DIM: usize = 384;

/// A classification submission from the AI pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessedSubmission {
    /// Raw-article id this classification belongs to.
    #[serde(default)]
    pub id: String,
    /// Article title.
    #[serde(default)]
    pub title: String,
    /// Article link.
    #[serde(default)]
    pub link: String,
    /// Source feed name.
    #[serde(default)]
    pub source: String,
    /// Original publish time as an ISO string.
    #[serde(default)]
    pub timestamp: String,
    /// Summary from the feed item.
    #[serde(default)]
    pub original_summary: String,
    /// Category and subcategory ids the article was assigned to.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Summary generated by the pipeline.
    #[serde(default)]
    pub generated_summary: String,
    /// Embedding of the generated summary (384 floats).
    #[serde(default)]
    pub summary_embedding: Vec<f32>,
}

impl ProcessedSubmission {
    /// A submission needs a target article id and at least one category.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty() && !self.categories.is_empty()
    }
}

/// Outcome of one fan-out call.
#[derive(Debug, Default, Clone, Copy)]
pub struct FanoutReport {
    /// Submissions applied.
    pub articles_processed: usize,
    /// Category-location copies written (≥ articles_processed).
    pub locations_saved: usize,
}

/// One storage mutation queued for a batch commit.
#[derive(Debug, Clone)]
pub(crate) enum Mutation {
    MarkProcessed {
        id: String,
    },
    SaveCopy {
        category_id: String,
        submission: ProcessedSubmission,
    },
}

/// Applies classification submissions to the store.
pub struct FanoutWriter {
    db: Database,
}

impl FanoutWriter {
    /// Create a new writer.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Apply a list of submissions.
    ///
    /// Invalid submissions (missing id or empty category list) are
    /// skipped with a warning. Returns counts of applied submissions and
    /// written category locations; a batch-commit failure propagates
    /// after earlier batches have already been committed.
    pub async fn apply(&self, submissions: Vec<ProcessedSubmission>) -> Result<FanoutReport> {
        let mut mutations: Vec<Mutation> = Vec::new();
        let mut report = FanoutReport::default();

        for submission in submissions {
            if !submission.is_valid() {
                warn!(
                    "Skipping invalid submission (id: {:?}, categories: {})",
                    submission.id,
                    submission.categories.len()
                );
                continue;
            }

            if !submission.summary_embedding.is_empty()
                && submission.summary_embedding.len() != EMBEDDING_DIM
            {
                warn!(
                    "Submission {} has a {}-dim embedding (expected {})",
                    submission.id,
                    submission.summary_embedding.len(),
                    EMBEDDING_DIM
                );
            }

            mutations.push(Mutation::MarkProcessed {
                id: submission.id.clone(),
            });

            for category_id in &submission.categories {
                mutations.push(Mutation::SaveCopy {
                    category_id: category_id.clone(),
                    submission: submission.clone(),
                });
                report.locations_saved += 1;
            }

            report.articles_processed += 1;
        }

        let repo = ProcessedArticleRepository::new(self.db.pool());
        for batch in mutations.chunks(FANOUT_BATCH_SIZE) {
            repo.commit_batch(batch).await?;
        }

        Ok(report)
    }
}
