//! Response DTOs for the newsdesk API.

use serde::Serialize;

use crate::category::{Category, Subcategory};
use crate::fanout::{FanoutReport, ProcessedArticle};
use crate::feed::{FeedSource, RawArticle};

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Acknowledgement for POST /api/articles/processed.
#[derive(Debug, Serialize)]
pub struct ProcessedAckResponse {
    /// Always true when the call completes.
    pub success: bool,
    /// Submissions applied.
    #[serde(rename = "articlesProcessed")]
    pub articles_processed: usize,
    /// Category-location copies written.
    #[serde(rename = "totalLocationsSaved")]
    pub total_locations_saved: usize,
}

impl From<FanoutReport> for ProcessedAckResponse {
    fn from(report: FanoutReport) -> Self {
        Self {
            success: true,
            articles_processed: report.articles_processed,
            total_locations_saved: report.locations_saved,
        }
    }
}

/// A raw article handed to the AI pipeline.
#[derive(Debug, Serialize)]
pub struct RawArticleResponse {
    /// Article id.
    pub id: String,
    /// Source feed name.
    pub source: String,
    /// Article title.
    pub title: String,
    /// Article link.
    pub link: String,
    /// Summary from the feed item.
    pub summary: String,
    /// Full content. Feeds rarely carry it, so this is usually empty,
    /// but the pipeline contract requires the field to be present.
    pub content: String,
    /// Publish time as an ISO string.
    pub timestamp: String,
}

impl From<RawArticle> for RawArticleResponse {
    fn from(article: RawArticle) -> Self {
        Self {
            id: article.id,
            source: article.source,
            title: article.title,
            link: article.link,
            summary: article.summary,
            content: String::new(),
            timestamp: article.published_at.to_rfc3339(),
        }
    }
}

/// Page of unprocessed raw articles.
#[derive(Debug, Serialize)]
pub struct RawArticlesResponse {
    /// Articles, oldest first.
    pub articles: Vec<RawArticleResponse>,
    /// Number of articles in this page.
    pub count: usize,
}

/// A processed-article copy under a category.
#[derive(Debug, Serialize)]
pub struct ProcessedArticleResponse {
    /// Article id.
    pub id: String,
    /// Article title.
    pub title: String,
    /// Article link.
    pub link: String,
    /// Source feed name.
    pub source: String,
    /// Original publish time as an ISO string.
    pub timestamp: String,
    /// Summary from the feed item.
    pub original_summary: String,
    /// Every category the article was assigned to.
    pub categories: Vec<String>,
    /// Summary generated by the AI pipeline.
    pub generated_summary: String,
    /// Server-assigned processing time as an ISO string.
    pub processed_at: String,
}

impl From<ProcessedArticle> for ProcessedArticleResponse {
    fn from(article: ProcessedArticle) -> Self {
        Self {
            id: article.article_id,
            title: article.title,
            link: article.link,
            source: article.source,
            timestamp: article.timestamp.to_rfc3339(),
            original_summary: article.original_summary,
            categories: article.categories,
            generated_summary: article.generated_summary,
            processed_at: article.processed_at.to_rfc3339(),
        }
    }
}

/// A configured feed source.
#[derive(Debug, Serialize)]
pub struct FeedSourceResponse {
    /// Source id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Feed URL.
    pub url: String,
    /// Whether the fetcher polls this source.
    pub enabled: bool,
    /// When the source was created, as an ISO string.
    pub created_at: String,
}

impl From<FeedSource> for FeedSourceResponse {
    fn from(source: FeedSource) -> Self {
        Self {
            id: source.id,
            name: source.name,
            url: source.url,
            enabled: source.enabled,
            created_at: source.created_at.to_rfc3339(),
        }
    }
}

/// A category.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    /// Category id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
        }
    }
}

/// A subcategory.
#[derive(Debug, Serialize)]
pub struct SubcategoryResponse {
    /// Subcategory id.
    pub id: String,
    /// Owning category id.
    pub category_id: String,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

impl From<Subcategory> for SubcategoryResponse {
    fn from(subcategory: Subcategory) -> Self {
        Self {
            id: subcategory.id,
            category_id: subcategory.category_id,
            name: subcategory.name,
            slug: subcategory.slug,
        }
    }
}
