//! Request DTOs for the newsdesk API.

use serde::Deserialize;

use crate::category::{CategoryUpdate, NewCategory};
use crate::fanout::ProcessedSubmission;
use crate::feed::{FeedSourceUpdate, NewFeedSource};

/// Body of POST /api/articles/processed.
///
/// The AI pipeline may post a single submission object or an array of
/// them; both shapes are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SubmitProcessedRequest {
    /// A single submission.
    One(Box<ProcessedSubmission>),
    /// A list of submissions.
    Many(Vec<ProcessedSubmission>),
}

impl SubmitProcessedRequest {
    /// Flatten into a submission list.
    pub fn into_vec(self) -> Vec<ProcessedSubmission> {
        match self {
            SubmitProcessedRequest::One(submission) => vec![*submission],
            SubmitProcessedRequest::Many(submissions) => submissions,
        }
    }
}

/// Query parameters for GET /api/articles/unprocessed.
#[derive(Debug, Default, Deserialize)]
pub struct UnprocessedQuery {
    /// Maximum articles to return; capped at the page-size limit.
    pub limit: Option<i64>,
}

/// Query parameters for GET /api/categories/:id/articles.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryArticlesQuery {
    /// Maximum articles to return.
    pub limit: Option<i64>,
}

/// Body for creating a feed source.
#[derive(Debug, Deserialize)]
pub struct CreateFeedRequest {
    /// Explicit id; generated when absent.
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Feed URL.
    pub url: String,
    /// Whether the source starts enabled. Defaults to true.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl From<CreateFeedRequest> for NewFeedSource {
    fn from(req: CreateFeedRequest) -> Self {
        NewFeedSource {
            id: req.id,
            name: req.name,
            url: req.url,
            enabled: req.enabled,
        }
    }
}

/// Body for updating a feed source. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFeedRequest {
    /// New display name.
    pub name: Option<String>,
    /// New feed URL.
    pub url: Option<String>,
    /// New enabled state.
    pub enabled: Option<bool>,
}

impl From<UpdateFeedRequest> for FeedSourceUpdate {
    fn from(req: UpdateFeedRequest) -> Self {
        FeedSourceUpdate {
            name: req.name,
            url: req.url,
            enabled: req.enabled,
        }
    }
}

/// Body for creating a category or subcategory.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Explicit id; generated when absent.
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// URL slug; derived from the name when absent.
    pub slug: Option<String>,
}

impl From<CreateCategoryRequest> for NewCategory {
    fn from(req: CreateCategoryRequest) -> Self {
        NewCategory {
            id: req.id,
            name: req.name,
            slug: req.slug,
        }
    }
}

/// Body for updating a category or subcategory.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    /// New display name.
    pub name: Option<String>,
    /// New slug.
    pub slug: Option<String>,
}

impl From<UpdateCategoryRequest> for CategoryUpdate {
    fn from(req: UpdateCategoryRequest) -> Self {
        CategoryUpdate {
            name: req.name,
            slug: req.slug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_processed_accepts_object_and_array() {
        let one: SubmitProcessedRequest =
            serde_json::from_str(r#"{"id":"a1","categories":["tech"]}"#).unwrap();
        assert_eq!(one.into_vec().len(), 1);

        let many: SubmitProcessedRequest =
            serde_json::from_str(r#"[{"id":"a1","categories":["tech"]},{"id":"a2","categories":["sci"]}]"#)
                .unwrap();
        assert_eq!(many.into_vec().len(), 2);
    }

    #[test]
    fn test_create_feed_defaults_enabled() {
        let req: CreateFeedRequest =
            serde_json::from_str(r#"{"name":"Tech Daily","url":"https://example.com/rss"}"#)
                .unwrap();
        assert!(req.enabled);
        assert!(req.id.is_none());
    }
}
