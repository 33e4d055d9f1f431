//! Article handlers: the AI pipeline boundary.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::fanout::FanoutWriter;
use crate::feed::repository::RawArticleRepository;
use crate::feed::types::{RETENTION_DAYS, UNPROCESSED_PAGE_SIZE};
use crate::web::dto::{
    ProcessedAckResponse, RawArticleResponse, RawArticlesResponse, SubmitProcessedRequest,
    UnprocessedQuery,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/articles/unprocessed - Oldest unprocessed raw articles.
///
/// Only articles inside the retention window are handed out; anything
/// older is the sweeper's business, not the pipeline's.
pub async fn list_unprocessed(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UnprocessedQuery>,
) -> Result<Json<RawArticlesResponse>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(UNPROCESSED_PAGE_SIZE)
        .clamp(1, UNPROCESSED_PAGE_SIZE);
    let not_older_than = Utc::now() - Duration::days(RETENTION_DAYS);

    let articles = RawArticleRepository::new(state.db.pool())
        .list_unprocessed(limit, not_older_than)
        .await?;

    let articles: Vec<RawArticleResponse> =
        articles.into_iter().map(RawArticleResponse::from).collect();
    let count = articles.len();

    Ok(Json(RawArticlesResponse { articles, count }))
}

/// POST /api/articles/processed - Fan out classification results.
pub async fn submit_processed(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitProcessedRequest>,
) -> Result<Json<ProcessedAckResponse>, ApiError> {
    let submissions = request.into_vec();
    if submissions.is_empty() {
        return Err(ApiError::bad_request("No articles provided"));
    }

    let report = FanoutWriter::new(state.db.clone())
        .apply(submissions)
        .await?;

    tracing::info!(
        articles = report.articles_processed,
        locations = report.locations_saved,
        "Applied processed-article submissions"
    );

    Ok(Json(ProcessedAckResponse::from(report)))
}
