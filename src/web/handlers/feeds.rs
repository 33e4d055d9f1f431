//! Feed source handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::feed::repository::FeedSourceRepository;
use crate::feed::validate_url;
use crate::web::dto::{ApiResponse, CreateFeedRequest, FeedSourceResponse, UpdateFeedRequest};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/feeds - List all feed sources.
pub async fn list_feeds(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<FeedSourceResponse>>>, ApiError> {
    let sources = FeedSourceRepository::new(state.db.pool()).list().await?;
    let responses = sources.into_iter().map(FeedSourceResponse::from).collect();
    Ok(Json(ApiResponse::new(responses)))
}

/// GET /api/feeds/:id - Get a feed source.
pub async fn get_feed(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<FeedSourceResponse>>, ApiError> {
    let source = FeedSourceRepository::new(state.db.pool())
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Feed not found"))?;
    Ok(Json(ApiResponse::new(FeedSourceResponse::from(source))))
}

/// POST /api/feeds - Create a feed source.
pub async fn create_feed(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateFeedRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FeedSourceResponse>>), ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::unprocessable("Feed name must not be empty"));
    }
    validate_url(&request.url).map_err(|e| ApiError::unprocessable(e.to_string()))?;

    let repo = FeedSourceRepository::new(state.db.pool());
    if let Some(id) = &request.id {
        if repo.get_by_id(id).await?.is_some() {
            return Err(ApiError::conflict("Feed id already exists"));
        }
    }

    let created = repo.create(&request.into()).await?;
    tracing::info!(feed = %created.id, "Created feed source");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(FeedSourceResponse::from(created))),
    ))
}

/// PUT /api/feeds/:id - Update a feed source.
pub async fn update_feed(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateFeedRequest>,
) -> Result<Json<ApiResponse<FeedSourceResponse>>, ApiError> {
    if let Some(url) = &request.url {
        validate_url(url).map_err(|e| ApiError::unprocessable(e.to_string()))?;
    }

    let updated = FeedSourceRepository::new(state.db.pool())
        .update(&id, &request.into())
        .await?;
    Ok(Json(ApiResponse::new(FeedSourceResponse::from(updated))))
}

/// DELETE /api/feeds/:id - Delete a feed source.
pub async fn delete_feed(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = FeedSourceRepository::new(state.db.pool()).delete(&id).await?;
    if !deleted {
        return Err(ApiError::not_found("Feed not found"));
    }
    tracing::info!(feed = %id, "Deleted feed source");
    Ok(StatusCode::NO_CONTENT)
}
