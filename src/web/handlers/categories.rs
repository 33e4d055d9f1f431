//! Category handlers, including the cached category tree.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::category::{CategoryService, CategoryTree};
use crate::fanout::ProcessedArticleRepository;
use crate::feed::types::UNPROCESSED_PAGE_SIZE;
use crate::web::dto::{
    ApiResponse, CategoryArticlesQuery, CategoryResponse, CreateCategoryRequest,
    ProcessedArticleResponse, SubcategoryResponse, UpdateCategoryRequest,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/categories/tree - The cached category tree.
pub async fn get_tree(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CategoryTree>, ApiError> {
    let tree = CategoryService::new(state.db.clone()).tree().await?;
    Ok(Json(tree))
}

/// GET /api/categories - List all categories.
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CategoryResponse>>>, ApiError> {
    let categories = CategoryService::new(state.db.clone())
        .list_categories()
        .await?;
    let responses = categories.into_iter().map(CategoryResponse::from).collect();
    Ok(Json(ApiResponse::new(responses)))
}

/// GET /api/categories/:id - Get a category.
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CategoryResponse>>, ApiError> {
    let category = CategoryService::new(state.db.clone())
        .get_category(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;
    Ok(Json(ApiResponse::new(CategoryResponse::from(category))))
}

/// POST /api/categories - Create a category.
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponse>>), ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::unprocessable("Category name must not be empty"));
    }

    let service = CategoryService::new(state.db.clone());
    if let Some(id) = &request.id {
        if service.get_category(id).await?.is_some() {
            return Err(ApiError::conflict("Category id already exists"));
        }
    }

    let created = service.create_category(&request.into()).await?;
    tracing::info!(category = %created.id, "Created category");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(CategoryResponse::from(created))),
    ))
}

/// PUT /api/categories/:id - Update a category.
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<ApiResponse<CategoryResponse>>, ApiError> {
    let updated = CategoryService::new(state.db.clone())
        .update_category(&id, &request.into())
        .await?;
    Ok(Json(ApiResponse::new(CategoryResponse::from(updated))))
}

/// DELETE /api/categories/:id - Delete a category and its subcategories.
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = CategoryService::new(state.db.clone())
        .delete_category(&id)
        .await?;
    if !deleted {
        return Err(ApiError::not_found("Category not found"));
    }
    tracing::info!(category = %id, "Deleted category");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/categories/:id/articles - Processed articles under a category.
pub async fn list_category_articles(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<CategoryArticlesQuery>,
) -> Result<Json<ApiResponse<Vec<ProcessedArticleResponse>>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(UNPROCESSED_PAGE_SIZE)
        .clamp(1, UNPROCESSED_PAGE_SIZE);

    let articles = ProcessedArticleRepository::new(state.db.pool())
        .list_for_category(&id, limit)
        .await?;
    let responses = articles
        .into_iter()
        .map(ProcessedArticleResponse::from)
        .collect();
    Ok(Json(ApiResponse::new(responses)))
}

/// GET /api/categories/:id/subcategories - List a category's subcategories.
pub async fn list_subcategories(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<SubcategoryResponse>>>, ApiError> {
    let service = CategoryService::new(state.db.clone());
    service
        .get_category(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;

    let subcategories = service.list_subcategories(&id).await?;
    let responses = subcategories
        .into_iter()
        .map(SubcategoryResponse::from)
        .collect();
    Ok(Json(ApiResponse::new(responses)))
}

/// POST /api/categories/:id/subcategories - Create a subcategory.
pub async fn create_subcategory(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SubcategoryResponse>>), ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::unprocessable(
            "Subcategory name must not be empty",
        ));
    }

    let created = CategoryService::new(state.db.clone())
        .create_subcategory(&id, &request.into())
        .await?;
    tracing::info!(category = %id, subcategory = %created.id, "Created subcategory");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(SubcategoryResponse::from(created))),
    ))
}

/// PUT /api/categories/:id/subcategories/:sub_id - Update a subcategory.
pub async fn update_subcategory(
    State(state): State<Arc<AppState>>,
    Path((id, sub_id)): Path<(String, String)>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<ApiResponse<SubcategoryResponse>>, ApiError> {
    let updated = CategoryService::new(state.db.clone())
        .update_subcategory(&id, &sub_id, &request.into())
        .await?;
    Ok(Json(ApiResponse::new(SubcategoryResponse::from(updated))))
}

/// DELETE /api/categories/:id/subcategories/:sub_id - Delete a subcategory.
pub async fn delete_subcategory(
    State(state): State<Arc<AppState>>,
    Path((id, sub_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let deleted = CategoryService::new(state.db.clone())
        .delete_subcategory(&id, &sub_id)
        .await?;
    if !deleted {
        return Err(ApiError::not_found("Subcategory not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
