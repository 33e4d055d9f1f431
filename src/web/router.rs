//! Router configuration for the newsdesk API.

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_category, create_feed, create_subcategory, delete_category, delete_feed,
    delete_subcategory, get_category, get_feed, get_tree, list_categories,
    list_category_articles, list_feeds, list_subcategories, list_unprocessed, submit_processed,
    update_category, update_feed, update_subcategory, AppState,
};
use super::middleware::create_cors_layer;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let article_routes = Router::new()
        .route("/unprocessed", get(list_unprocessed))
        .route("/processed", post(submit_processed));

    let feed_routes = Router::new()
        .route("/", get(list_feeds).post(create_feed))
        .route("/:id", get(get_feed).put(update_feed).delete(delete_feed));

    let category_routes = Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/tree", get(get_tree))
        .route(
            "/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/:id/articles", get(list_category_articles))
        .route(
            "/:id/subcategories",
            get(list_subcategories).post(create_subcategory),
        )
        .route(
            "/:id/subcategories/:sub_id",
            put(update_subcategory).delete(delete_subcategory),
        );

    let api_routes = Router::new()
        .nest("/articles", article_routes)
        .nest("/feeds", feed_routes)
        .nest("/categories", category_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
