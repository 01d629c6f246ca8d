use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::conversion::generator::TextGenerator;
use crate::db::category_repository::CategoryRepository;
use crate::db::content_repository::ContentRepository;
use crate::rendering::renderer::SlideRenderer;
use crate::storage::client::StorageClient;

/// Screenshot data URLs of 1080×1920 slides exceed axum's default limit.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Shared application state available to all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub content_repo: Arc<dyn ContentRepository>,
    pub category_repo: Arc<dyn CategoryRepository>,
    /// Render storage; `None` disables screenshot uploads.
    pub storage_client: Option<Arc<dyn StorageClient>>,
    pub generator: Arc<dyn TextGenerator>,
    pub renderer: Arc<SlideRenderer>,
    pub public_base_url: Option<String>,
}

async fn health_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

/// Every route of the service. Paths not matched fall through to
/// `static_dir` when given.
pub fn build_router(state: AppState, static_dir: Option<&str>) -> Router {
    let router = Router::new()
        .route("/health", get(health_handler))
        // Generate
        .route(
            "/api/generate-riddle",
            post(api::generate::generate_riddle_handler),
        )
        .route("/api/generate-site", post(api::generate::generate_site_handler))
        .route(
            "/api/generate-topic",
            post(api::generate::generate_topic_handler),
        )
        .route(
            "/api/generate-tutorial",
            post(api::generate::generate_tutorial_handler),
        )
        // Categories
        .route(
            "/api/categories",
            get(api::categories::list_categories_handler)
                .post(api::categories::upsert_category_handler),
        )
        .route(
            "/api/categories/{kind}",
            get(api::categories::get_category_handler)
                .put(api::categories::update_category_handler)
                .delete(api::categories::reset_category_handler),
        )
        // Renders
        .route(
            "/api/renders/{*key}",
            get(api::renders::serve_render_handler),
        )
        // Content
        .route(
            "/api/{resource}",
            get(api::content::list_handler).post(api::content::create_handler),
        )
        .route(
            "/api/{resource}/{id}",
            get(api::content::get_handler)
                .put(api::content::update_handler)
                .delete(api::content::delete_handler),
        )
        // Video slides
        .route(
            "/api/{resource}/{id}/video-slides",
            get(api::video_slides::get_video_slides_handler)
                .post(api::video_slides::generate_video_slides_handler),
        )
        .route(
            "/api/{resource}/{id}/video-slides/{index}",
            patch(api::video_slides::update_saved_urls_handler),
        )
        .route(
            "/api/{resource}/{id}/video-slides/{index}/render",
            post(api::renders::upload_render_handler),
        )
        // Pages to screenshot
        .route(
            "/render/{resource}/{id}/carousel",
            get(api::render_pages::carousel_deck_handler),
        )
        .route(
            "/render/{resource}/{id}/carousel/{index}",
            get(api::render_pages::carousel_slide_handler),
        )
        .route(
            "/render/{resource}/{id}/video",
            get(api::render_pages::video_deck_handler),
        )
        .route(
            "/render/{resource}/{id}/video/{index}",
            get(api::render_pages::video_slide_handler),
        );

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
