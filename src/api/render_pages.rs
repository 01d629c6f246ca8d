use axum::response::Html;

use crate::api::content::{process_get, resource_kind};
use crate::db::category_repository::effective_profile;
use crate::error::AppError;

/// Which slides of the item a page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderRequest {
    CarouselDeck,
    CarouselSlide(usize),
    VideoDeck,
    VideoSlide(usize),
}

/// Render the HTML page for `request`.
pub async fn process_render_page(
    state: &crate::app::AppState,
    resource: &str,
    id: &str,
    request: RenderRequest,
) -> Result<String, AppError> {
    let kind = resource_kind(resource)?;
    let item = process_get(state.content_repo.as_ref(), kind, id).await?;
    let profile = effective_profile(state.category_repo.as_ref(), kind).await?;
    let renderer = &state.renderer;

    match request {
        RenderRequest::CarouselDeck => renderer.render_carousel_deck(&item, &profile),
        RenderRequest::CarouselSlide(index) => {
            renderer.render_carousel_slide(&item, &profile, index)
        }
        RenderRequest::VideoDeck => renderer.render_video_deck(&item, &profile),
        RenderRequest::VideoSlide(index) => renderer.render_video_slide(&item, &profile, index),
    }
}

/// Axum handler for `GET /render/{resource}/{id}/carousel`.
pub async fn carousel_deck_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path((resource, id)): axum::extract::Path<(String, String)>,
) -> Result<Html<String>, AppError> {
    process_render_page(&state, &resource, &id, RenderRequest::CarouselDeck)
        .await
        .map(Html)
}

/// Axum handler for `GET /render/{resource}/{id}/carousel/{index}`.
pub async fn carousel_slide_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path((resource, id, index)): axum::extract::Path<(String, String, usize)>,
) -> Result<Html<String>, AppError> {
    process_render_page(&state, &resource, &id, RenderRequest::CarouselSlide(index))
        .await
        .map(Html)
}

/// Axum handler for `GET /render/{resource}/{id}/video`.
pub async fn video_deck_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path((resource, id)): axum::extract::Path<(String, String)>,
) -> Result<Html<String>, AppError> {
    process_render_page(&state, &resource, &id, RenderRequest::VideoDeck)
        .await
        .map(Html)
}

/// Axum handler for `GET /render/{resource}/{id}/video/{index}`.
pub async fn video_slide_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path((resource, id, index)): axum::extract::Path<(String, String, usize)>,
) -> Result<Html<String>, AppError> {
    process_render_page(&state, &resource, &id, RenderRequest::VideoSlide(index))
        .await
        .map(Html)
}
