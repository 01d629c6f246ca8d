use serde::Deserialize;

use crate::api::content::resource_kind;
use crate::api::response::ApiResponse;
use crate::conversion::service::{
    process_generate_video_slides, process_get_video_slides, process_update_saved_urls,
    VideoSlidesPayload,
};
use crate::error::AppError;
use crate::models::slides::{SavedUrls, VideoSlide};

#[derive(Debug, Default, Deserialize)]
pub struct GenerateQuery {
    /// `?force`, `?force=true` and `?force=1` all regenerate.
    #[serde(default)]
    pub force: Option<String>,
}

impl GenerateQuery {
    pub fn is_forced(&self) -> bool {
        match self.force.as_deref().map(str::trim) {
            None => false,
            Some(value) => !matches!(value.to_lowercase().as_str(), "false" | "0" | "no"),
        }
    }
}

/// Axum handler for `GET /api/{resource}/{id}/video-slides`.
pub async fn get_video_slides_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path((resource, id)): axum::extract::Path<(String, String)>,
) -> Result<axum::Json<ApiResponse<VideoSlidesPayload>>, AppError> {
    let kind = resource_kind(&resource)?;
    let payload = process_get_video_slides(state.content_repo.as_ref(), kind, &id).await?;
    Ok(axum::Json(ApiResponse::ok(payload)))
}

/// Axum handler for `POST /api/{resource}/{id}/video-slides?force`.
pub async fn generate_video_slides_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path((resource, id)): axum::extract::Path<(String, String)>,
    axum::extract::Query(query): axum::extract::Query<GenerateQuery>,
) -> Result<axum::Json<ApiResponse<VideoSlidesPayload>>, AppError> {
    let kind = resource_kind(&resource)?;
    let payload = process_generate_video_slides(
        state.content_repo.as_ref(),
        state.generator.as_ref(),
        kind,
        &id,
        query.is_forced(),
    )
    .await?;
    Ok(axum::Json(ApiResponse::ok(payload)))
}

/// Axum handler for `PATCH /api/{resource}/{id}/video-slides/{index}`.
pub async fn update_saved_urls_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path((resource, id, index)): axum::extract::Path<(String, String, usize)>,
    axum::Json(urls): axum::Json<SavedUrls>,
) -> Result<axum::Json<ApiResponse<VideoSlide>>, AppError> {
    let kind = resource_kind(&resource)?;
    let slide =
        process_update_saved_urls(state.content_repo.as_ref(), kind, &id, index, urls).await?;
    Ok(axum::Json(ApiResponse::ok(slide)))
}
