use serde::Deserialize;

use crate::api::response::ApiResponse;
use crate::carousel::builder::merge_hashtags;
use crate::db::category_repository::{effective_profile, CategoryRepository};
use crate::error::AppError;
use crate::models::category::CategoryProfile;
use crate::models::content::ContentKind;

/// Partial update of a category profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProfileUpdate {
    pub display_name: Option<String>,
    pub hashtags: Option<Vec<String>>,
    pub handle: Option<String>,
    pub closing_text: Option<String>,
}

fn category_kind(kind: &str) -> Result<ContentKind, AppError> {
    ContentKind::from_str_ci(kind)
        .ok_or_else(|| AppError::NotFound(format!("Unknown category '{}'", kind)))
}

/// The effective profile of every kind, stored or default.
pub async fn process_list_categories(
    repo: &dyn CategoryRepository,
) -> Result<Vec<CategoryProfile>, AppError> {
    let stored = repo.list().await?;
    Ok(ContentKind::ALL
        .into_iter()
        .map(|kind| {
            stored
                .iter()
                .find(|p| p.kind == kind)
                .cloned()
                .unwrap_or_else(|| CategoryProfile::default_for(kind))
        })
        .collect())
}

pub async fn process_upsert_category(
    repo: &dyn CategoryRepository,
    mut profile: CategoryProfile,
) -> Result<CategoryProfile, AppError> {
    if profile.display_name.trim().is_empty() {
        return Err(AppError::BadRequest("displayName cannot be empty".into()));
    }
    profile.hashtags = merge_hashtags(&profile.hashtags, &[]);
    repo.upsert(profile.clone()).await?;
    tracing::info!(kind = %profile.kind, "Stored category profile");
    Ok(profile)
}

pub async fn process_update_category(
    repo: &dyn CategoryRepository,
    kind: ContentKind,
    update: CategoryProfileUpdate,
) -> Result<CategoryProfile, AppError> {
    let mut profile = effective_profile(repo, kind).await?;
    if let Some(display_name) = update.display_name {
        profile.display_name = display_name;
    }
    if let Some(hashtags) = update.hashtags {
        profile.hashtags = hashtags;
    }
    if let Some(handle) = update.handle {
        profile.handle = handle;
    }
    if let Some(closing_text) = update.closing_text {
        profile.closing_text = closing_text;
    }
    process_upsert_category(repo, profile).await
}

/// Drop the stored profile; the default applies again.
pub async fn process_reset_category(
    repo: &dyn CategoryRepository,
    kind: ContentKind,
) -> Result<CategoryProfile, AppError> {
    repo.delete(kind).await?;
    Ok(CategoryProfile::default_for(kind))
}

/// Axum handler for `GET /api/categories`.
pub async fn list_categories_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
) -> Result<axum::Json<ApiResponse<Vec<CategoryProfile>>>, AppError> {
    let profiles = process_list_categories(state.category_repo.as_ref()).await?;
    Ok(axum::Json(ApiResponse::ok(profiles)))
}

/// Axum handler for `POST /api/categories`.
pub async fn upsert_category_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::Json(profile): axum::Json<CategoryProfile>,
) -> Result<axum::Json<ApiResponse<CategoryProfile>>, AppError> {
    let profile = process_upsert_category(state.category_repo.as_ref(), profile).await?;
    Ok(axum::Json(ApiResponse::ok(profile)))
}

/// Axum handler for `GET /api/categories/{kind}`.
pub async fn get_category_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path(kind): axum::extract::Path<String>,
) -> Result<axum::Json<ApiResponse<CategoryProfile>>, AppError> {
    let kind = category_kind(&kind)?;
    let profile = effective_profile(state.category_repo.as_ref(), kind).await?;
    Ok(axum::Json(ApiResponse::ok(profile)))
}

/// Axum handler for `PUT /api/categories/{kind}`.
pub async fn update_category_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path(kind): axum::extract::Path<String>,
    axum::Json(update): axum::Json<CategoryProfileUpdate>,
) -> Result<axum::Json<ApiResponse<CategoryProfile>>, AppError> {
    let kind = category_kind(&kind)?;
    let profile = process_update_category(state.category_repo.as_ref(), kind, update).await?;
    Ok(axum::Json(ApiResponse::ok(profile)))
}

/// Axum handler for `DELETE /api/categories/{kind}`.
pub async fn reset_category_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path(kind): axum::extract::Path<String>,
) -> Result<axum::Json<ApiResponse<CategoryProfile>>, AppError> {
    let kind = category_kind(&kind)?;
    let profile = process_reset_category(state.category_repo.as_ref(), kind).await?;
    Ok(axum::Json(ApiResponse::ok(profile)))
}
