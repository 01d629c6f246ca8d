use crate::api::response::ApiResponse;
use crate::carousel::builder::carousel_for;
use crate::carousel::payload::parse_generate_payload;
use crate::db::category_repository::{effective_profile, CategoryRepository};
use crate::db::content_repository::ContentRepository;
use crate::error::AppError;
use crate::models::content::{ContentItem, ContentKind};

/// Core creation logic shared by the generate endpoints and
/// `POST /api/{resource}`.
///
/// Validates the payload, lays out the carousel with the branding of
/// `kind` and stores the new item. `json_only` refuses form submissions.
pub async fn process_generate(
    repo: &dyn ContentRepository,
    categories: &dyn CategoryRepository,
    kind: ContentKind,
    raw: &str,
    json_only: bool,
) -> Result<ContentItem, AppError> {
    // 1. Validate before touching storage
    let payload = parse_generate_payload(kind, raw)?;
    if json_only && !payload.is_json_mode() {
        return Err(AppError::BadRequest(
            "Missing required field(s): carouselData".into(),
        ));
    }

    // 2. Build the carousel
    let profile = effective_profile(categories, kind).await?;
    let carousel = carousel_for(&payload, &profile);

    // 3. Store
    let item = ContentItem::new(payload.title, payload.description, payload.details, carousel);
    repo.insert(item.clone()).await?;

    tracing::info!(
        %kind,
        id = %item.id,
        slides = item.carousel_data.slides.len(),
        "Created content item"
    );

    Ok(item)
}

async fn generate(
    state: crate::app::AppState,
    kind: ContentKind,
    body: String,
) -> Result<(axum::http::StatusCode, axum::Json<ApiResponse<ContentItem>>), AppError> {
    let item = process_generate(
        state.content_repo.as_ref(),
        state.category_repo.as_ref(),
        kind,
        &body,
        false,
    )
    .await?;
    Ok((axum::http::StatusCode::CREATED, axum::Json(ApiResponse::ok(item))))
}

/// Axum handler for `POST /api/generate-riddle`.
pub async fn generate_riddle_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    body: String,
) -> Result<(axum::http::StatusCode, axum::Json<ApiResponse<ContentItem>>), AppError> {
    generate(state, ContentKind::Riddle, body).await
}

/// Axum handler for `POST /api/generate-site`.
pub async fn generate_site_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    body: String,
) -> Result<(axum::http::StatusCode, axum::Json<ApiResponse<ContentItem>>), AppError> {
    generate(state, ContentKind::Site, body).await
}

/// Axum handler for `POST /api/generate-topic`.
pub async fn generate_topic_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    body: String,
) -> Result<(axum::http::StatusCode, axum::Json<ApiResponse<ContentItem>>), AppError> {
    generate(state, ContentKind::Topic, body).await
}

/// Axum handler for `POST /api/generate-tutorial`.
pub async fn generate_tutorial_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    body: String,
) -> Result<(axum::http::StatusCode, axum::Json<ApiResponse<ContentItem>>), AppError> {
    generate(state, ContentKind::Tutorial, body).await
}
