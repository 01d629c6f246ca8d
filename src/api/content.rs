use chrono::Utc;
use serde_json::Value;

use crate::api::response::{ApiResponse, PaginatedResponse};
use crate::carousel::payload::parse_carousel_data;
use crate::db::content_repository::ContentRepository;
use crate::error::AppError;
use crate::models::content::{ContentItem, ContentKind};
use crate::models::pagination::{page_after_delete, PageRequest, PaginationMeta};
use crate::models::slides::VideoSlide;

/// Keys a PUT may not change.
const IMMUTABLE_KEYS: &[&str] = &["_id", "kind", "createdAt"];
/// Keys maintained by the server; ignored in a PUT.
const MANAGED_KEYS: &[&str] = &["updatedAt", "videoSlidesRevision", "videoSlidesUpdatedAt"];

/// Resolve the `{resource}` path segment.
pub fn resource_kind(resource: &str) -> Result<ContentKind, AppError> {
    ContentKind::from_resource(resource)
        .ok_or_else(|| AppError::NotFound(format!("Unknown resource '{}'", resource)))
}

pub async fn process_list(
    repo: &dyn ContentRepository,
    kind: ContentKind,
    page: &PageRequest,
) -> Result<PaginatedResponse<ContentItem>, AppError> {
    let (items, total) = repo.list(kind, page).await?;
    Ok(PaginatedResponse::new(
        items,
        PaginationMeta::new(page.page(), page.limit(), total),
    ))
}

pub async fn process_get(
    repo: &dyn ContentRepository,
    kind: ContentKind,
    id: &str,
) -> Result<ContentItem, AppError> {
    repo.find_by_id(kind, id)
        .await?
        .ok_or_else(|| AppError::content_not_found(kind, id))
}

/// Merge the top-level keys of `patch` into a stored item.
///
/// `videoSlides` replaces the whole sequence and bumps the revision; an
/// empty sequence or `null` removes it.
pub async fn process_update(
    repo: &dyn ContentRepository,
    kind: ContentKind,
    id: &str,
    patch: Value,
) -> Result<ContentItem, AppError> {
    let Value::Object(mut patch) = patch else {
        return Err(AppError::BadRequest("Payload must be a JSON object".into()));
    };

    let current = process_get(repo, kind, id).await?;

    for key in IMMUTABLE_KEYS {
        if let Some(value) = patch.remove(*key) {
            let unchanged = match *key {
                "_id" => value.as_str() == Some(current.id.as_str()),
                "kind" => value.as_str().and_then(ContentKind::from_str_ci) == Some(kind),
                _ => true,
            };
            if !unchanged {
                return Err(AppError::BadRequest(format!("{key} cannot be changed")));
            }
        }
    }
    for key in MANAGED_KEYS {
        patch.remove(*key);
    }

    let video_slides = match patch.remove("videoSlides") {
        None => None,
        Some(Value::Null) => Some(Vec::new()),
        Some(value) => Some(
            serde_json::from_value::<Vec<VideoSlide>>(value)
                .map_err(|e| AppError::BadRequest(format!("Invalid videoSlides: {e}")))?,
        ),
    };

    if let Some(data) = patch.get("carouselData") {
        parse_carousel_data(data)?;
    }

    let mut merged = serde_json::to_value(&current)
        .map_err(|e| AppError::Internal(format!("Failed to serialize item: {e}")))?;
    if let Value::Object(object) = &mut merged {
        object.extend(patch);
    }

    let mut updated: ContentItem = serde_json::from_value(merged)
        .map_err(|e| AppError::BadRequest(format!("Invalid update: {e}")))?;

    let now = Utc::now();
    updated.updated_at = now;
    if let Some(slides) = video_slides {
        updated.replace_video_slides(slides, now);
    }

    repo.replace(updated.clone(), current.video_slides_revision).await?;

    Ok(updated)
}

/// Delete an item and return the page the list should show next.
pub async fn process_delete(
    repo: &dyn ContentRepository,
    kind: ContentKind,
    id: &str,
    page: &PageRequest,
) -> Result<PaginatedResponse<ContentItem>, AppError> {
    if !repo.delete(kind, id).await? {
        return Err(AppError::content_not_found(kind, id));
    }
    tracing::info!(%kind, id, "Deleted content item");

    let remaining = repo.count(kind, page.search_term()).await?;
    let next = PageRequest {
        page: Some(page_after_delete(page.page(), page.limit(), remaining)),
        limit: Some(page.limit()),
        search: page.search.clone(),
    };
    process_list(repo, kind, &next).await
}

/// Axum handler for `GET /api/{resource}`.
pub async fn list_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path(resource): axum::extract::Path<String>,
    axum::extract::Query(page): axum::extract::Query<PageRequest>,
) -> Result<axum::Json<PaginatedResponse<ContentItem>>, AppError> {
    let kind = resource_kind(&resource)?;
    let response = process_list(state.content_repo.as_ref(), kind, &page).await?;
    Ok(axum::Json(response))
}

/// Axum handler for `POST /api/{resource}`: raw JSON documents only.
pub async fn create_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path(resource): axum::extract::Path<String>,
    body: String,
) -> Result<(axum::http::StatusCode, axum::Json<ApiResponse<ContentItem>>), AppError> {
    let kind = resource_kind(&resource)?;
    let item = crate::api::generate::process_generate(
        state.content_repo.as_ref(),
        state.category_repo.as_ref(),
        kind,
        &body,
        true,
    )
    .await?;
    Ok((axum::http::StatusCode::CREATED, axum::Json(ApiResponse::ok(item))))
}

/// Axum handler for `GET /api/{resource}/{id}`.
pub async fn get_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path((resource, id)): axum::extract::Path<(String, String)>,
) -> Result<axum::Json<ApiResponse<ContentItem>>, AppError> {
    let kind = resource_kind(&resource)?;
    let item = process_get(state.content_repo.as_ref(), kind, &id).await?;
    Ok(axum::Json(ApiResponse::ok(item)))
}

/// Axum handler for `PUT /api/{resource}/{id}`.
pub async fn update_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path((resource, id)): axum::extract::Path<(String, String)>,
    axum::Json(patch): axum::Json<Value>,
) -> Result<axum::Json<ApiResponse<ContentItem>>, AppError> {
    let kind = resource_kind(&resource)?;
    let item = process_update(state.content_repo.as_ref(), kind, &id, patch).await?;
    Ok(axum::Json(ApiResponse::ok(item)))
}

/// Axum handler for `DELETE /api/{resource}/{id}?page&limit&search`.
pub async fn delete_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path((resource, id)): axum::extract::Path<(String, String)>,
    axum::extract::Query(page): axum::extract::Query<PageRequest>,
) -> Result<axum::Json<PaginatedResponse<ContentItem>>, AppError> {
    let kind = resource_kind(&resource)?;
    let response = process_delete(state.content_repo.as_ref(), kind, &id, &page).await?;
    Ok(axum::Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::{ContentDetails, RiddleDetails, TopicDetails};
    use crate::models::slides::{CarouselData, CarouselSlide, CarouselSlideKind, VideoSlideType};
    use crate::test_support::MockContentRepo;
    use serde_json::json;

    fn topic(title: &str) -> ContentItem {
        ContentItem::new(
            title.to_string(),
            format!("About {title}"),
            ContentDetails::Topic(TopicDetails {
                points: vec!["a".to_string()],
            }),
            CarouselData {
                slides: vec![CarouselSlide::new(CarouselSlideKind::Cover, title)],
                caption: String::new(),
                hashtags: vec![],
            },
        )
    }

    fn page(page: u64, limit: u64) -> PageRequest {
        PageRequest {
            page: Some(page),
            limit: Some(limit),
            search: None,
        }
    }

    #[test]
    fn test_resource_kind() {
        assert_eq!(resource_kind("riddles").unwrap(), ContentKind::Riddle);
        assert!(matches!(resource_kind("riddle"), Err(AppError::NotFound(_))));
        assert!(matches!(resource_kind("posts"), Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_newest_first_with_pagination() {
        let items: Vec<_> = (1..=12).map(|i| topic(&format!("Topic {i}"))).collect();
        let repo = MockContentRepo::with(items);

        let response = process_list(&repo, ContentKind::Topic, &page(2, 5)).await.unwrap();
        assert_eq!(response.pagination.total, 12);
        assert_eq!(response.pagination.total_pages, 3);
        let titles: Vec<_> = response.data.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Topic 7", "Topic 6", "Topic 5", "Topic 4", "Topic 3"]);
    }

    #[tokio::test]
    async fn test_list_search() {
        let repo = MockContentRepo::with(vec![topic("Laut"), topic("Gunung"), topic("Laut Dalam")]);
        let request = PageRequest {
            search: Some("laut".to_string()),
            ..Default::default()
        };
        let response = process_list(&repo, ContentKind::Topic, &request).await.unwrap();
        assert_eq!(response.pagination.total, 2);
    }

    #[tokio::test]
    async fn test_delete_last_item_of_page_goes_back() {
        let items: Vec<_> = (1..=11).map(|i| topic(&format!("Topic {i}"))).collect();
        // Oldest item sits alone on page 2
        let oldest = items[0].id.clone();
        let repo = MockContentRepo::with(items);

        let response = process_delete(&repo, ContentKind::Topic, &oldest, &page(2, 10))
            .await
            .unwrap();
        assert_eq!(response.pagination.page, 1);
        assert_eq!(response.pagination.total, 10);
        assert_eq!(response.data.len(), 10);
    }

    #[tokio::test]
    async fn test_delete_unknown() {
        let repo = MockContentRepo::new();
        let result = process_delete(&repo, ContentKind::Topic, "nope", &page(1, 10)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_merges_top_level_keys() {
        let item = topic("Laut");
        let id = item.id.clone();
        let created_at = item.created_at;
        let repo = MockContentRepo::with(vec![item]);

        let updated = process_update(
            &repo,
            ContentKind::Topic,
            &id,
            json!({ "title": "Laut Biru", "points": ["x", "y"], "createdAt": "2001-01-01T00:00:00Z" }),
        )
        .await
        .unwrap();

        assert_eq!(updated.title, "Laut Biru");
        assert_eq!(updated.description, "About Laut");
        assert_eq!(updated.created_at, created_at);
        match &updated.details {
            ContentDetails::Topic(t) => assert_eq!(t.points, vec!["x", "y"]),
            other => panic!("Expected topic details, got: {:?}", other),
        }
        assert_eq!(repo.get(&id).unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_rejects_id_and_kind_changes() {
        let item = topic("Laut");
        let id = item.id.clone();
        let repo = MockContentRepo::with(vec![item]);

        let result =
            process_update(&repo, ContentKind::Topic, &id, json!({ "kind": "riddle" })).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let result = process_update(&repo, ContentKind::Topic, &id, json!({ "_id": "other" })).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_update_video_slides_bumps_revision_and_empty_removes() {
        let item = topic("Laut");
        let id = item.id.clone();
        let repo = MockContentRepo::with(vec![item]);

        let updated = process_update(
            &repo,
            ContentKind::Topic,
            &id,
            json!({ "videoSlides": [ { "tipe_slide": "VIDEO_COVER", "title": "Laut" } ] }),
        )
        .await
        .unwrap();
        assert_eq!(updated.video_slides_revision, 1);
        assert_eq!(
            updated.video_slides.as_ref().unwrap()[0].tipe_slide,
            VideoSlideType::VideoCover
        );

        let cleared = process_update(&repo, ContentKind::Topic, &id, json!({ "videoSlides": [] }))
            .await
            .unwrap();
        assert!(cleared.video_slides.is_none());
        assert_eq!(cleared.video_slides_revision, 2);
        let stored = serde_json::to_value(repo.get(&id).unwrap()).unwrap();
        assert!(stored.get("videoSlides").is_none());
    }

    #[tokio::test]
    async fn test_update_conflicts_with_slides_written_meanwhile() {
        let item = topic("Laut");
        let id = item.id.clone();
        let repo = MockContentRepo::with(vec![item]);
        repo.after_next_find(|stored| {
            stored.replace_video_slides(
                vec![VideoSlide::new(VideoSlideType::VideoCover, "Laut")],
                Utc::now(),
            );
        });

        let result =
            process_update(&repo, ContentKind::Topic, &id, json!({ "title": "Laut Biru" })).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let stored = repo.get(&id).unwrap();
        assert_eq!(stored.title, "Laut");
        assert_eq!(stored.video_slides_revision, 1);
        assert_eq!(stored.video_slides.map(|s| s.len()), Some(1));
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_video_type() {
        let item = topic("Laut");
        let id = item.id.clone();
        let repo = MockContentRepo::with(vec![item]);

        let result = process_update(
            &repo,
            ContentKind::Topic,
            &id,
            json!({ "videoSlides": [ { "tipe_slide": "VIDEO_MEME", "title": "x" } ] }),
        )
        .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_update_validates_carousel_data() {
        let item = ContentItem::new(
            "Jam".to_string(),
            String::new(),
            ContentDetails::Riddle(RiddleDetails::default()),
            CarouselData::default(),
        );
        let id = item.id.clone();
        let repo = MockContentRepo::with(vec![item]);

        let result = process_update(
            &repo,
            ContentKind::Riddle,
            &id,
            json!({ "carouselData": { "slides": [] } }),
        )
        .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
