use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conversion::generator::TextGenerator;
use crate::conversion::prompt::build_prompt;
use crate::conversion::repair::repair_video_slides;
use crate::db::content_repository::ContentRepository;
use crate::error::AppError;
use crate::models::content::{ContentItem, ContentKind};
use crate::models::slides::{SavedUrls, VideoSlide};

/// Video slides of one item as returned by the video-slides endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSlidesPayload {
    pub slides: Vec<VideoSlide>,
    pub revision: i64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// The AI was called for this response.
    pub generated: bool,
    #[serde(default)]
    pub repaired: bool,
    #[serde(default)]
    pub fallback: bool,
}

impl VideoSlidesPayload {
    fn stored(item: &ContentItem, slides: Vec<VideoSlide>) -> Self {
        Self {
            slides,
            revision: item.video_slides_revision,
            updated_at: item.video_slides_updated_at,
            generated: false,
            repaired: false,
            fallback: false,
        }
    }
}

/// Convert the carousel of an item into video slides.
///
/// Stored slides are returned as they are unless `force` is set. The write
/// only succeeds if no other conversion stored slides in the meantime.
pub async fn process_generate_video_slides(
    repo: &dyn ContentRepository,
    generator: &dyn TextGenerator,
    kind: ContentKind,
    id: &str,
    force: bool,
) -> Result<VideoSlidesPayload, AppError> {
    let item = repo
        .find_by_id(kind, id)
        .await?
        .ok_or_else(|| AppError::content_not_found(kind, id))?;

    if !force {
        if let Some(slides) = &item.video_slides {
            return Ok(VideoSlidesPayload::stored(&item, slides.clone()));
        }
    }

    if item.carousel_data.slides.is_empty() {
        return Err(AppError::BadRequest(format!(
            "{} '{}' has no carousel slides to convert",
            kind, id
        )));
    }

    tracing::info!(%kind, id, force, "Generating video slides");

    let prompt = build_prompt(&item)?;
    let raw = generator.generate(&prompt).await?;
    let outcome = repair_video_slides(&raw, &item);

    if outcome.fallback {
        tracing::warn!(%kind, id, "AI answer unusable, storing the default slide");
    } else if outcome.repaired {
        tracing::warn!(%kind, id, "AI answer needed repair");
    }

    let updated = repo
        .set_video_slides(
            kind,
            id,
            outcome.slides,
            item.video_slides_revision,
            Utc::now(),
        )
        .await?;

    Ok(VideoSlidesPayload {
        slides: updated.video_slides.clone().unwrap_or_default(),
        revision: updated.video_slides_revision,
        updated_at: updated.video_slides_updated_at,
        generated: true,
        repaired: outcome.repaired,
        fallback: outcome.fallback,
    })
}

pub async fn process_get_video_slides(
    repo: &dyn ContentRepository,
    kind: ContentKind,
    id: &str,
) -> Result<VideoSlidesPayload, AppError> {
    let item = repo
        .find_by_id(kind, id)
        .await?
        .ok_or_else(|| AppError::content_not_found(kind, id))?;

    match &item.video_slides {
        Some(slides) => Ok(VideoSlidesPayload::stored(&item, slides.clone())),
        None => Err(AppError::NotFound(
            "Video slides have not been generated yet".into(),
        )),
    }
}

/// Record where the render of one video slide was saved. Returns the
/// updated slide.
pub async fn process_update_saved_urls(
    repo: &dyn ContentRepository,
    kind: ContentKind,
    id: &str,
    index: usize,
    urls: SavedUrls,
) -> Result<VideoSlide, AppError> {
    if urls.is_empty() {
        return Err(AppError::BadRequest(
            "Provide savedImageUrl and/or savedSlideUrl".into(),
        ));
    }

    let item = repo
        .find_by_id(kind, id)
        .await?
        .ok_or_else(|| AppError::content_not_found(kind, id))?;
    let count = item.video_slides.as_ref().map_or(0, Vec::len);
    if index >= count {
        return Err(AppError::NotFound(format!(
            "Video slide {} of {} '{}' not found ({} slides)",
            index, kind, id, count
        )));
    }

    let updated = repo.set_saved_urls(kind, id, index, &urls).await?;
    updated
        .video_slides
        .and_then(|mut slides| (index < slides.len()).then(|| slides.swap_remove(index)))
        .ok_or_else(|| AppError::NotFound(format!("Video slide {} not found", index)))
}
